//! Byte run-length encoding as `(value, count)` pairs.

use super::DecodeError;

/// Longest run a single pair can hold
pub const MAX_RUN: usize = u8::MAX as usize;

/// Encode maximal runs of equal bytes; runs over 255 are split.
pub fn rle_encode(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut i = 0;

    while i < data.len() {
        let value = data[i];
        let run = data[i..]
            .iter()
            .take(MAX_RUN)
            .take_while(|&&b| b == value)
            .count();

        out.push(value);
        out.push(run as u8);
        i += run;
    }

    out
}

pub fn rle_decode(pairs: &[u8]) -> Result<Vec<u8>, DecodeError> {
    if pairs.len() % 2 != 0 {
        return Err(DecodeError::OddRleLength(pairs.len()));
    }

    let mut out = Vec::new();
    for (pair, chunk) in pairs.chunks_exact(2).enumerate() {
        let (value, count) = (chunk[0], chunk[1]);
        if count == 0 {
            return Err(DecodeError::ZeroRun { pair });
        }
        out.extend(std::iter::repeat(value).take(count as usize));
    }

    Ok(out)
}

/// Number of `(value, count)` pairs in an encoded buffer
pub fn pair_count(pairs: &[u8]) -> usize {
    pairs.len() / 2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        assert!(rle_encode(&[]).is_empty());
        assert!(rle_decode(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_long_run_is_capped() {
        let data = vec![7u8; 300];
        assert_eq!(rle_encode(&data), vec![7, 255, 7, 45]);
    }

    #[test]
    fn test_exactly_max_run() {
        assert_eq!(rle_encode(&[1u8; 255]), vec![1, 255]);
        assert_eq!(rle_encode(&[1u8; 256]), vec![1, 255, 1, 1]);
    }

    #[test]
    fn test_mixed_runs() {
        let data = [0, 0, 0, 0xAA, 0xFF, 0xFF];
        let encoded = rle_encode(&data);
        assert_eq!(encoded, vec![0, 3, 0xAA, 1, 0xFF, 2]);
        assert_eq!(pair_count(&encoded), 3);
    }

    #[test]
    fn test_round_trip() {
        let mut data = vec![0u8; 1000];
        data.extend([1, 2, 2, 3, 3, 3]);
        data.extend(vec![0xFF; 600]);
        data.push(0);
        assert_eq!(rle_decode(&rle_encode(&data)).unwrap(), data);
    }

    #[test]
    fn test_decode_rejects_odd_length() {
        assert!(matches!(
            rle_decode(&[1, 2, 3]),
            Err(DecodeError::OddRleLength(3))
        ));
    }

    #[test]
    fn test_decode_rejects_zero_count() {
        assert!(matches!(
            rle_decode(&[1, 2, 5, 0]),
            Err(DecodeError::ZeroRun { pair: 1 })
        ));
    }
}
