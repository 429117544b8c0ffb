//! Spot checks of a land grid against well-known coordinates.

use serde::Serialize;
use tracing::{info, warn};

use crate::raster::Grid;

/// A coordinate with a known land/water answer
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReferencePoint {
    pub label: &'static str,
    pub lat: f64,
    pub lng: f64,
    pub land: bool,
}

const fn point(label: &'static str, lat: f64, lng: f64, land: bool) -> ReferencePoint {
    ReferencePoint {
        label,
        lat,
        lng,
        land,
    }
}

/// Regression set checked after every rasterization
pub const REFERENCE_POINTS: &[ReferencePoint] = &[
    point("San Francisco", 37.77, -122.42, true),
    point("Mid-Pacific", 20.0, -160.0, false),
    point("Tokyo", 35.68, 139.69, true),
    point("Hawaii Big Island", 19.7, -155.5, true),
    point("London", 51.5, -0.12, true),
    point("Mid-Atlantic", 0.0, -30.0, false),
    point("Sydney", -33.87, 151.21, true),
    point("Honolulu", 21.31, -157.86, true),
    point("Gulf of Guinea", 0.0, 0.0, false),
];

#[derive(Debug, Clone, Serialize)]
pub struct CheckOutcome {
    pub point: ReferencePoint,
    pub row: usize,
    pub col: usize,
    pub actual: bool,
}

impl CheckOutcome {
    pub fn passed(&self) -> bool {
        self.actual == self.point.land
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub outcomes: Vec<CheckOutcome>,
}

impl ValidationReport {
    pub fn all_passed(&self) -> bool {
        self.outcomes.iter().all(CheckOutcome::passed)
    }

    pub fn failures(&self) -> impl Iterator<Item = &CheckOutcome> {
        self.outcomes.iter().filter(|o| !o.passed())
    }
}

fn describe(land: bool) -> &'static str {
    if land {
        "land"
    } else {
        "water"
    }
}

/// Check `grid` against `points`, logging one line per point.
///
/// Mismatches are reported as warnings only; the caller decides whether a
/// failed report matters.
pub fn validate(grid: &Grid, points: &[ReferencePoint]) -> ValidationReport {
    info!("Validating known points:");

    let outcomes: Vec<CheckOutcome> = points
        .iter()
        .map(|&point| {
            let (row, col) = grid.spec().cell_index(point.lat, point.lng);
            let outcome = CheckOutcome {
                point,
                row,
                col,
                actual: grid.get(row, col),
            };

            let line = format!(
                "{} ({}, {}) = {} (expected {})",
                point.label,
                point.lat,
                point.lng,
                describe(outcome.actual),
                describe(point.land)
            );
            if outcome.passed() {
                info!("  OK: {}", line);
            } else {
                warn!("  FAIL: {}", line);
            }

            outcome
        })
        .collect();

    let report = ValidationReport { outcomes };
    if report.all_passed() {
        info!("All validation checks passed!");
    } else {
        warn!(
            "Some validation checks failed ({} of {})",
            report.failures().count(),
            report.outcomes.len()
        );
    }

    report
}
