//! Compliance balance and intensity comparisons.
//!
//! The compliance balance of a ship-year is the gap between the regulatory
//! intensity target and the ship's actual intensity, scaled by the energy
//! it consumed:
//!
//! ```text
//! cb = (target - actual_intensity) * energy_mj
//! ```
//!
//! Intensities are in gCO2e/MJ, energy in MJ, so `cb` is in gCO2e.

use rust_decimal::Decimal;

use fueleu_types::{Route, RouteComparison};

use crate::CalculationError;

/// Intensity target for reporting year 2025, in gCO2e/MJ.
pub const REGULATORY_TARGET_2025: Decimal = Decimal::from_parts(9116, 0, 0, false, 2);

/// Energy assumed when the caller does not supply one, in MJ.
pub const REFERENCE_ENERGY_MJ: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Compute a compliance balance.
///
/// `energy_mj` defaults to [`REFERENCE_ENERGY_MJ`] and `target` to
/// [`REGULATORY_TARGET_2025`]. Saturates instead of overflowing.
pub fn compute_cb(
    actual_intensity: Decimal,
    energy_mj: Option<Decimal>,
    target: Option<Decimal>,
) -> Decimal {
    let target = target.unwrap_or(REGULATORY_TARGET_2025);
    let energy = energy_mj.unwrap_or(REFERENCE_ENERGY_MJ);
    target
        .saturating_sub(actual_intensity)
        .saturating_mul(energy)
}

/// Percentage difference of `comparison` relative to `baseline`:
/// `((comparison / baseline) - 1) * 100`.
///
/// # Errors
///
/// Returns [`CalculationError::ZeroBaseline`] when `baseline` is zero.
pub fn compute_intensity_diff(
    baseline: Decimal,
    comparison: Decimal,
) -> Result<Decimal, CalculationError> {
    if baseline.is_zero() {
        return Err(CalculationError::ZeroBaseline);
    }
    comparison
        .checked_div(baseline)
        .and_then(|ratio| ratio.checked_sub(Decimal::ONE))
        .and_then(|delta| delta.checked_mul(Decimal::ONE_HUNDRED))
        .ok_or(CalculationError::Overflow("intensity difference"))
}

/// Compare every route against the route flagged as baseline.
///
/// A route is compliant when its intensity does not exceed the baseline's.
/// If several routes are flagged, the first one wins.
///
/// # Errors
///
/// Returns [`CalculationError::MissingBaseline`] if no route is flagged,
/// or [`CalculationError::ZeroBaseline`] if the baseline intensity is zero.
pub fn compare_routes(routes: &[Route]) -> Result<Vec<RouteComparison>, CalculationError> {
    let baseline = routes
        .iter()
        .find(|r| r.is_baseline)
        .ok_or(CalculationError::MissingBaseline {
            year: routes.first().map_or(0, |r| r.year),
        })?;

    routes
        .iter()
        .map(|route| {
            Ok(RouteComparison {
                route_id: route.route_id.clone(),
                ghg_intensity: route.ghg_intensity,
                percent_diff: compute_intensity_diff(baseline.ghg_intensity, route.ghg_intensity)?,
                is_compliant: route.ghg_intensity <= baseline.ghg_intensity,
            })
        })
        .collect()
}
