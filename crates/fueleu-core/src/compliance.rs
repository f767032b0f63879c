//! Recording ship-year compliance snapshots.
//!
//! A snapshot is computed from the ship's actual intensity and energy use
//! against the configured target, then stored through the compliance
//! repository. Banking and pooling read these snapshots.

use rust_decimal::Decimal;

use fueleu_ledger::{compare_routes, compute_cb};
use fueleu_store::ComplianceRepository;
use fueleu_types::{ComplianceSnapshot, Route, RouteComparison, ShipId, Year};

use crate::config::PolicyConfig;
use crate::error::ComplianceError;

/// Compute a snapshot using the configured target and, when `energy_mj`
/// is `None`, the configured reference energy.
pub fn compute_snapshot(
    ship_id: ShipId,
    year: Year,
    actual_intensity: Decimal,
    energy_mj: Option<Decimal>,
    policy: &PolicyConfig,
) -> ComplianceSnapshot {
    let cb = compute_cb(
        actual_intensity,
        Some(energy_mj.unwrap_or(policy.reference_energy_mj)),
        Some(policy.target_intensity),
    );
    ComplianceSnapshot { ship_id, year, cb }
}

/// Compute and store a snapshot, replacing any existing one for the same
/// ship-year.
///
/// # Errors
///
/// Returns [`ComplianceError::Store`] if the repository write fails.
pub fn record_compliance<S>(
    store: &mut S,
    ship_id: ShipId,
    year: Year,
    actual_intensity: Decimal,
    energy_mj: Option<Decimal>,
    policy: &PolicyConfig,
) -> Result<ComplianceSnapshot, ComplianceError>
where
    S: ComplianceRepository + ?Sized,
{
    let snapshot = compute_snapshot(ship_id, year, actual_intensity, energy_mj, policy);
    store.save_snapshot(snapshot.clone())?;

    tracing::info!(
        ship_id = %snapshot.ship_id,
        year,
        intensity = %actual_intensity,
        cb = %snapshot.cb,
        "Recorded compliance snapshot"
    );
    Ok(snapshot)
}

/// Compare routes against their baseline.
///
/// # Errors
///
/// Returns [`ComplianceError::MissingBaseline`] if no route is flagged as
/// baseline, or [`ComplianceError::Calculation`] if its intensity is zero.
pub fn route_comparison(routes: &[Route]) -> Result<Vec<RouteComparison>, ComplianceError> {
    Ok(compare_routes(routes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    use fueleu_store::InMemoryStore;

    #[test]
    fn snapshot_uses_policy_target() {
        let policy = PolicyConfig {
            target_intensity: Decimal::new(90, 0),
            reference_energy_mj: Decimal::new(100, 0),
        };
        let snapshot = compute_snapshot(ShipId::from("S"), 2025, Decimal::new(88, 0), None, &policy);
        assert_eq!(snapshot.cb, Decimal::new(200, 0));

        let reported = compute_snapshot(
            ShipId::from("S"),
            2025,
            Decimal::new(88, 0),
            Some(Decimal::new(10, 0)),
            &policy,
        );
        assert_eq!(reported.cb, Decimal::new(20, 0));
    }

    #[test]
    fn record_replaces_existing_snapshot() {
        let mut store = InMemoryStore::new().with_snapshot("S", 2025, Decimal::new(-1, 0));
        let policy = PolicyConfig::default();

        let recorded = record_compliance(
            &mut store,
            ShipId::from("S"),
            2025,
            Decimal::new(9016, 2),
            Some(Decimal::new(1000, 0)),
            &policy,
        );
        assert_eq!(recorded.map(|s| s.cb), Ok(Decimal::new(1000, 0)));

        let stored = store.get_for_ship(&ShipId::from("S"), 2025).ok().flatten();
        assert_eq!(stored.map(|s| s.cb), Some(Decimal::new(1000, 0)));
    }

    #[test]
    fn route_comparison_without_baseline_is_missing_baseline() {
        let routes = [Route {
            route_id: "R002".to_owned(),
            year: 2024,
            ghg_intensity: Decimal::new(885, 1),
            is_baseline: false,
        }];
        assert_eq!(
            route_comparison(&routes),
            Err(ComplianceError::MissingBaseline { year: 2024 })
        );
    }
}
