//! Post-allocation invariant verification.
//!
//! Pooling moves balance between ships; it never creates or destroys it.
//! After every allocation the pool is checked against:
//!
//! ```text
//! |sum(cb_after) - sum(cb_before)| <= BALANCE_TOLERANCE
//! cb_before >= 0  =>  cb_after >= 0
//! cb_before <  0  =>  cb_after >= cb_before
//! ```
//!
//! The allocator satisfies these by construction, so a failure here means
//! the allocator is wrong. Violations are logged at `error` level and
//! returned as [`AllocationError::PoolInvariant`].

use rust_decimal::Decimal;

use fueleu_types::PoolMember;

use crate::{AllocationError, BALANCE_TOLERANCE};

/// Sum balances, failing on decimal overflow.
pub(crate) fn sum_before(
    mut values: impl Iterator<Item = Decimal>,
) -> Result<Decimal, AllocationError> {
    values.try_fold(Decimal::ZERO, |acc, v| {
        acc.checked_add(v).ok_or(AllocationError::Overflow)
    })
}

/// Verify conservation and non-worsening for an allocated pool.
///
/// # Errors
///
/// Returns [`AllocationError::PoolInvariant`] naming the first offending
/// ship, or a pool-wide violation when the totals differ.
pub fn verify_allocation(members: &[PoolMember]) -> Result<(), AllocationError> {
    for member in members {
        let reason = if member.cb_before >= Decimal::ZERO && member.cb_after < Decimal::ZERO {
            Some(format!(
                "surplus ship {} exited negative ({} -> {})",
                member.ship_id, member.cb_before, member.cb_after
            ))
        } else if member.cb_before < Decimal::ZERO && member.cb_after < member.cb_before {
            Some(format!(
                "deficit ship {} exited worse ({} -> {})",
                member.ship_id, member.cb_before, member.cb_after
            ))
        } else {
            None
        };

        if let Some(reason) = reason {
            tracing::error!(ship_id = %member.ship_id, %reason, "POOL_INVARIANT violated");
            return Err(AllocationError::PoolInvariant {
                ship_id: Some(member.ship_id.clone()),
                reason,
            });
        }
    }

    let before = sum_before(members.iter().map(|m| m.cb_before))?;
    let after = sum_before(members.iter().map(|m| m.cb_after))?;
    let drift = after
        .checked_sub(before)
        .ok_or(AllocationError::Overflow)?
        .abs();

    if drift > BALANCE_TOLERANCE {
        let reason = format!("pool total drifted by {drift} ({before} -> {after})");
        tracing::error!(%reason, "POOL_INVARIANT violated");
        return Err(AllocationError::PoolInvariant {
            ship_id: None,
            reason,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use fueleu_types::ShipId;

    fn member(id: &str, before: i64, after: i64) -> PoolMember {
        PoolMember {
            ship_id: ShipId::from(id),
            cb_before: Decimal::new(before, 0),
            cb_after: Decimal::new(after, 0),
        }
    }

    #[test]
    fn sum_before_totals_and_detects_overflow() {
        let values = [Decimal::new(100, 0), Decimal::new(-40, 0), Decimal::new(-30, 0)];
        assert_eq!(sum_before(values.into_iter()), Ok(Decimal::new(30, 0)));
        assert_eq!(sum_before(core::iter::empty()), Ok(Decimal::ZERO));
        assert_eq!(
            sum_before([Decimal::MAX, Decimal::MAX].into_iter()),
            Err(AllocationError::Overflow)
        );
    }

    #[test]
    fn balanced_pool_passes() {
        let members = [member("A", 100, 30), member("B", -40, 0), member("C", -30, 0)];
        assert_eq!(verify_allocation(&members), Ok(()));
    }

    #[test]
    fn surplus_ship_going_negative_is_named() {
        let members = [member("A", 10, -5), member("B", -5, 10)];
        let result = verify_allocation(&members);
        assert!(matches!(
            result,
            Err(AllocationError::PoolInvariant { ship_id: Some(ref id), .. }) if id.as_str() == "A"
        ));
    }

    #[test]
    fn zero_balance_ship_counts_as_surplus() {
        let members = [member("Z", 0, -1), member("B", -1, 0)];
        assert!(matches!(
            verify_allocation(&members),
            Err(AllocationError::PoolInvariant { ship_id: Some(ref id), .. }) if id.as_str() == "Z"
        ));
    }

    #[test]
    fn deficit_ship_made_worse_is_named() {
        let members = [member("A", 10, 20), member("B", -5, -15)];
        assert!(matches!(
            verify_allocation(&members),
            Err(AllocationError::PoolInvariant { ship_id: Some(ref id), .. }) if id.as_str() == "B"
        ));
    }

    #[test]
    fn total_drift_is_a_pool_wide_violation() {
        let members = [member("A", 100, 90), member("B", -40, 0)];
        assert!(matches!(
            verify_allocation(&members),
            Err(AllocationError::PoolInvariant { ship_id: None, .. })
        ));
    }

    #[test]
    fn drift_within_tolerance_passes() {
        let members = [PoolMember {
            ship_id: ShipId::from("A"),
            cb_before: Decimal::new(10, 0),
            cb_after: Decimal::new(100_005, 4),
        }];
        assert_eq!(verify_allocation(&members), Ok(()));
    }
}
