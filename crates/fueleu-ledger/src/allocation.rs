//! Greedy pool redistribution.
//!
//! Surplus ships donate to deficit ships until every deficit is covered or
//! the surplus runs out. Members are sorted by `cb_before` descending
//! (stable, so ties keep input order); then two cursors walk inward:
//!
//! ```text
//!  surplus_idx ->                          <- deficit_idx
//!  [ +100 | +20 | 0 | -5 | -30 | -40 ]
//! ```
//!
//! The largest surplus always feeds the largest deficit first. This order
//! decides which ships end at exactly zero and which keep a residual
//! surplus.

use core::cmp::Reverse;

use rust_decimal::Decimal;

use fueleu_types::{PoolCandidate, PoolMember};

use crate::conservation::{sum_before, verify_allocation};
use crate::{AllocationError, BALANCE_TOLERANCE, NEGATIVE_TOLERANCE};

/// Redistribute balances across a pool.
///
/// Returns the members in allocation order (descending `cb_before`) with
/// `cb_after` populated. Duplicate ship IDs are not rejected; each
/// candidate is treated as its own member.
///
/// # Errors
///
/// Returns [`AllocationError::PoolValidation`] if the candidates' total is
/// below `-BALANCE_TOLERANCE`, [`AllocationError::Overflow`] on decimal
/// overflow, and [`AllocationError::PoolInvariant`] if the result breaks a
/// pool invariant (a defect).
pub fn allocate_pool(candidates: &[PoolCandidate]) -> Result<Vec<PoolMember>, AllocationError> {
    let total = sum_before(candidates.iter().map(|c| c.cb_before))?;
    if total < NEGATIVE_TOLERANCE {
        tracing::warn!(
            pool_size = candidates.len(),
            total = %total,
            "Rejected pool with negative total balance"
        );
        return Err(AllocationError::PoolValidation { total });
    }

    let mut members: Vec<PoolMember> = candidates
        .iter()
        .map(|c| PoolMember {
            ship_id: c.ship_id.clone(),
            cb_before: c.cb_before,
            cb_after: c.cb_before,
        })
        .collect();
    members.sort_by_key(|m| Reverse(m.cb_before));

    let transfers = redistribute(&mut members)?;
    verify_allocation(&members)?;

    tracing::debug!(
        pool_size = members.len(),
        total = %total,
        transfers,
        "Allocated pool"
    );
    Ok(members)
}

/// Run the two-pointer sweep over members sorted descending.
///
/// Returns the number of transfers made.
fn redistribute(members: &mut [PoolMember]) -> Result<usize, AllocationError> {
    let Some(mut deficit_idx) = members.len().checked_sub(1) else {
        return Ok(0);
    };
    let mut surplus_idx: usize = 0;
    let mut transfers: usize = 0;

    while surplus_idx < deficit_idx {
        let (Some(donor), Some(receiver)) = (members.get(surplus_idx), members.get(deficit_idx))
        else {
            break;
        };
        let donor_cb = donor.cb_after;
        let receiver_cb = receiver.cb_after;

        if receiver_cb >= Decimal::ZERO {
            deficit_idx = deficit_idx.saturating_sub(1);
            continue;
        }
        if donor_cb <= Decimal::ZERO {
            surplus_idx = surplus_idx.saturating_add(1);
            continue;
        }

        let amount = receiver_cb.abs().min(donor_cb);
        let donor_after = donor_cb
            .checked_sub(amount)
            .ok_or(AllocationError::Overflow)?;
        let receiver_after = receiver_cb
            .checked_add(amount)
            .ok_or(AllocationError::Overflow)?;

        set_cb_after(members, surplus_idx, donor_after);
        set_cb_after(members, deficit_idx, receiver_after);
        transfers = transfers.saturating_add(1);

        tracing::trace!(
            donor_idx = surplus_idx,
            receiver_idx = deficit_idx,
            amount = %amount,
            "Pool transfer"
        );

        // Both cursors may move on the same transfer.
        if donor_after <= BALANCE_TOLERANCE {
            surplus_idx = surplus_idx.saturating_add(1);
        }
        if receiver_after >= NEGATIVE_TOLERANCE {
            deficit_idx = deficit_idx.saturating_sub(1);
        }
    }

    Ok(transfers)
}

fn set_cb_after(members: &mut [PoolMember], idx: usize, value: Decimal) {
    if let Some(member) = members.get_mut(idx) {
        member.cb_after = value;
    }
}
