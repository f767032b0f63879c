//! Banking surplus and applying it to later years.
//!
//! [`BankingService`] orchestrates the banking ledger rules from
//! `fueleu-ledger` against a store implementing the compliance and bank
//! repositories.
//!
//! # Operations
//!
//! | Operation | Reads | Writes |
//! |-----------|-------|--------|
//! | [`bank_surplus`] | snapshot (+ same-year entries when capped) | one bank entry |
//! | [`get_adjusted_cb`] | snapshot, available entries | none |
//! | [`apply_banked_surplus`] | snapshot, available entries | draw-down + snapshot increment, one transaction |
//!
//! Banking does not debit the source snapshot: a bank entry is a claim
//! against the year's surplus, not a withdrawal from it.
//!
//! [`bank_surplus`]: BankingService::bank_surplus
//! [`get_adjusted_cb`]: BankingService::get_adjusted_cb
//! [`apply_banked_surplus`]: BankingService::apply_banked_surplus

use rust_decimal::Decimal;

use fueleu_ledger::{adjusted_balance, banked_available, banked_from_year};
use fueleu_store::{BankRepository, ComplianceRepository, Transactional, with_transaction};
use fueleu_types::{AdjustedBalance, BankEntry, ShipId, Year};

use crate::config::BankingConfig;
use crate::error::ComplianceError;

/// Banks surplus and applies banked surplus against later years.
pub struct BankingService<'a, S: ?Sized> {
    store: &'a mut S,
    config: BankingConfig,
}

impl<'a, S> BankingService<'a, S>
where
    S: ComplianceRepository + BankRepository + Transactional + ?Sized,
{
    /// Create a service over `store` with the given banking rules.
    pub const fn new(store: &'a mut S, config: BankingConfig) -> Self {
        Self { store, config }
    }

    /// Bank `amount` of the ship's `year` surplus.
    ///
    /// # Errors
    ///
    /// Returns [`ComplianceError::InvalidAmount`] if `amount <= 0`,
    /// [`ComplianceError::InsufficientSurplus`] if the ship has no snapshot
    /// for `year` or its bankable surplus is below `amount`.
    pub fn bank_surplus(
        &mut self,
        ship_id: &ShipId,
        year: Year,
        amount: Decimal,
    ) -> Result<BankEntry, ComplianceError> {
        if amount <= Decimal::ZERO {
            tracing::warn!(ship_id = %ship_id, year, amount = %amount, "Rejected non-positive bank amount");
            return Err(ComplianceError::InvalidAmount {
                ship_id: ship_id.clone(),
                amount,
            });
        }

        let bankable = self.bankable_surplus(ship_id, year)?;
        if bankable.is_none_or(|available| available < amount) {
            let available = bankable.unwrap_or(Decimal::ZERO).max(Decimal::ZERO);
            tracing::warn!(
                ship_id = %ship_id,
                year,
                requested = %amount,
                available = %available,
                "Rejected bank request exceeding surplus"
            );
            return Err(ComplianceError::InsufficientSurplus {
                ship_id: ship_id.clone(),
                year,
                requested: amount,
                available,
            });
        }

        let entry = BankEntry::new(ship_id.clone(), year, amount);
        self.store.bank_surplus(entry.clone())?;

        tracing::info!(
            ship_id = %ship_id,
            year,
            amount = %amount,
            entry_id = %entry.id,
            "Banked surplus"
        );
        Ok(entry)
    }

    /// The ship's raw balance for `year` plus eligible banked surplus.
    ///
    /// Pure read; calling it twice without intervening writes returns the
    /// same result.
    ///
    /// # Errors
    ///
    /// Returns [`ComplianceError::Store`] if a repository read fails.
    pub fn get_adjusted_cb(
        &self,
        ship_id: &ShipId,
        year: Year,
    ) -> Result<AdjustedBalance, ComplianceError> {
        adjusted_cb(&*self.store, self.config, ship_id, year)
    }

    /// Apply `amount` of banked surplus to the ship's `target_year`.
    ///
    /// Draws the amount down across the ship's entries (oldest banked year
    /// first) and adds it to the target year's balance, both in one
    /// transaction. Returns the adjusted balance after application.
    ///
    /// # Errors
    ///
    /// Returns [`ComplianceError::InvalidAmount`] if `amount <= 0`,
    /// [`ComplianceError::InsufficientBankedSurplus`] if the eligible
    /// banked surplus is below `amount`, or [`ComplianceError::Store`] if
    /// either write fails (in which case neither is kept).
    pub fn apply_banked_surplus(
        &mut self,
        ship_id: &ShipId,
        target_year: Year,
        amount: Decimal,
    ) -> Result<AdjustedBalance, ComplianceError> {
        if amount <= Decimal::ZERO {
            tracing::warn!(ship_id = %ship_id, target_year, amount = %amount, "Rejected non-positive application");
            return Err(ComplianceError::InvalidAmount {
                ship_id: ship_id.clone(),
                amount,
            });
        }

        let config = self.config;
        with_transaction(&mut *self.store, |store| {
            let before = adjusted_cb(&*store, config, ship_id, target_year)?;
            if before.banked_available < amount {
                tracing::warn!(
                    ship_id = %ship_id,
                    target_year,
                    requested = %amount,
                    available = %before.banked_available,
                    "Rejected application exceeding banked surplus"
                );
                return Err(ComplianceError::InsufficientBankedSurplus {
                    ship_id: ship_id.clone(),
                    year: target_year,
                    requested: amount,
                    available: before.banked_available,
                });
            }

            store.use_amount(ship_id, amount)?;
            store.increment_cb(ship_id, target_year, amount)?;
            Ok(())
        })?;

        let after = self.get_adjusted_cb(ship_id, target_year)?;
        tracing::info!(
            ship_id = %ship_id,
            target_year,
            amount = %amount,
            raw_cb = %after.raw_cb,
            banked_available = %after.banked_available,
            "Applied banked surplus"
        );
        Ok(after)
    }

    /// Surplus the ship may still bank from `year`, `None` without a
    /// snapshot.
    fn bankable_surplus(
        &self,
        ship_id: &ShipId,
        year: Year,
    ) -> Result<Option<Decimal>, ComplianceError> {
        let Some(snapshot) = self.store.get_for_ship(ship_id, year)? else {
            return Ok(None);
        };
        if !self.config.cap_repeat_banking {
            return Ok(Some(snapshot.cb));
        }

        let already = banked_from_year(&self.store.get_banked(ship_id, year)?, year)?;
        let remaining = snapshot
            .cb
            .checked_sub(already)
            .ok_or(ComplianceError::Overflow("bankable surplus"))?;
        Ok(Some(remaining))
    }
}

fn adjusted_cb<S>(
    store: &S,
    config: BankingConfig,
    ship_id: &ShipId,
    year: Year,
) -> Result<AdjustedBalance, ComplianceError>
where
    S: ComplianceRepository + BankRepository + ?Sized,
{
    let raw_cb = store
        .get_for_ship(ship_id, year)?
        .map_or(Decimal::ZERO, |s| s.cb);
    let entries = store.get_available(ship_id)?;
    let banked = banked_available(&entries, config.eligibility, year)?;

    let balance = adjusted_balance(ship_id.clone(), year, raw_cb, banked);
    tracing::debug!(
        ship_id = %ship_id,
        year,
        raw_cb = %balance.raw_cb,
        banked_available = %balance.banked_available,
        status = %balance.status,
        "Computed adjusted balance"
    );
    Ok(balance)
}
