//! In-memory storage adapter.
//!
//! Holds snapshots, bank entries and pools in ordinary collections.
//! Transactions take a full checkpoint of the state on `begin` and restore
//! it on `rollback`, which is cheap at the sizes this adapter is meant
//! for (tests, single-fleet tools, embedding).

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use fueleu_ledger::{BankingRuleError, DrawDown, plan_draw_down};
use fueleu_types::{BankEntry, ComplianceSnapshot, Pool, PoolId, ShipId, Year};

use crate::error::StoreError;
use crate::repository::{BankRepository, ComplianceRepository, PoolRepository, Transactional};

#[derive(Debug, Clone, Default)]
struct LedgerState {
    snapshots: BTreeMap<(ShipId, Year), Decimal>,
    /// Insertion order.
    bank_entries: Vec<BankEntry>,
    pools: BTreeMap<PoolId, Pool>,
}

/// A [`ComplianceRepository`], [`BankRepository`] and [`PoolRepository`]
/// backed by process memory.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: LedgerState,
    checkpoint: Option<LedgerState>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a ship-year balance.
    #[must_use]
    pub fn with_snapshot(mut self, ship_id: impl Into<ShipId>, year: Year, cb: Decimal) -> Self {
        self.state.snapshots.insert((ship_id.into(), year), cb);
        self
    }

    /// Every bank entry, in insertion order.
    pub fn bank_entries(&self) -> &[BankEntry] {
        &self.state.bank_entries
    }

    /// Number of persisted pools.
    pub fn pool_count(&self) -> usize {
        self.state.pools.len()
    }

    /// Whether a transaction is open.
    pub const fn in_transaction(&self) -> bool {
        self.checkpoint.is_some()
    }

    /// Add each draw to its entry's `amount_used`.
    ///
    /// Every draw is checked before any entry is touched, so a mismatch
    /// leaves the entries unchanged.
    fn apply_draw_down(&mut self, ship_id: &ShipId, plan: &[DrawDown]) -> Result<(), StoreError> {
        let mut updates = Vec::with_capacity(plan.len());
        for draw in plan {
            let mismatch = |reason| StoreError::DrawDownMismatch {
                ship_id: ship_id.clone(),
                entry_id: draw.entry_id,
                amount: draw.amount,
                reason,
            };
            let (idx, entry) = self
                .state
                .bank_entries
                .iter()
                .enumerate()
                .find(|(_, e)| e.id == draw.entry_id && &e.ship_id == ship_id)
                .ok_or_else(|| mismatch("entry not found"))?;
            if draw.amount > entry.available() {
                return Err(mismatch("exceeds available balance"));
            }
            let used = entry
                .amount_used
                .checked_add(draw.amount)
                .ok_or(StoreError::Overflow("amount used"))?;
            updates.push((idx, used));
        }

        for (idx, used) in updates {
            if let Some(entry) = self.state.bank_entries.get_mut(idx) {
                entry.amount_used = used;
            }
        }
        Ok(())
    }

    fn ship_entries(&self, ship_id: &ShipId) -> impl Iterator<Item = &BankEntry> {
        self.state
            .bank_entries
            .iter()
            .filter(move |e| &e.ship_id == ship_id)
    }
}

impl ComplianceRepository for InMemoryStore {
    fn get_for_ship(
        &self,
        ship_id: &ShipId,
        year: Year,
    ) -> Result<Option<ComplianceSnapshot>, StoreError> {
        Ok(self
            .state
            .snapshots
            .get(&(ship_id.clone(), year))
            .map(|&cb| ComplianceSnapshot {
                ship_id: ship_id.clone(),
                year,
                cb,
            }))
    }

    fn increment_cb(
        &mut self,
        ship_id: &ShipId,
        year: Year,
        delta: Decimal,
    ) -> Result<(), StoreError> {
        let cb = self
            .state
            .snapshots
            .entry((ship_id.clone(), year))
            .or_insert(Decimal::ZERO);
        *cb = cb
            .checked_add(delta)
            .ok_or(StoreError::Overflow("compliance balance"))?;
        Ok(())
    }

    fn save_snapshot(&mut self, snapshot: ComplianceSnapshot) -> Result<(), StoreError> {
        self.state
            .snapshots
            .insert((snapshot.ship_id, snapshot.year), snapshot.cb);
        Ok(())
    }
}

impl BankRepository for InMemoryStore {
    fn get_available(&self, ship_id: &ShipId) -> Result<Vec<BankEntry>, StoreError> {
        let mut entries: Vec<BankEntry> = self
            .ship_entries(ship_id)
            .filter(|e| e.available() > Decimal::ZERO)
            .cloned()
            .collect();
        entries.sort_by_key(|e| (e.year, e.created_at, e.id));
        Ok(entries)
    }

    fn get_banked(&self, ship_id: &ShipId, year: Year) -> Result<Vec<BankEntry>, StoreError> {
        Ok(self
            .ship_entries(ship_id)
            .filter(|e| e.year == year)
            .cloned()
            .collect())
    }

    fn bank_surplus(&mut self, entry: BankEntry) -> Result<(), StoreError> {
        self.state.bank_entries.push(entry);
        Ok(())
    }

    fn use_amount(&mut self, ship_id: &ShipId, amount: Decimal) -> Result<(), StoreError> {
        let entries: Vec<BankEntry> = self.ship_entries(ship_id).cloned().collect();
        let plan = plan_draw_down(&entries, amount).map_err(|err| match err {
            BankingRuleError::Overdrawn {
                requested,
                available,
            } => StoreError::Overdrawn {
                ship_id: ship_id.clone(),
                requested,
                available,
            },
            BankingRuleError::Overflow => StoreError::Overflow("bank draw-down"),
        })?;

        self.apply_draw_down(ship_id, &plan)
    }
}

impl PoolRepository for InMemoryStore {
    fn create(&mut self, pool: Pool) -> Result<PoolId, StoreError> {
        let id = pool.id;
        self.state.pools.insert(id, pool);
        Ok(id)
    }

    fn get(&self, pool_id: PoolId) -> Result<Option<Pool>, StoreError> {
        Ok(self.state.pools.get(&pool_id).cloned())
    }
}

impl Transactional for InMemoryStore {
    fn begin(&mut self) -> Result<(), StoreError> {
        if self.checkpoint.is_some() {
            return Err(StoreError::TransactionActive);
        }
        self.checkpoint = Some(self.state.clone());
        Ok(())
    }

    fn commit(&mut self) -> Result<(), StoreError> {
        self.checkpoint
            .take()
            .map(|_| ())
            .ok_or(StoreError::NoTransaction)
    }

    fn rollback(&mut self) -> Result<(), StoreError> {
        let checkpoint = self.checkpoint.take().ok_or(StoreError::NoTransaction)?;
        self.state = checkpoint;
        tracing::debug!("Rolled back in-memory transaction");
        Ok(())
    }
}
