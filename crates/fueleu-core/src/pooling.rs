//! Pool formation.
//!
//! [`PoolService::create_pool`] loads each ship's balance for the pool
//! year, redistributes surplus with [`fueleu_ledger::allocate_pool`] and
//! persists the result, all inside one store transaction. Nothing is
//! written unless the allocation succeeds.

use chrono::Utc;

use fueleu_ledger::allocate_pool;
use fueleu_store::{ComplianceRepository, PoolRepository, Transactional, with_transaction};
use fueleu_types::{Pool, PoolCandidate, PoolFormed, PoolId, PoolStatus, ShipId, Year};

use crate::error::ComplianceError;

/// Forms compliance pools.
pub struct PoolService<'a, S: ?Sized> {
    store: &'a mut S,
}

impl<'a, S> PoolService<'a, S>
where
    S: ComplianceRepository + PoolRepository + Transactional + ?Sized,
{
    /// Create a service over `store`.
    pub const fn new(store: &'a mut S) -> Self {
        Self { store }
    }

    /// Pool the `year` balances of `ship_ids`.
    ///
    /// Members come back sorted by their balance before pooling, largest
    /// first.
    ///
    /// # Errors
    ///
    /// - [`ComplianceError::EmptyPool`] if `ship_ids` is empty.
    /// - [`ComplianceError::MissingComplianceRecord`] for the first ship
    ///   with no snapshot for `year`.
    /// - [`ComplianceError::PoolValidation`] if the pool's total is
    ///   negative.
    /// - [`ComplianceError::Store`] if persisting fails.
    pub fn create_pool(
        &mut self,
        year: Year,
        ship_ids: &[ShipId],
    ) -> Result<PoolFormed, ComplianceError> {
        if ship_ids.is_empty() {
            return Err(ComplianceError::EmptyPool { year });
        }

        let formed = with_transaction(&mut *self.store, |store| {
            let candidates = ship_ids
                .iter()
                .map(|ship_id| -> Result<PoolCandidate, ComplianceError> {
                    store
                        .get_for_ship(ship_id, year)?
                        .map(|snapshot| PoolCandidate::new(snapshot.ship_id, snapshot.cb))
                        .ok_or_else(|| ComplianceError::MissingComplianceRecord {
                            ship_id: ship_id.clone(),
                            year,
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;

            let members = allocate_pool(&candidates)?;
            let pool_id = store.create(Pool {
                id: PoolId::new(),
                year,
                members: members.clone(),
                created_at: Utc::now(),
            })?;
            Ok::<_, ComplianceError>(PoolFormed {
                pool_id,
                status: PoolStatus::Formed,
                members,
            })
        })?;

        tracing::info!(
            pool_id = %formed.pool_id,
            year,
            members = formed.members.len(),
            "Pool formed"
        );
        Ok(formed)
    }

    /// Fetch a previously formed pool.
    ///
    /// # Errors
    ///
    /// Returns [`ComplianceError::Store`] if the read fails.
    pub fn pool(&self, pool_id: PoolId) -> Result<Option<Pool>, ComplianceError> {
        Ok(self.store.get(pool_id)?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use core::cell::RefCell;

    use super::*;
    use fueleu_store::{InMemoryStore, StoreError};
    use fueleu_types::ComplianceSnapshot;

    fn dec(n: i64) -> Decimal {
        Decimal::new(n, 0)
    }

    fn ships(ids: &[&str]) -> Vec<ShipId> {
        ids.iter().map(|&id| ShipId::from(id)).collect()
    }

    #[test]
    fn forms_and_persists_pool() {
        let mut store = InMemoryStore::new()
            .with_snapshot("A", 2025, dec(100))
            .with_snapshot("B", 2025, dec(-40))
            .with_snapshot("C", 2025, dec(-30));
        let mut service = PoolService::new(&mut store);

        let formed = service
            .create_pool(2025, &ships(&["A", "B", "C"]))
            .unwrap();

        assert_eq!(formed.status, PoolStatus::Formed);
        let after: Vec<Decimal> = formed.members.iter().map(|m| m.cb_after).collect();
        assert_eq!(after, vec![dec(30), Decimal::ZERO, Decimal::ZERO]);

        let stored = service.pool(formed.pool_id).unwrap().unwrap();
        assert_eq!(stored.year, 2025);
        assert_eq!(stored.members, formed.members);
        assert_eq!(store.pool_count(), 1);
    }

    #[test]
    fn empty_ship_list_is_rejected() {
        let mut store = InMemoryStore::new();
        let mut service = PoolService::new(&mut store);
        assert_eq!(
            service.create_pool(2025, &[]).err(),
            Some(ComplianceError::EmptyPool { year: 2025 })
        );
    }

    #[test]
    fn missing_record_names_first_absent_ship() {
        let mut store = InMemoryStore::new().with_snapshot("A", 2025, dec(10));
        let mut service = PoolService::new(&mut store);

        let result = service.create_pool(2025, &ships(&["A", "Q", "R"]));
        assert_eq!(
            result.err(),
            Some(ComplianceError::MissingComplianceRecord {
                ship_id: ShipId::from("Q"),
                year: 2025,
            })
        );
        assert_eq!(store.pool_count(), 0);
    }

    #[test]
    fn snapshot_from_other_year_does_not_count() {
        let mut store = InMemoryStore::new().with_snapshot("A", 2024, dec(10));
        let mut service = PoolService::new(&mut store);

        assert!(matches!(
            service.create_pool(2025, &ships(&["A"])),
            Err(ComplianceError::MissingComplianceRecord { .. })
        ));
    }

    #[test]
    fn insolvent_pool_persists_nothing() {
        let mut store = InMemoryStore::new()
            .with_snapshot("A", 2025, dec(20))
            .with_snapshot("B", 2025, dec(-50));
        let mut service = PoolService::new(&mut store);

        assert_eq!(
            service.create_pool(2025, &ships(&["A", "B"])).err(),
            Some(ComplianceError::PoolValidation { total: dec(-30) })
        );
        assert_eq!(store.pool_count(), 0);
        assert!(!store.in_transaction());
    }

    #[test]
    fn unknown_pool_is_none() {
        let mut store = InMemoryStore::new();
        let service = PoolService::new(&mut store);
        assert_eq!(service.pool(PoolId::new()).ok(), Some(None));
    }

    /// Records every repository call, in order, ahead of an
    /// [`InMemoryStore`].
    struct RecordingStore {
        inner: InMemoryStore,
        calls: RefCell<Vec<String>>,
    }

    impl RecordingStore {
        fn record(&self, call: impl Into<String>) {
            self.calls.borrow_mut().push(call.into());
        }
    }

    impl ComplianceRepository for RecordingStore {
        fn get_for_ship(
            &self,
            ship_id: &ShipId,
            year: Year,
        ) -> Result<Option<ComplianceSnapshot>, StoreError> {
            self.record(format!("read {ship_id}"));
            self.inner.get_for_ship(ship_id, year)
        }

        fn increment_cb(
            &mut self,
            ship_id: &ShipId,
            year: Year,
            delta: Decimal,
        ) -> Result<(), StoreError> {
            self.record(format!("increment {ship_id}"));
            self.inner.increment_cb(ship_id, year, delta)
        }

        fn save_snapshot(&mut self, snapshot: ComplianceSnapshot) -> Result<(), StoreError> {
            self.record(format!("save {}", snapshot.ship_id));
            self.inner.save_snapshot(snapshot)
        }
    }

    impl PoolRepository for RecordingStore {
        fn create(&mut self, pool: Pool) -> Result<PoolId, StoreError> {
            self.record("create");
            self.inner.create(pool)
        }

        fn get(&self, pool_id: PoolId) -> Result<Option<Pool>, StoreError> {
            self.inner.get(pool_id)
        }
    }

    impl Transactional for RecordingStore {
        fn begin(&mut self) -> Result<(), StoreError> {
            self.record("begin");
            self.inner.begin()
        }

        fn commit(&mut self) -> Result<(), StoreError> {
            self.record("commit");
            self.inner.commit()
        }

        fn rollback(&mut self) -> Result<(), StoreError> {
            self.record("rollback");
            self.inner.rollback()
        }
    }

    fn recording(snapshots: &[(&str, i64)]) -> RecordingStore {
        let inner = snapshots
            .iter()
            .fold(InMemoryStore::new(), |store, &(id, cb)| {
                store.with_snapshot(id, 2025, dec(cb))
            });
        RecordingStore {
            inner,
            calls: RefCell::default(),
        }
    }

    #[test]
    fn snapshot_reads_run_inside_the_transaction() {
        let mut store = recording(&[("A", 30), ("B", -10)]);
        PoolService::new(&mut store)
            .create_pool(2025, &ships(&["A", "B"]))
            .unwrap();

        assert_eq!(
            store.calls.into_inner(),
            vec!["begin", "read A", "read B", "create", "commit"]
        );
    }

    #[test]
    fn missing_record_rolls_back_the_transaction() {
        let mut store = recording(&[("A", 30)]);
        let result = PoolService::new(&mut store).create_pool(2025, &ships(&["A", "Q"]));

        assert!(matches!(
            result,
            Err(ComplianceError::MissingComplianceRecord { .. })
        ));
        assert!(!store.inner.in_transaction());
        assert_eq!(
            store.calls.into_inner(),
            vec!["begin", "read A", "read Q", "rollback"]
        );
    }
}
