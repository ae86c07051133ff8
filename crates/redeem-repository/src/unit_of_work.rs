//! Lazily started transaction shared by several ledger operations.

use crate::{TransactionManager, UsageLedger};
use redeem_core::{RedeemError, RedeemResult};
use redeem_domain::{NewUsageReport, UsageReport};
use tracing::{debug, warn};

/// Transaction state of a [`UnitOfWork`].
#[derive(Debug)]
pub enum TxState<T> {
    /// No operation has needed the store yet.
    NoTransaction,
    /// A transaction is open.
    Active(T),
}

/// Threads one transaction through any number of ledger calls.
///
/// The first call that needs the store begins the transaction; later calls
/// reuse it. [`commit`](Self::commit) and [`rollback`](Self::rollback) consume
/// the unit, so a finished transaction can never be reused.
pub struct UnitOfWork<'a, M: TransactionManager> {
    manager: &'a M,
    state: TxState<M::Tx>,
}

impl<'a, M: TransactionManager> UnitOfWork<'a, M> {
    #[must_use]
    pub const fn new(manager: &'a M) -> Self {
        Self {
            manager,
            state: TxState::NoTransaction,
        }
    }

    /// Returns true once a transaction has been started.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.state, TxState::Active(_))
    }

    /// Returns the open transaction, beginning one on first use.
    pub async fn handle(&mut self) -> RedeemResult<&mut M::Tx> {
        if matches!(self.state, TxState::NoTransaction) {
            let tx = self.manager.begin().await?;
            debug!("Transaction started");
            self.state = TxState::Active(tx);
        }

        match &mut self.state {
            TxState::Active(tx) => Ok(tx),
            TxState::NoTransaction => Err(RedeemError::internal("transaction was not started")),
        }
    }

    /// Commits the transaction. A unit that never started is a no-op.
    pub async fn commit(mut self) -> RedeemResult<()> {
        match std::mem::replace(&mut self.state, TxState::NoTransaction) {
            TxState::Active(tx) => self.manager.commit(tx).await,
            TxState::NoTransaction => Ok(()),
        }
    }

    /// Rolls the transaction back. A unit that never started is a no-op.
    pub async fn rollback(mut self) -> RedeemResult<()> {
        match std::mem::replace(&mut self.state, TxState::NoTransaction) {
            TxState::Active(tx) => self.manager.rollback(tx).await,
            TxState::NoTransaction => Ok(()),
        }
    }
}

impl<'a, L: UsageLedger> UnitOfWork<'a, L> {
    /// Finds the usage report for `(mobile, gift_code)` within this unit.
    pub async fn find_usage(
        &mut self,
        mobile: &str,
        gift_code: &str,
    ) -> RedeemResult<Option<UsageReport>> {
        let ledger = self.manager;
        let tx = self.handle().await?;
        ledger.find_usage(tx, mobile, gift_code).await
    }

    /// Inserts a usage report within this unit.
    pub async fn record_usage(&mut self, report: &NewUsageReport) -> RedeemResult<UsageReport> {
        let ledger = self.manager;
        let tx = self.handle().await?;
        ledger.record_usage(tx, report).await
    }
}

impl<M: TransactionManager> Drop for UnitOfWork<'_, M> {
    fn drop(&mut self) {
        if self.is_active() {
            // The handle's own drop releases the transaction.
            warn!("Unit of work dropped with an open transaction; it will be rolled back");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Default)]
    struct CountingManager {
        begins: AtomicU32,
        commits: AtomicU32,
        rollbacks: AtomicU32,
    }

    #[async_trait]
    impl TransactionManager for CountingManager {
        type Tx = u32;

        async fn begin(&self) -> RedeemResult<u32> {
            Ok(self.begins.fetch_add(1, Ordering::SeqCst) + 1)
        }

        async fn commit(&self, _tx: u32) -> RedeemResult<()> {
            self.commits.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn rollback(&self, _tx: u32) -> RedeemResult<()> {
            self.rollbacks.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_handle_begins_lazily_and_reuses() {
        let manager = CountingManager::default();
        let mut uow = UnitOfWork::new(&manager);
        assert!(!uow.is_active());
        assert_eq!(manager.begins.load(Ordering::SeqCst), 0);

        let first = *uow.handle().await.unwrap();
        let second = *uow.handle().await.unwrap();

        assert_eq!(first, second);
        assert!(uow.is_active());
        assert_eq!(manager.begins.load(Ordering::SeqCst), 1);

        uow.commit().await.unwrap();
        assert_eq!(manager.commits.load(Ordering::SeqCst), 1);
        assert_eq!(manager.rollbacks.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_rollback_finishes_active_transaction() {
        let manager = CountingManager::default();
        let mut uow = UnitOfWork::new(&manager);
        uow.handle().await.unwrap();

        uow.rollback().await.unwrap();
        assert_eq!(manager.rollbacks.load(Ordering::SeqCst), 1);
        assert_eq!(manager.commits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_terminal_actions_without_transaction_are_noops() {
        let manager = CountingManager::default();

        UnitOfWork::new(&manager).commit().await.unwrap();
        UnitOfWork::new(&manager).rollback().await.unwrap();

        assert_eq!(manager.begins.load(Ordering::SeqCst), 0);
        assert_eq!(manager.commits.load(Ordering::SeqCst), 0);
        assert_eq!(manager.rollbacks.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_begin_failure_leaves_unit_inactive() {
        struct FailingManager;

        #[async_trait]
        impl TransactionManager for FailingManager {
            type Tx = ();

            async fn begin(&self) -> RedeemResult<()> {
                Err(RedeemError::persistence("pool exhausted"))
            }

            async fn commit(&self, _tx: ()) -> RedeemResult<()> {
                Ok(())
            }

            async fn rollback(&self, _tx: ()) -> RedeemResult<()> {
                Ok(())
            }
        }

        let mut uow = UnitOfWork::new(&FailingManager);
        let result = uow.handle().await;
        assert!(matches!(result, Err(RedeemError::Persistence(_))));
        assert!(!uow.is_active());
    }
}
