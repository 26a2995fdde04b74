use crate::domain::{Account, AccountConfig, AccountHandle, Fault};
use parking_lot::Mutex;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use tokio::sync::watch;
use tracing::{info, instrument};

/// The service-side account: the authoritative balance behind a mutex, plus
/// the shutdown state shared with the server loop.
///
/// Every clone addresses the same account. The mutex serializes each
/// read-modify-write, so concurrent deposits and withdrawals can neither lose
/// updates nor drive the balance negative, and a balance query only ever
/// observes the state before or after a mutation.
#[derive(Debug, Clone)]
pub struct LocalAccount(Arc<Inner>);

#[derive(Debug)]
struct Inner {
    account: Mutex<Account>,
    open: AtomicBool,
    shutdown: watch::Sender<bool>,
}

impl LocalAccount {
    pub fn open(config: AccountConfig) -> Self {
        let (shutdown, _) = watch::channel(false);
        info!(balance = config.opening_balance, "bank account opened");
        Self(Arc::new(Inner {
            account: Mutex::new(Account::new(config.opening_balance)),
            open: AtomicBool::new(true),
            shutdown,
        }))
    }

    /// Resolves once `shutdown` has been accepted. The server selects on this
    /// to enter its graceful-shutdown path.
    pub fn shutdown_requested(&self) -> watch::Receiver<bool> {
        self.0.shutdown.subscribe()
    }

    fn ensure_open(&self) -> Result<(), Fault> {
        if self.0.open.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(Fault::ServiceUnavailable(
                "account service is shut down".to_string(),
            ))
        }
    }
}

impl AccountHandle for LocalAccount {
    #[instrument(skip(self))]
    async fn balance(&self) -> Result<u64, Fault> {
        self.ensure_open()?;
        let balance = self.0.account.lock().balance;
        info!(balance, "balance retrieved");
        Ok(balance)
    }

    #[instrument(skip(self))]
    async fn deposit(&self, amount: i64) -> Result<(), Fault> {
        self.ensure_open()?;
        let balance = self.0.account.lock().deposit(amount)?;
        info!(amount, balance, "deposit completed");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn withdraw(&self, amount: i64) -> Result<(), Fault> {
        self.ensure_open()?;
        let balance = self.0.account.lock().withdraw(amount)?;
        info!(amount, balance, "withdrawal completed");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn shutdown(&self) -> Result<(), Fault> {
        self.ensure_open()?;
        self.0.open.store(false, Ordering::SeqCst);
        self.0.shutdown.send_replace(true);
        info!("shutdown requested");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn account_with_balance(opening_balance: u64) -> LocalAccount {
        LocalAccount::open(AccountConfig { opening_balance })
    }

    #[tokio::test]
    async fn test_balance_is_idempotent() {
        let account = account_with_balance(42);
        assert_eq!(account.balance().await, Ok(42));
        assert_eq!(account.balance().await, Ok(42));
    }

    #[tokio::test]
    async fn test_deposit_withdraw_sequence() {
        let account = account_with_balance(100);

        account.withdraw(30).await.unwrap();
        assert_eq!(account.balance().await, Ok(70));

        assert_matches!(
            account.withdraw(1000).await,
            Err(Fault::InsufficientFunds(_))
        );
        assert_eq!(account.balance().await, Ok(70));

        assert_matches!(account.deposit(-5).await, Err(Fault::InvalidAmount(_)));
        assert_eq!(account.balance().await, Ok(70));
    }

    #[tokio::test]
    async fn test_concurrent_deposits_are_not_lost() {
        let account = account_with_balance(0);

        let deposits = (0..100)
            .map(|_| {
                let account = account.clone();
                tokio::spawn(async move { account.deposit(1).await })
            })
            .collect::<Vec<_>>();
        for deposit in deposits {
            deposit.await.unwrap().unwrap();
        }

        assert_eq!(account.balance().await, Ok(100));
    }

    #[tokio::test]
    async fn test_shutdown_rejects_later_operations() {
        let account = account_with_balance(10);
        let mut shutdown_requested = account.shutdown_requested();
        assert!(!*shutdown_requested.borrow());

        account.shutdown().await.unwrap();

        assert!(shutdown_requested.changed().await.is_ok());
        assert!(*shutdown_requested.borrow());
        assert_matches!(
            account.balance().await,
            Err(Fault::ServiceUnavailable(_))
        );
        assert_matches!(
            account.deposit(1).await,
            Err(Fault::ServiceUnavailable(_))
        );
        assert_matches!(
            account.withdraw(1).await,
            Err(Fault::ServiceUnavailable(_))
        );
        assert_matches!(
            account.shutdown().await,
            Err(Fault::ServiceUnavailable(_))
        );
    }
}
