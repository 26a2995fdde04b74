use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// The single bank account: a non-negative balance in minor units.
///
/// State transitions are pure; serializing concurrent access is the owner's
/// concern (see [`LocalAccount`](crate::domain::LocalAccount)).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Account {
    pub balance: u64,
}

impl Account {
    pub fn new(balance: u64) -> Self {
        Self { balance }
    }

    /// Add `amount` to the balance. `amount` must be strictly positive and the
    /// resulting balance must fit into `u64`; on failure the balance is
    /// unchanged.
    pub fn deposit(&mut self, amount: i64) -> Result<u64, DepositError> {
        if amount <= 0 {
            return Err(DepositError::NotPositive(amount));
        }
        let balance =
            self.balance
                .checked_add(amount as u64)
                .ok_or(DepositError::BalanceOverflow {
                    balance: self.balance,
                    amount: amount as u64,
                })?;
        self.balance = balance;
        Ok(balance)
    }

    /// Subtract `amount` from the balance. `amount` must be strictly positive
    /// and must not exceed the balance; on failure the balance is unchanged.
    pub fn withdraw(&mut self, amount: i64) -> Result<u64, WithdrawError> {
        if amount <= 0 {
            return Err(WithdrawError::NotPositive(amount));
        }
        let amount = amount as u64;
        if amount > self.balance {
            return Err(WithdrawError::InsufficientFunds {
                balance: self.balance,
                amount,
            });
        }
        self.balance -= amount;
        Ok(self.balance)
    }
}

/// Amount for a deposit or a withdrawal, in minor units. Signed on the wire,
/// so that non-positive amounts reach the service and are rejected there.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct Amount {
    pub amount: i64,
}

/// Configuration applied when the service opens its account.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AccountConfig {
    pub opening_balance: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DepositError {
    #[error("deposit amount must be strictly positive, got {0}")]
    NotPositive(i64),

    #[error("deposit of {amount} overflows balance {balance}")]
    BalanceOverflow { balance: u64, amount: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WithdrawError {
    #[error("withdrawal amount must be strictly positive, got {0}")]
    NotPositive(i64),

    #[error("withdrawal of {amount} exceeds balance {balance}")]
    InsufficientFunds { balance: u64, amount: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_deposit_rejects_non_positive_amounts() {
        let mut account = Account::new(70);
        assert_eq!(account.deposit(0), Err(DepositError::NotPositive(0)));
        assert_eq!(account.deposit(-5), Err(DepositError::NotPositive(-5)));
        assert_eq!(account.balance, 70);
    }

    #[test]
    fn test_deposit_rejects_balance_overflow() {
        let mut account = Account::new(u64::MAX - 1);
        assert_matches!(account.deposit(2), Err(DepositError::BalanceOverflow { .. }));
        assert_eq!(account.balance, u64::MAX - 1);
    }

    #[test]
    fn test_withdraw_rejects_non_positive_amounts() {
        let mut account = Account::new(70);
        assert_eq!(account.withdraw(0), Err(WithdrawError::NotPositive(0)));
        assert_eq!(account.withdraw(-5), Err(WithdrawError::NotPositive(-5)));
        assert_eq!(account.balance, 70);
    }

    #[test]
    fn test_withdraw_rejects_insufficient_funds() {
        let mut account = Account::new(70);
        assert_eq!(
            account.withdraw(1000),
            Err(WithdrawError::InsufficientFunds {
                balance: 70,
                amount: 1000
            })
        );
        assert_eq!(account.balance, 70);
    }

    #[test]
    fn test_operation_sequence() {
        let mut account = Account::new(100);
        assert_eq!(account.withdraw(30), Ok(70));
        assert_matches!(
            account.withdraw(1000),
            Err(WithdrawError::InsufficientFunds { .. })
        );
        assert_matches!(account.deposit(-5), Err(DepositError::NotPositive(-5)));
        assert_eq!(account.balance, 70);
    }
}
