use crate::domain::{DepositError, WithdrawError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// A resolved, callable reference to the remote account, abstracting away
/// whether calls cross a process boundary.
#[trait_variant::make(Send)]
pub trait AccountHandle
where
    Self: Clone + Send + Sync + 'static,
{
    /// Current balance in minor units. Read-only.
    async fn balance(&self) -> Result<u64, Fault>;

    /// Add a strictly positive `amount` to the balance.
    async fn deposit(&self, amount: i64) -> Result<(), Fault>;

    /// Subtract a strictly positive `amount` not exceeding the balance.
    async fn withdraw(&self, amount: i64) -> Result<(), Fault>;

    /// Request orderly termination of the service. One-way: once accepted,
    /// every later operation fails with [`Fault::ServiceUnavailable`].
    async fn shutdown(&self) -> Result<(), Fault>;
}

/// Why an operation could not complete, as reported across the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error, ToSchema)]
#[serde(rename_all = "kebab-case", tag = "fault", content = "message")]
pub enum Fault {
    /// A deposit/withdrawal amount the account rejects; no state change.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// A withdrawal exceeding the balance; no state change.
    #[error("insufficient funds: {0}")]
    InsufficientFunds(String),

    /// The account cannot be resolved, or the service is shutting down.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    /// The call itself could not be completed. Raised on the client side only.
    #[error("transport failure: {0}")]
    TransportFailure(String),
}

impl From<DepositError> for Fault {
    fn from(error: DepositError) -> Self {
        Fault::InvalidAmount(error.to_string())
    }
}

impl From<WithdrawError> for Fault {
    fn from(error: WithdrawError) -> Self {
        match error {
            WithdrawError::NotPositive(_) => Fault::InvalidAmount(error.to_string()),
            WithdrawError::InsufficientFunds { .. } => {
                Fault::InsufficientFunds(error.to_string())
            }
        }
    }
}
