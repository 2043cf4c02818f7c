use crate::error::ChainError;
use crate::transaction::Transaction;
use std::collections::BTreeMap;

/// Materialized account balances.
///
/// Accounts absent from the map have a balance of zero. Entries are created the
/// first time a non-zero amount is credited or debited, and are kept afterwards
/// even if the balance returns to zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct AccountState {
    balances: BTreeMap<String, i64>,
}

impl AccountState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance(&self, account: &str) -> i64 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Accounts with a recorded balance, in ascending name order.
    pub fn accounts(&self) -> impl Iterator<Item = (&str, i64)> {
        self.balances.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.balances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }

    /// Sum of all recorded balances.
    pub fn total_supply(&self) -> i128 {
        self.balances.values().map(|v| *v as i128).sum()
    }

    /// Move `tx.amount` from sender to recipient.
    ///
    /// Both new balances are computed before either is written, so an
    /// overflow leaves the state untouched. Coinbase transactions only credit
    /// the recipient. This does not check validity; see `Transaction::validate`.
    pub fn transfer(&mut self, tx: &Transaction) -> Result<(), ChainError> {
        let amount = tx.amount();
        if amount == 0 || (!tx.is_coinbase() && tx.sender() == tx.recipient()) {
            return Ok(());
        }

        let credited = self
            .balance(tx.recipient())
            .checked_add(amount)
            .ok_or_else(|| ChainError::BalanceOverflow(tx.recipient().to_string()))?;

        if tx.is_coinbase() {
            self.balances.insert(tx.recipient().to_string(), credited);
            return Ok(());
        }

        let debited = self
            .balance(tx.sender())
            .checked_sub(amount)
            .ok_or_else(|| ChainError::BalanceOverflow(tx.sender().to_string()))?;

        self.balances.insert(tx.sender().to_string(), debited);
        self.balances.insert(tx.recipient().to_string(), credited);
        Ok(())
    }
}
