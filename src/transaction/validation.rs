/// Validation logic for transactions separated from type definitions
use crate::blockchain::AccountState;
use crate::error::ChainError;
use crate::transaction::types::{Transaction, COINBASE_SENDER};

impl Transaction {
    /// Validate this transaction against the current account state.
    ///
    /// Coinbase transactions must carry exactly `miner_reward` and pay a real
    /// account; ordinary transfers must be covered by the sender's balance.
    /// Negative amounts are always rejected.
    pub fn validate(&self, state: &AccountState, miner_reward: i64) -> Result<(), ChainError> {
        if self.amount() < 0 {
            return Err(ChainError::NegativeAmount(self.amount()));
        }

        if self.is_coinbase() {
            if self.recipient() == COINBASE_SENDER {
                return Err(ChainError::ReservedAccount(COINBASE_SENDER.to_string()));
            }
            if self.amount() != miner_reward {
                return Err(ChainError::RewardMismatch {
                    expected: miner_reward,
                    found: self.amount(),
                });
            }
            return Ok(());
        }

        let balance = state.balance(self.sender());
        if balance < self.amount() {
            return Err(ChainError::InsufficientBalance {
                account: self.sender().to_string(),
                balance,
                amount: self.amount(),
            });
        }

        Ok(())
    }
}
