use crate::blockchain::block::Block;
use crate::blockchain::state::AccountState;
use crate::blockchain::validation::{validate_block_hash, validate_linkage};
use crate::config::LedgerConfig;
use crate::crypto::{hash_to_hex, Sha256Hash};
use crate::error::ChainError;
use crate::transaction::Transaction;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A ledger shared between threads. The whole ledger is one critical section.
pub type SharedBlockchain = Arc<Mutex<Blockchain>>;

/// The ledger state machine: block arena, pending queue and account state.
///
/// `state` always equals the replay of every transaction from genesis to
/// `head`. It changes only through [`Blockchain::apply_tx`],
/// [`Blockchain::mine_block`] and [`Blockchain::apply_block`].
#[derive(Debug, Clone)]
pub struct Blockchain {
    config: LedgerConfig,
    blocks: Vec<Block>,
    index: HashMap<Sha256Hash, usize>,
    head: Option<usize>,
    pending: VecDeque<Transaction>,
    state: AccountState,
}

impl Default for Blockchain {
    fn default() -> Self {
        Self::new(LedgerConfig::default())
    }
}

impl Blockchain {
    /// Create an empty ledger. The first block mined or applied becomes genesis.
    pub fn new(config: LedgerConfig) -> Self {
        Blockchain {
            config,
            blocks: Vec::new(),
            index: HashMap::new(),
            head: None,
            pending: VecDeque::new(),
            state: AccountState::new(),
        }
    }

    /// Wrap the ledger for use from several threads.
    pub fn into_shared(self) -> SharedBlockchain {
        Arc::new(Mutex::new(self))
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn head(&self) -> Option<&Block> {
        self.head.map(|i| &self.blocks[i])
    }

    pub fn head_hash(&self) -> Option<Sha256Hash> {
        self.head().map(Block::hash)
    }

    pub fn state(&self) -> &AccountState {
        &self.state
    }

    pub fn balance(&self, account: &str) -> i64 {
        self.state.balance(account)
    }

    /// Number of blocks on the chain.
    pub fn height(&self) -> u64 {
        self.blocks.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn pending(&self) -> impl Iterator<Item = &Transaction> {
        self.pending.iter()
    }

    /// Look up a block on the chain by its hash.
    pub fn get_block(&self, hash: &Sha256Hash) -> Option<&Block> {
        self.index.get(hash).map(|&i| &self.blocks[i])
    }

    /// Walk the chain from head back to genesis.
    pub fn iter(&self) -> ChainIter<'_> {
        ChainIter {
            chain: self,
            next: self.head,
        }
    }

    /// Queue a transaction for the next mined block. Validation is deferred.
    pub fn submit_transaction(&mut self, tx: Transaction) {
        debug!(tx = %tx.hash_str(), "transaction submitted");
        self.pending.push_back(tx);
    }

    /// Check `tx` against the current state and return the rejection reason.
    pub fn validate(&self, tx: &Transaction) -> Result<(), ChainError> {
        tx.validate(&self.state, self.config.miner_reward)
    }

    /// Boolean view of [`Blockchain::validate`]; logs why a transaction is rejected.
    pub fn is_valid(&self, tx: &Transaction) -> bool {
        match self.validate(tx) {
            Ok(()) => true,
            Err(reason) => {
                warn!(tx = %tx.hash_str(), "{}", rejection_label(&reason));
                false
            }
        }
    }

    /// Validate `tx` against the current state and, if valid, apply it.
    ///
    /// Either both balances change or neither does.
    pub fn apply_tx(&mut self, tx: &Transaction) -> Result<(), ChainError> {
        if let Err(reason) = self.validate(tx) {
            warn!(tx = %tx.hash_str(), %reason, "{}", rejection_label(&reason));
            return Err(reason);
        }
        self.state.transfer(tx)?;
        debug!(
            tx = %tx.hash_str(),
            sender = tx.sender(),
            recipient = tx.recipient(),
            amount = tx.amount(),
            "transaction applied"
        );
        Ok(())
    }

    /// Assemble a block from the pending queue and append it.
    ///
    /// The coinbase reward for `miner` is attempted first. Pending
    /// transactions are then drained in FIFO order until `max_tx_per_block`
    /// of them have been accepted or the queue is empty; rejected ones are
    /// dropped for good.
    pub fn mine_block(&mut self, miner: &str) -> &Block {
        let cap = self.config.max_tx_per_block;
        let mut accepted = Vec::new();

        let coinbase = Transaction::coinbase(miner, self.config.miner_reward);
        if self.apply_tx(&coinbase).is_ok() {
            accepted.push(coinbase);
        }

        let mut included = 0;
        let mut dropped = 0;
        while included < cap {
            let Some(tx) = self.pending.pop_front() else {
                break;
            };
            if self.apply_tx(&tx).is_ok() {
                accepted.push(tx);
                included += 1;
            } else {
                dropped += 1;
            }
        }

        let block = Block::new(accepted, self.head());
        info!(
            block = %block.hash_str(),
            height = self.height() + 1,
            transactions = block.transactions().len(),
            dropped,
            miner,
            "mined block"
        );
        self.push_block(block)
    }

    /// Append a block produced elsewhere.
    ///
    /// The block must extend the current head. Its transactions are applied in
    /// order; if any is invalid the state is restored to what it was before the
    /// call and the head does not move.
    ///
    /// The stored hash is re-checked against the content before anything is
    /// applied. `Block` can only be built through its constructors, so this
    /// holds today; the check guards blocks decoded from outside once a
    /// decoder exists.
    pub fn apply_block(&mut self, block: Block) -> Result<(), ChainError> {
        validate_block_hash(&block)?;
        if let Err(err) = validate_linkage(self.head_hash(), &block) {
            warn!(block = %block.hash_str(), %err, "rejected block");
            return Err(err);
        }

        let snapshot = self.state.clone();
        for (index, tx) in block.transactions().iter().enumerate() {
            if let Err(reason) = self.apply_tx(tx) {
                self.state = snapshot;
                warn!(
                    block = %block.hash_str(),
                    index,
                    "block contains invalid transaction, reverting"
                );
                return Err(ChainError::BlockContainsInvalidTransaction {
                    index,
                    tx_hash: tx.hash_str(),
                    reason: Box::new(reason),
                });
            }
        }

        self.forget_included(&block);
        debug!(block = %block.hash_str(), height = self.height() + 1, "applied block");
        self.push_block(block);
        Ok(())
    }

    /// Recompute account balances by replaying every block from genesis.
    pub fn replay_state(&self) -> Result<AccountState, ChainError> {
        let mut blocks: Vec<&Block> = self.iter().collect();
        blocks.reverse();

        let mut state = AccountState::new();
        for block in blocks {
            for tx in block.transactions() {
                tx.validate(&state, self.config.miner_reward)?;
                state.transfer(tx)?;
            }
        }
        Ok(state)
    }

    /// Check hash linkage, per-block digests and that the live state matches a replay.
    pub fn verify_integrity(&self) -> Result<(), ChainError> {
        let mut reached = 0;
        for block in self.iter() {
            validate_block_hash(block)?;
            if let Some(previous) = block.previous_hash() {
                if !self.index.contains_key(&previous) {
                    return Err(ChainError::BrokenChain(format!(
                        "block {} links to unknown block {}",
                        block.hash_str(),
                        hash_to_hex(&previous)
                    )));
                }
            }
            reached += 1;
        }
        if reached != self.blocks.len() {
            return Err(ChainError::BrokenChain(format!(
                "{} of {} blocks reachable from head",
                reached,
                self.blocks.len()
            )));
        }

        if self.replay_state()? != self.state {
            return Err(ChainError::StateMismatch);
        }
        Ok(())
    }

    fn push_block(&mut self, block: Block) -> &Block {
        let position = self.blocks.len();
        self.index.insert(block.hash(), position);
        self.blocks.push(block);
        self.head = Some(position);
        &self.blocks[position]
    }

    /// Drop pending transactions that `block` already put on chain, one queue
    /// entry per included transaction.
    fn forget_included(&mut self, block: &Block) {
        let mut included: HashMap<Sha256Hash, usize> = HashMap::new();
        for tx in block.transactions() {
            *included.entry(tx.hash()).or_insert(0) += 1;
        }

        let before = self.pending.len();
        self.pending.retain(|tx| match included.get_mut(&tx.hash()) {
            Some(count) if *count > 0 => {
                *count -= 1;
                false
            }
            _ => true,
        });
        let removed = before - self.pending.len();
        if removed > 0 {
            debug!(removed, "pruned pending transactions included in applied block");
        }
    }
}

fn rejection_label(reason: &ChainError) -> &'static str {
    match reason {
        ChainError::RewardMismatch { .. } => "reward amount mismatch",
        ChainError::InsufficientBalance { .. } => "insufficient balance",
        ChainError::NegativeAmount(_) => "negative amount",
        ChainError::ReservedAccount(_) => "reserved account",
        ChainError::BalanceOverflow(_) => "balance overflow",
        _ => "invalid transaction",
    }
}

/// Iterator from head to genesis, following `previous_hash` through the index.
pub struct ChainIter<'a> {
    chain: &'a Blockchain,
    next: Option<usize>,
}

impl<'a> Iterator for ChainIter<'a> {
    type Item = &'a Block;

    fn next(&mut self) -> Option<Self::Item> {
        let chain = self.chain;
        let block = &chain.blocks[self.next?];
        self.next = block
            .previous_hash()
            .and_then(|hash| chain.index.get(&hash).copied());
        Some(block)
    }
}
