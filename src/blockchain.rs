// Thin re-export module: the ledger is split into the block value type, the
// account state, linkage validation and the chain state machine itself.

pub mod block;
pub mod chain;
pub mod state;
pub mod validation;

pub use block::*;
pub use chain::*;
pub use state::*;
pub use validation::*;
