pub mod initialize_ledger;
pub mod deposit;
pub mod create_schedule;
pub mod release;
pub mod revoke;
pub mod withdraw;
pub mod quote_releasable;

pub use initialize_ledger::*;
pub use deposit::*;
pub use create_schedule::*;
pub use release::*;
pub use revoke::*;
pub use withdraw::*;
pub use quote_releasable::*;
