pub mod revocation_store;
pub mod state_store;

pub use revocation_store::*;
pub use state_store::*;
