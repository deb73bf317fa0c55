//! Recipients and the per-recipient dispatch gate.

mod gate;
mod types;

pub use gate::{DispatchGate, GateDecision, DEFAULT_ADDRESS_FIELD, NO_ADDRESS_REASON, OWNER_FIELD};
pub use types::{Credentials, Recipient};
