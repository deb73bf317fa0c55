//! Sender boundary.
//!
//! The batch processor hands every personalized message to a `Sender`.
//! Whatever shape the underlying transport reports errors in, it is
//! normalized into a `SendOutcome` here, once.

mod outbox;
mod types;

pub use outbox::{OutboxSender, SentMessage, DEFAULT_OUTBOX_CAPACITY, DO_NOT_CONTACT_REASON};
pub use types::{
    OutgoingMessage, SendOptions, SendOutcome, Sender, SourceTag, REASON_SEPARATOR,
};
