//! Domain layer modules
//!
//! This module contains business domain logic:
//! - `batch`: Batch processing of the "send form results" action
//! - `catalog`: Message artifacts and forms
//! - `personalization`: Form-field placeholder substitution
//! - `recipient`: Recipients and the dispatch gate
//! - `sender`: Sender boundary and the in-memory outbox
//! - `submission`: Form submissions and their resolver

pub mod batch;
pub mod catalog;
pub mod personalization;
pub mod recipient;
pub mod sender;
pub mod submission;
