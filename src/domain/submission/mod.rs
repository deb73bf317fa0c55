//! Form submissions.
//!
//! This module provides:
//! - Submission and answer types, keeping "missing" and "empty" answers apart
//! - The `FormResultResolver` trait the batch processor reads submissions through
//! - An in-memory store implementing the resolver

mod memory_store;
mod resolver;
mod types;

pub use memory_store::MemorySubmissionStore;
pub use resolver::FormResultResolver;
pub use types::{
    Answer, Answers, CreateSubmissionRequest, Submission, SubmissionError,
    SubmissionListResponse, SubmissionResult,
};
