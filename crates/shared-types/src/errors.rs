//! # Error Types
//!
//! Defines error types for the wire contract.

use crate::correlation::CorrelationId;
use thiserror::Error;

/// A validation reply that breaks the reply contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractError {
    /// Rejection sent without a reason.
    #[error("reply {correlation_id} rejects without an error message")]
    MissingErrorMessage { correlation_id: CorrelationId },

    /// Acceptance that also carries an error message.
    #[error("reply {correlation_id} accepts but carries an error message")]
    UnexpectedErrorMessage { correlation_id: CorrelationId },
}
