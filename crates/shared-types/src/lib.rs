//! # Shared Types Crate
//!
//! This crate contains the wire contract between the order, product and
//! customer services.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: topic names and message records are defined
//!   here and nowhere else.
//! - **Keyed by correlation**: every validation request and reply is keyed on
//!   the bus by its `CorrelationId`, so one exchange never spans partitions.
//! - **Rejections are data**: an unknown product or customer is a reply with
//!   `valid=false`, never a transport error.

pub mod correlation;
pub mod errors;
pub mod messages;
pub mod topics;

pub use correlation::CorrelationId;
pub use errors::*;
pub use messages::*;
pub use topics::*;
