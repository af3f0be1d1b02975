//! # Order-Flow Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── harness.rs        # Full in-process wiring with tunable validators
//! └── integration/      # End-to-end order flows
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p order-flow-tests
//! cargo test -p order-flow-tests integration::
//! ```

pub mod harness;
pub mod integration;
