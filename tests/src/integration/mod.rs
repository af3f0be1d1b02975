//! Cross-service flows over a real in-process bus.

pub mod flows;
