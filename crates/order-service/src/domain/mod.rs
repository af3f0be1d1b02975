//! Domain layer: correlation state, orders, configuration and errors.

pub mod config;
pub mod error;
pub mod order;
pub mod registry;

pub use config::{OrderServiceConfig, DEFAULT_VALIDATION_TIMEOUT};
pub use error::{ConfigError, OrderError, RegistryError};
pub use order::{NewOrder, Order, OrderDecision, OrderStatus};
pub use registry::{CorrelationRegistry, RegistryStats, ReplyOutcome, StatsSnapshot};
