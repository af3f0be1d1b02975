//! Adapters (hexagonal architecture).

pub mod bus_adapter;
pub mod in_memory;

pub use bus_adapter::CustomerValidationConsumer;
pub use in_memory::InMemoryCustomerDirectory;
