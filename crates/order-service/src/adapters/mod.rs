//! Adapters (hexagonal architecture).

pub mod events;
pub mod in_memory;

pub use events::OrderEventProducer;
pub use in_memory::InMemoryOrderRepository;
