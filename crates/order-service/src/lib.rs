//! # Order Service
//!
//! Places orders after asking the product and customer services, over the
//! message bus, whether the order is acceptable.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                          ORDER SERVICE                           │
//! ├──────────────────────────────────────────────────────────────────┤
//! │  OrderService::create_order                                      │
//! │        │                                                         │
//! │  ┌─────┴──────────────────────────┐                              │
//! │  │ ValidationService (fan-in)     │  join(product, customer)     │
//! │  └─────┬──────────────────┬───────┘                              │
//! │        │                  │                                      │
//! │  RequestReplyClient  RequestReplyClient  ← timer per request     │
//! │        │                  │                                      │
//! │  ┌─────┴──────────────────┴───────┐                              │
//! │  │   CorrelationRegistry (x2)     │  ← ReplyDispatcher.resolve   │
//! │  └────────────────────────────────┘                              │
//! └────────────────────────┬─────────────────────────────────────────┘
//!                          │
//!                     Message Bus
//!                          │
//!           ┌──────────────┴──────────────┐
//!           ▼                             ▼
//!    product-service               customer-service
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use order_service::{
//!     CorrelationRegistry, InMemoryOrderRepository, OrderEventProducer, OrderService,
//!     ReplyDispatcher, ValidationService,
//! };
//!
//! let products = Arc::new(CorrelationRegistry::new("product"));
//! let customers = Arc::new(CorrelationRegistry::new("customer"));
//! spawn_consumer(bus.as_ref(), ReplyDispatcher::filter("order-service"),
//!     Arc::new(ReplyDispatcher::new(products.clone(), customers.clone())));
//!
//! let validation = ValidationService::new(bus.clone(), products, customers, timeout);
//! let service = OrderService::new(validation, repository, events);
//! let decision = service.create_order(1, 1, 5).await?;
//! ```

pub mod adapters;
pub mod domain;
pub mod ipc;
pub mod ports;
pub mod service;

pub use adapters::{InMemoryOrderRepository, OrderEventProducer};
pub use domain::{
    ConfigError, CorrelationRegistry, NewOrder, Order, OrderDecision, OrderError,
    OrderServiceConfig, OrderStatus, RegistryError, RegistryStats, ReplyOutcome, StatsSnapshot,
    DEFAULT_VALIDATION_TIMEOUT,
};
pub use ipc::{ReplyDispatcher, ReplyHandle, RequestReplyClient, RequestState};
pub use ports::{OrderEventPublisher, OrderRepository};
pub use service::{
    OrderService, ValidationService, ValidationVerdict, CUSTOMER_FAILED_REASON,
    CUSTOMER_TIMEOUT_REASON, PRODUCT_FAILED_REASON, PRODUCT_TIMEOUT_REASON,
    QUANTITY_MUST_BE_POSITIVE,
};
