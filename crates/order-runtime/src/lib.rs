//! # Order-Flow Runtime
//!
//! Wires the three services onto one in-process message bus.
//!
//! ```text
//!                 ┌──────────── InMemoryMessageBus ────────────┐
//!                 │                                            │
//! OrderService ──→ validate-product-request ──→ ProductValidationConsumer
//!      ↑          validate-customer-request ──→ CustomerValidationConsumer
//!      │                                            │
//! ReplyDispatcher ←── *-validation-response ←───────┘
//!      │
//!      └─ order-created ──→ OrderEventConsumer
//! ```
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (defaults, then environment)
//! 2. Build registries, services and adapters
//! 3. Subscribe every consumer before any request is published
//! 4. Optionally seed the demo catalog

pub mod config;
pub mod seed;

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::task::JoinHandle;
use tracing::info;

use customer_service::{CustomerValidationConsumer, InMemoryCustomerDirectory};
use order_service::{
    CorrelationRegistry, InMemoryOrderRepository, OrderEventProducer, OrderService,
    ReplyDispatcher, ValidationService,
};
use product_service::{InMemoryProductCatalog, OrderEventConsumer, ProductValidationConsumer};
use shared_bus::{spawn_consumer, InMemoryMessageBus};
use shared_types::{CustomerValidationResponse, ProductValidationResponse};

pub use config::RuntimeConfig;

/// All services of one order-flow process.
pub struct OrderFlowRuntime {
    config: RuntimeConfig,
    bus: Arc<InMemoryMessageBus>,
    products: Arc<CorrelationRegistry<ProductValidationResponse>>,
    customers: Arc<CorrelationRegistry<CustomerValidationResponse>>,
    orders: OrderService,
    catalog: InMemoryProductCatalog,
    directory: InMemoryCustomerDirectory,
    order_events: Arc<OrderEventConsumer>,
    consumers: Vec<JoinHandle<()>>,
}

impl OrderFlowRuntime {
    pub fn new(config: RuntimeConfig) -> Result<Self> {
        let bus = Arc::new(InMemoryMessageBus::with_capacity(config.bus_capacity));
        let products = Arc::new(CorrelationRegistry::new("product"));
        let customers = Arc::new(CorrelationRegistry::new("customer"));

        let validation = ValidationService::from_config(
            &config.service,
            bus.clone(),
            Arc::clone(&products),
            Arc::clone(&customers),
        )
        .context("invalid order service configuration")?;
        let orders = OrderService::new(
            validation,
            Arc::new(InMemoryOrderRepository::new()),
            Arc::new(OrderEventProducer::new(bus.clone())),
        );

        Ok(Self {
            config,
            bus,
            products,
            customers,
            orders,
            catalog: InMemoryProductCatalog::new(),
            directory: InMemoryCustomerDirectory::new(),
            order_events: Arc::new(OrderEventConsumer::new()),
            consumers: Vec::new(),
        })
    }

    /// Subscribe all consumers and seed the demo catalog if configured.
    pub async fn start(&mut self) -> Result<()> {
        if self.is_running() {
            anyhow::bail!("runtime already started");
        }

        let bus = self.bus.as_ref();
        self.consumers = vec![
            spawn_consumer(
                bus,
                ReplyDispatcher::filter(&self.config.service.consumer_group),
                Arc::new(ReplyDispatcher::new(
                    Arc::clone(&self.products),
                    Arc::clone(&self.customers),
                )),
            ),
            spawn_consumer(
                bus,
                ProductValidationConsumer::filter(),
                Arc::new(ProductValidationConsumer::new(
                    Arc::new(self.catalog.clone()),
                    self.bus.clone(),
                )),
            ),
            spawn_consumer(
                bus,
                CustomerValidationConsumer::filter(),
                Arc::new(CustomerValidationConsumer::new(
                    Arc::new(self.directory.clone()),
                    self.bus.clone(),
                )),
            ),
            spawn_consumer(
                bus,
                OrderEventConsumer::filter(),
                Arc::clone(&self.order_events),
            ),
        ];

        if self.config.seed_catalog {
            seed::seed(&self.catalog, &self.directory).await;
            info!("Seeded demo catalog");
        }

        info!(
            consumers = self.consumers.len(),
            validation_timeout_ms = self.config.service.validation_timeout.as_millis() as u64,
            "Order-flow runtime started"
        );
        Ok(())
    }

    /// Close the bus and stop every consumer.
    pub async fn shutdown(&mut self) {
        info!("Initiating graceful shutdown...");
        self.bus.close();
        for consumer in self.consumers.drain(..) {
            consumer.abort();
            let _ = consumer.await;
        }
        info!(
            pending_products = self.products.pending_count(),
            pending_customers = self.customers.pending_count(),
            "Shutdown complete"
        );
    }

    pub fn is_running(&self) -> bool {
        !self.consumers.is_empty()
    }

    pub fn orders(&self) -> &OrderService {
        &self.orders
    }

    pub fn catalog(&self) -> &InMemoryProductCatalog {
        &self.catalog
    }

    pub fn directory(&self) -> &InMemoryCustomerDirectory {
        &self.directory
    }

    pub fn bus(&self) -> &Arc<InMemoryMessageBus> {
        &self.bus
    }

    /// Number of `order-created` events the product service has seen.
    pub fn orders_announced(&self) -> u64 {
        self.order_events.orders_seen()
    }
}
