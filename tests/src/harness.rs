//! Test harness: the three services on one bus, with knobs for the
//! validators' behaviour.

use async_trait::async_trait;
use customer_service::{Customer, CustomerValidationConsumer, InMemoryCustomerDirectory};
use order_service::{
    CorrelationRegistry, InMemoryOrderRepository, OrderEventProducer, OrderService,
    ReplyDispatcher, ValidationService,
};
use product_service::{InMemoryProductCatalog, Product, ProductValidationConsumer};
use rust_decimal_macros::dec;
use shared_bus::{spawn_consumer, BusMessage, InMemoryMessageBus, MessageHandler};
use shared_types::{CustomerValidationResponse, ProductValidationResponse, ORDER_SERVICE_GROUP};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// How a validator behaves in a test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidatorMode {
    /// Answers immediately
    Live,
    /// Answers after the given delay
    Delayed(Duration),
    /// Never subscribes, so requests go unanswered
    Silent,
}

/// Delays every message before passing it on.
struct Delayed<H> {
    inner: Arc<H>,
    delay: Duration,
}

#[async_trait]
impl<H: MessageHandler> MessageHandler for Delayed<H> {
    async fn handle(&self, message: BusMessage) {
        tokio::time::sleep(self.delay).await;
        self.inner.handle(message).await;
    }
}

pub struct HarnessBuilder {
    timeout: Duration,
    products: ValidatorMode,
    customers: ValidatorMode,
}

impl Default for HarnessBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            products: ValidatorMode::Live,
            customers: ValidatorMode::Live,
        }
    }
}

impl HarnessBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn products(mut self, mode: ValidatorMode) -> Self {
        self.products = mode;
        self
    }

    pub fn customers(mut self, mode: ValidatorMode) -> Self {
        self.customers = mode;
        self
    }

    /// Wire everything. Must be called inside a Tokio runtime.
    pub fn build(self) -> Harness {
        let bus = Arc::new(InMemoryMessageBus::new());
        let products = Arc::new(CorrelationRegistry::new("product"));
        let customers = Arc::new(CorrelationRegistry::new("customer"));

        let catalog = InMemoryProductCatalog::with_products([
            Product::new(1, "Widget", dec!(20.00), 100),
            Product::new(2, "Gadget", dec!(7.25), 10),
        ]);
        let directory = InMemoryCustomerDirectory::with_customers([
            Customer::new(1, "Ada Lovelace", "ada@example.com"),
            Customer::new(2, "Alan Turing", "alan@example.com"),
        ]);

        let mut consumers = vec![spawn_consumer(
            bus.as_ref(),
            ReplyDispatcher::filter(ORDER_SERVICE_GROUP),
            Arc::new(ReplyDispatcher::new(
                Arc::clone(&products),
                Arc::clone(&customers),
            )),
        )];

        let product_validator = Arc::new(ProductValidationConsumer::new(
            Arc::new(catalog.clone()),
            bus.clone(),
        ));
        consumers.extend(attach(
            &bus,
            ProductValidationConsumer::filter(),
            product_validator,
            self.products,
        ));

        let customer_validator = Arc::new(CustomerValidationConsumer::new(
            Arc::new(directory.clone()),
            bus.clone(),
        ));
        consumers.extend(attach(
            &bus,
            CustomerValidationConsumer::filter(),
            customer_validator,
            self.customers,
        ));

        let validation = ValidationService::new(
            bus.clone(),
            Arc::clone(&products),
            Arc::clone(&customers),
            self.timeout,
        );
        let orders = Arc::new(OrderService::new(
            validation,
            Arc::new(InMemoryOrderRepository::new()),
            Arc::new(OrderEventProducer::new(bus.clone())),
        ));

        Harness {
            bus,
            products,
            customers,
            orders,
            catalog,
            directory,
            consumers,
        }
    }
}

fn attach<H: MessageHandler>(
    bus: &Arc<InMemoryMessageBus>,
    filter: shared_bus::TopicFilter,
    handler: Arc<H>,
    mode: ValidatorMode,
) -> Option<JoinHandle<()>> {
    match mode {
        ValidatorMode::Live => Some(spawn_consumer(bus.as_ref(), filter, handler)),
        ValidatorMode::Delayed(delay) => Some(spawn_consumer(
            bus.as_ref(),
            filter,
            Arc::new(Delayed {
                inner: handler,
                delay,
            }),
        )),
        ValidatorMode::Silent => None,
    }
}

/// A fully wired order flow.
pub struct Harness {
    pub bus: Arc<InMemoryMessageBus>,
    pub products: Arc<CorrelationRegistry<ProductValidationResponse>>,
    pub customers: Arc<CorrelationRegistry<CustomerValidationResponse>>,
    pub orders: Arc<OrderService>,
    pub catalog: InMemoryProductCatalog,
    pub directory: InMemoryCustomerDirectory,
    consumers: Vec<JoinHandle<()>>,
}

impl Harness {
    pub fn builder() -> HarnessBuilder {
        HarnessBuilder::default()
    }

    /// Live validators, default timeout.
    pub fn live() -> Self {
        Self::builder().build()
    }

    /// Waiters still parked in either registry.
    pub fn pending(&self) -> usize {
        self.products.pending_count() + self.customers.pending_count()
    }
}

impl Drop for Harness {
    fn drop(&mut self) {
        for consumer in &self.consumers {
            consumer.abort();
        }
    }
}
