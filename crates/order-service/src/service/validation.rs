//! Fan-in of the product and customer validations.

use crate::domain::config::OrderServiceConfig;
use crate::domain::error::OrderError;
use crate::domain::registry::{CorrelationRegistry, ReplyOutcome};
use crate::ipc::client::{ReplyHandle, RequestReplyClient};
use shared_bus::MessagePublisher;
use shared_types::{
    CustomerId, CustomerValidationResponse, ProductId, ProductValidationResponse,
    ValidateCustomerRequest, ValidateProductRequest, ValidationReply,
    VALIDATE_CUSTOMER_REQUEST_TOPIC, VALIDATE_PRODUCT_REQUEST_TOPIC,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

pub const PRODUCT_TIMEOUT_REASON: &str = "Product validation timeout";
pub const CUSTOMER_TIMEOUT_REASON: &str = "Customer validation timeout";
pub const PRODUCT_FAILED_REASON: &str = "Product validation failed";
pub const CUSTOMER_FAILED_REASON: &str = "Customer validation failed";

/// Combined result of both validations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationVerdict {
    Approved {
        product: ProductValidationResponse,
        customer: CustomerValidationResponse,
    },
    Rejected {
        reason: String,
    },
}

impl ValidationVerdict {
    pub fn is_approved(&self) -> bool {
        matches!(self, ValidationVerdict::Approved { .. })
    }
}

/// Issues validation requests and joins their replies.
pub struct ValidationService {
    products: RequestReplyClient<ProductValidationResponse>,
    customers: RequestReplyClient<CustomerValidationResponse>,
}

impl ValidationService {
    pub fn new(
        publisher: Arc<dyn MessagePublisher>,
        products: Arc<CorrelationRegistry<ProductValidationResponse>>,
        customers: Arc<CorrelationRegistry<CustomerValidationResponse>>,
        timeout: Duration,
    ) -> Self {
        Self {
            products: RequestReplyClient::new(products, Arc::clone(&publisher), timeout),
            customers: RequestReplyClient::new(customers, publisher, timeout),
        }
    }

    /// Build from a service configuration, rejecting invalid settings.
    pub fn from_config(
        config: &OrderServiceConfig,
        publisher: Arc<dyn MessagePublisher>,
        products: Arc<CorrelationRegistry<ProductValidationResponse>>,
        customers: Arc<CorrelationRegistry<CustomerValidationResponse>>,
    ) -> Result<Self, OrderError> {
        config.validate()?;
        Ok(Self::new(
            publisher,
            products,
            customers,
            config.validation_timeout,
        ))
    }

    pub async fn validate_product(
        &self,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<ReplyHandle<ProductValidationResponse>, OrderError> {
        self.products
            .request(
                VALIDATE_PRODUCT_REQUEST_TOPIC,
                |correlation_id| ValidateProductRequest {
                    correlation_id,
                    product_id,
                    quantity,
                },
                None,
            )
            .await
    }

    pub async fn validate_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<ReplyHandle<CustomerValidationResponse>, OrderError> {
        self.customers
            .request(
                VALIDATE_CUSTOMER_REQUEST_TOPIC,
                |correlation_id| ValidateCustomerRequest {
                    correlation_id,
                    customer_id,
                },
                None,
            )
            .await
    }

    /// Issue both requests, then wait for both replies.
    pub async fn validate(
        &self,
        customer_id: CustomerId,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<ValidationVerdict, OrderError> {
        let product = self.validate_product(product_id, quantity).await?;
        let customer = self.validate_customer(customer_id).await?;
        Ok(Self::join(product, customer).await)
    }

    /// Wait for both handles concurrently.
    ///
    /// Never short-circuits: a fast rejection still waits for the other
    /// reply, so total latency is the slower of the two. The first failure
    /// in order (product, then customer) supplies the reason.
    pub async fn join(
        product: ReplyHandle<ProductValidationResponse>,
        customer: ReplyHandle<CustomerValidationResponse>,
    ) -> ValidationVerdict {
        let (product_id, customer_id) = (product.correlation_id(), customer.correlation_id());
        let (product, customer) = tokio::join!(product, customer);

        debug!(
            product_correlation_id = %product_id,
            customer_correlation_id = %customer_id,
            product_resolved = product.is_resolved(),
            customer_resolved = customer.is_resolved(),
            "Validations joined"
        );
        verdict(product, customer)
    }

    pub fn pending_count(&self) -> usize {
        self.products.pending_count() + self.customers.pending_count()
    }
}

fn verdict(
    product: ReplyOutcome<ProductValidationResponse>,
    customer: ReplyOutcome<CustomerValidationResponse>,
) -> ValidationVerdict {
    let product = match accepted(product, PRODUCT_TIMEOUT_REASON, PRODUCT_FAILED_REASON) {
        Ok(reply) => reply,
        Err(reason) => return ValidationVerdict::Rejected { reason },
    };
    let customer = match accepted(customer, CUSTOMER_TIMEOUT_REASON, CUSTOMER_FAILED_REASON) {
        Ok(reply) => reply,
        Err(reason) => return ValidationVerdict::Rejected { reason },
    };
    ValidationVerdict::Approved { product, customer }
}

fn accepted<R: ValidationReply>(
    outcome: ReplyOutcome<R>,
    timeout_reason: &str,
    fallback_reason: &str,
) -> Result<R, String> {
    match outcome {
        ReplyOutcome::TimedOut => Err(timeout_reason.to_string()),
        ReplyOutcome::Resolved(reply) if reply.is_valid() => Ok(reply),
        ReplyOutcome::Resolved(reply) => Err(reply
            .error_message()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(fallback_reason)
            .to_string()),
    }
}
