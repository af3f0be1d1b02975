//! Answers `validate-customer-request` from a [`CustomerDirectory`].

use crate::domain::CUSTOMER_NOT_FOUND;
use crate::error::CustomerServiceError;
use crate::ports::CustomerDirectory;
use async_trait::async_trait;
use shared_bus::{encode_payload, BusMessage, MessageHandler, MessagePublisher, TopicFilter};
use shared_types::{
    CustomerValidationResponse, ValidateCustomerRequest, CUSTOMER_SERVICE_GROUP,
    CUSTOMER_VALIDATION_RESPONSE_TOPIC, VALIDATE_CUSTOMER_REQUEST_TOPIC,
};
use std::sync::Arc;
use tracing::{error, info};

pub struct CustomerValidationConsumer {
    directory: Arc<dyn CustomerDirectory>,
    publisher: Arc<dyn MessagePublisher>,
}

impl CustomerValidationConsumer {
    pub fn new(directory: Arc<dyn CustomerDirectory>, publisher: Arc<dyn MessagePublisher>) -> Self {
        Self {
            directory,
            publisher,
        }
    }

    pub fn filter() -> TopicFilter {
        TopicFilter::topic(CUSTOMER_SERVICE_GROUP, VALIDATE_CUSTOMER_REQUEST_TOPIC)
    }

    pub async fn answer(
        &self,
        request: &ValidateCustomerRequest,
    ) -> Result<CustomerValidationResponse, CustomerServiceError> {
        let reply = match self.directory.find(request.customer_id).await? {
            Some(customer) => {
                CustomerValidationResponse::valid(request.correlation_id, customer.id, customer.name)
            }
            None => CustomerValidationResponse::rejected(
                request.correlation_id,
                request.customer_id,
                CUSTOMER_NOT_FOUND,
            ),
        };
        Ok(reply)
    }

    async fn process(&self, message: &BusMessage) -> Result<(), CustomerServiceError> {
        let request: ValidateCustomerRequest = message.decode()?;
        info!(
            correlation_id = %request.correlation_id,
            customer_id = request.customer_id,
            "Received customer validation request"
        );

        let reply = self.answer(&request).await?;
        let payload = encode_payload(CUSTOMER_VALIDATION_RESPONSE_TOPIC, &reply)?;
        self.publisher
            .publish(
                CUSTOMER_VALIDATION_RESPONSE_TOPIC,
                &request.correlation_id.as_key(),
                payload,
            )
            .await?;

        info!(
            correlation_id = %request.correlation_id,
            valid = reply.valid,
            "Sent customer validation response"
        );
        Ok(())
    }
}

#[async_trait]
impl MessageHandler for CustomerValidationConsumer {
    async fn handle(&self, message: BusMessage) {
        if let Err(e) = self.process(&message).await {
            error!(
                key = %message.key,
                error = %e,
                "Failed to answer customer validation request"
            );
        }
    }
}
