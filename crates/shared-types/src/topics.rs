//! # Bus Topics
//!
//! Topic names and consumer groups are the wire contract between services.
//! Renaming any of them breaks interoperability with deployed consumers.

/// Order service asks the product service to validate a product.
pub const VALIDATE_PRODUCT_REQUEST_TOPIC: &str = "validate-product-request";

/// Product service answers a product validation request.
pub const PRODUCT_VALIDATION_RESPONSE_TOPIC: &str = "product-validation-response";

/// Order service asks the customer service to validate a customer.
pub const VALIDATE_CUSTOMER_REQUEST_TOPIC: &str = "validate-customer-request";

/// Customer service answers a customer validation request.
pub const CUSTOMER_VALIDATION_RESPONSE_TOPIC: &str = "customer-validation-response";

/// Order service announces a committed order.
pub const ORDER_CREATED_TOPIC: &str = "order-created";

/// Consumer group of the order service.
pub const ORDER_SERVICE_GROUP: &str = "order-service";

/// Consumer group of the product service.
pub const PRODUCT_SERVICE_GROUP: &str = "product-service";

/// Consumer group of the customer service.
pub const CUSTOMER_SERVICE_GROUP: &str = "customer-service";

/// Every topic the workflow uses.
pub const ALL_TOPICS: [&str; 5] = [
    VALIDATE_PRODUCT_REQUEST_TOPIC,
    PRODUCT_VALIDATION_RESPONSE_TOPIC,
    VALIDATE_CUSTOMER_REQUEST_TOPIC,
    CUSTOMER_VALIDATION_RESPONSE_TOPIC,
    ORDER_CREATED_TOPIC,
];
