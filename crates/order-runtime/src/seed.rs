//! Demo catalog loaded at startup.

use customer_service::{Customer, InMemoryCustomerDirectory};
use product_service::{InMemoryProductCatalog, Product};
use rust_decimal::Decimal;

pub fn demo_products() -> Vec<Product> {
    vec![
        Product::new(1, "Mechanical Keyboard", Decimal::new(2000, 2), 100),
        Product::new(2, "USB-C Cable", Decimal::new(899, 2), 500),
        Product::new(3, "27\" Monitor", Decimal::new(24999, 2), 12),
    ]
}

pub fn demo_customers() -> Vec<Customer> {
    vec![
        Customer::new(1, "Ada Lovelace", "ada@example.com"),
        Customer::new(2, "Alan Turing", "alan@example.com"),
    ]
}

pub async fn seed(catalog: &InMemoryProductCatalog, directory: &InMemoryCustomerDirectory) {
    for product in demo_products() {
        catalog.insert(product).await;
    }
    for customer in demo_customers() {
        directory.insert(customer).await;
    }
}
