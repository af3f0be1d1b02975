use crate::domain::Customer;
use crate::error::DirectoryError;
use crate::ports::CustomerDirectory;
use async_trait::async_trait;
use shared_types::CustomerId;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory customer directory.
#[derive(Default, Clone)]
pub struct InMemoryCustomerDirectory {
    customers: Arc<RwLock<HashMap<CustomerId, Customer>>>,
}

impl InMemoryCustomerDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_customers(customers: impl IntoIterator<Item = Customer>) -> Self {
        let map = customers.into_iter().map(|c| (c.id, c)).collect();
        Self {
            customers: Arc::new(RwLock::new(map)),
        }
    }

    pub async fn insert(&self, customer: Customer) {
        self.customers.write().await.insert(customer.id, customer);
    }

    /// Returns false if the customer was not registered.
    pub async fn remove(&self, id: CustomerId) -> bool {
        self.customers.write().await.remove(&id).is_some()
    }
}

#[async_trait]
impl CustomerDirectory for InMemoryCustomerDirectory {
    async fn find(&self, id: CustomerId) -> Result<Option<Customer>, DirectoryError> {
        Ok(self.customers.read().await.get(&id).cloned())
    }
}
