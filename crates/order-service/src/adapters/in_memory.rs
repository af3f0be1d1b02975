use crate::domain::error::OrderError;
use crate::domain::order::{NewOrder, Order, OrderStatus};
use crate::ports::outbound::OrderRepository;
use async_trait::async_trait;
use shared_types::{CustomerId, OrderId};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory order store.
///
/// IDs are assigned sequentially from 1 and never reused.
#[derive(Clone)]
pub struct InMemoryOrderRepository {
    inner: Arc<RwLock<Store>>,
}

struct Store {
    next_id: OrderId,
    orders: BTreeMap<OrderId, Order>,
}

impl Default for InMemoryOrderRepository {
    fn default() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Store {
                next_id: 1,
                orders: BTreeMap::new(),
            })),
        }
    }
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.orders.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn save(&self, order: NewOrder) -> Result<Order, OrderError> {
        let mut store = self.inner.write().await;
        let id = store.next_id;
        store.next_id += 1;

        let order = Order::from_new(id, order);
        store.orders.insert(id, order.clone());
        Ok(order)
    }

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, OrderError> {
        Ok(self.inner.read().await.orders.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Order>, OrderError> {
        Ok(self.inner.read().await.orders.values().cloned().collect())
    }

    async fn find_by_customer(&self, customer_id: CustomerId) -> Result<Vec<Order>, OrderError> {
        let store = self.inner.read().await;
        Ok(store
            .orders
            .values()
            .filter(|o| o.customer_id == customer_id)
            .cloned()
            .collect())
    }

    async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Option<Order>, OrderError> {
        let mut store = self.inner.write().await;
        Ok(store.orders.get_mut(&id).map(|order| {
            order.status = status;
            order.clone()
        }))
    }

    async fn delete(&self, id: OrderId) -> Result<bool, OrderError> {
        Ok(self.inner.write().await.orders.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn new_order(customer_id: CustomerId) -> NewOrder {
        NewOrder {
            customer_id,
            product_id: 1,
            quantity: 2,
            total_price: dec!(40.00),
            status: OrderStatus::Confirmed,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_ids_are_sequential() {
        let repo = InMemoryOrderRepository::new();
        let a = repo.save(new_order(1)).await.unwrap();
        let b = repo.save(new_order(1)).await.unwrap();
        assert_eq!((a.id, b.id), (1, 2));

        // Deleted IDs are not handed out again
        assert!(repo.delete(b.id).await.unwrap());
        let c = repo.save(new_order(1)).await.unwrap();
        assert_eq!(c.id, 3);
    }

    #[tokio::test]
    async fn test_find_by_customer() {
        let repo = InMemoryOrderRepository::new();
        repo.save(new_order(1)).await.unwrap();
        repo.save(new_order(2)).await.unwrap();
        repo.save(new_order(1)).await.unwrap();

        let ids: Vec<_> = repo
            .find_by_customer(1)
            .await
            .unwrap()
            .into_iter()
            .map(|o| o.id)
            .collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(repo.find_all().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_update_status_and_delete_unknown() {
        let repo = InMemoryOrderRepository::new();
        let order = repo.save(new_order(1)).await.unwrap();

        let updated = repo
            .update_status(order.id, OrderStatus::Shipped)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, OrderStatus::Shipped);
        assert_eq!(
            repo.find_by_id(order.id).await.unwrap().unwrap().status,
            OrderStatus::Shipped
        );

        assert!(repo
            .update_status(42, OrderStatus::Cancelled)
            .await
            .unwrap()
            .is_none());
        assert!(!repo.delete(42).await.unwrap());
    }
}
