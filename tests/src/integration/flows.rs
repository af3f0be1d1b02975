//! # Integration Test Flows
//!
//! Places orders through `OrderService` with the product and customer
//! validators answering over the shared bus.
//!
//! ## Flows Tested:
//!
//! 1. **Accepted order**: both validations pass, order stored and announced
//! 2. **Rejections**: unknown product or customer, reported in join order
//! 3. **Timeouts**: a silent validator yields a timeout rejection and no
//!    leftover waiter; its late reply is discarded
//! 4. **Concurrency**: many flows share one pair of registries
//! 5. **Fan-in latency**: the join waits for the slower reply, not the sum

#[cfg(test)]
mod tests {
    use crate::harness::{Harness, ValidatorMode};
    use futures::future::join_all;
    use order_service::{
        OrderDecision, OrderStatus, CUSTOMER_TIMEOUT_REASON, PRODUCT_TIMEOUT_REASON,
    };
    use product_service::PRODUCT_NOT_FOUND;
    use rust_decimal_macros::dec;
    use shared_bus::{MessagePublisher, TopicFilter};
    use shared_types::{
        CorrelationId, OrderCreatedEvent, ProductValidationResponse, ValidateProductRequest,
        ORDER_CREATED_TOPIC, PRODUCT_VALIDATION_RESPONSE_TOPIC, VALIDATE_PRODUCT_REQUEST_TOPIC,
    };
    use std::time::Duration;
    use tokio::time::Instant;

    // =============================================================================
    // ACCEPTANCE
    // =============================================================================

    #[tokio::test]
    async fn test_valid_order_accepted_with_total() {
        let h = Harness::live();
        let mut events = h
            .bus
            .subscribe(TopicFilter::topic("audit", ORDER_CREATED_TOPIC));

        let decision = h.orders.create_order(1, 1, 5).await.unwrap();

        let order = match decision {
            OrderDecision::Accepted(order) => order,
            other => panic!("expected acceptance, got {other:?}"),
        };
        assert_eq!(order.total_price, dec!(100.00));
        assert_eq!(order.status, OrderStatus::Confirmed);
        assert_eq!((order.customer_id, order.product_id, order.quantity), (1, 1, 5));

        let message = events.recv().await.unwrap();
        assert_eq!(message.key, order.id.to_string());
        assert_eq!(message.payload["totalPrice"], serde_json::json!("100.00"));
        let event: OrderCreatedEvent = message.decode().unwrap();
        assert_eq!(event.order_id, order.id);

        assert_eq!(h.pending(), 0);
    }

    // =============================================================================
    // REJECTIONS
    // =============================================================================

    #[tokio::test]
    async fn test_unknown_product_rejected_regardless_of_customer() {
        let h = Harness::live();

        for customer_id in [1, 999] {
            let decision = h.orders.create_order(customer_id, 999, 1).await.unwrap();
            assert_eq!(decision.reason(), Some(PRODUCT_NOT_FOUND));
        }
        assert!(h.orders.list_orders().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_customer_rejected() {
        let h = Harness::live();

        let decision = h.orders.create_order(999, 1, 1).await.unwrap();
        assert_eq!(decision.reason(), Some("Customer not found"));
        assert_eq!(h.pending(), 0);
    }

    // =============================================================================
    // TIMEOUTS
    // =============================================================================

    #[tokio::test(start_paused = true)]
    async fn test_silent_product_validator_times_out() {
        let h = Harness::builder()
            .timeout(Duration::from_millis(200))
            .products(ValidatorMode::Silent)
            .build();
        let mut requests = h
            .bus
            .subscribe(TopicFilter::topic("spy", VALIDATE_PRODUCT_REQUEST_TOPIC));

        let decision = h.orders.create_order(1, 1, 1).await.unwrap();
        assert_eq!(decision.reason(), Some(PRODUCT_TIMEOUT_REASON));

        let request: ValidateProductRequest = requests.recv().await.unwrap().decode().unwrap();
        assert!(!h.products.is_pending(&request.correlation_id));
        assert_eq!(h.pending(), 0);
        assert_eq!(h.products.stats().snapshot().expired, 1);

        // The reply finally shows up: discarded, no order created
        let late = ProductValidationResponse::valid(request.correlation_id, 1, "Widget", dec!(20.00));
        h.bus
            .publish(
                PRODUCT_VALIDATION_RESPONSE_TOPIC,
                &request.correlation_id.as_key(),
                serde_json::to_value(&late).unwrap(),
            )
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert_eq!(h.products.stats().snapshot().stale, 1);
        assert!(h.orders.list_orders().await.unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_customer_validator_times_out() {
        let h = Harness::builder()
            .timeout(Duration::from_millis(100))
            .customers(ValidatorMode::Delayed(Duration::from_millis(500)))
            .build();

        let decision = h.orders.create_order(1, 1, 1).await.unwrap();
        assert_eq!(decision.reason(), Some(CUSTOMER_TIMEOUT_REASON));
        assert_eq!(h.pending(), 0);
    }

    // =============================================================================
    // ROBUSTNESS
    // =============================================================================

    #[tokio::test]
    async fn test_stray_replies_do_not_disturb_dispatcher() {
        let h = Harness::live();

        let stranger = CorrelationId::new();
        h.bus
            .publish(
                PRODUCT_VALIDATION_RESPONSE_TOPIC,
                &stranger.as_key(),
                serde_json::to_value(ProductValidationResponse::rejected(stranger, 5, "nope"))
                    .unwrap(),
            )
            .await
            .unwrap();
        h.bus
            .publish(PRODUCT_VALIDATION_RESPONSE_TOPIC, "garbage", serde_json::json!([1, 2, 3]))
            .await
            .unwrap();

        let decision = h.orders.create_order(2, 2, 4).await.unwrap();
        assert_eq!(decision.order().map(|o| o.total_price), Some(dec!(29.00)));
        assert_eq!(h.products.stats().snapshot().stale, 1);
    }

    #[tokio::test]
    async fn test_closed_bus_is_an_error() {
        let h = Harness::live();
        h.bus.close();

        let result = h.orders.create_order(1, 1, 1).await;
        assert!(result.unwrap_err().is_transport());
        assert_eq!(h.pending(), 0);
    }

    // =============================================================================
    // CONCURRENCY
    // =============================================================================

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_orders_resolve_independently() {
        let h = Harness::live();

        let flows = (0..40u64).map(|i| {
            let orders = h.orders.clone();
            // Every fourth flow names an unknown product
            let product_id = if i % 4 == 0 { 999 } else { 1 + i % 2 };
            tokio::spawn(async move {
                let decision = orders.create_order(1 + i % 2, product_id, 1).await;
                (product_id, decision)
            })
        });

        let results = join_all(flows).await;
        let mut accepted = 0;
        for result in results {
            let (product_id, decision) = result.unwrap();
            let decision = decision.unwrap();
            if product_id == 999 {
                assert_eq!(decision.reason(), Some(PRODUCT_NOT_FOUND));
            } else {
                assert_eq!(decision.order().map(|o| o.product_id), Some(product_id));
                accepted += 1;
            }
        }

        assert_eq!(accepted, 30);
        assert_eq!(h.orders.list_orders().await.unwrap().len(), 30);
        assert_eq!(h.pending(), 0);

        let stats = h.products.stats().snapshot();
        assert_eq!(stats.registered, 40);
        assert_eq!(stats.resolved, 40);
        assert_eq!(stats.expired, 0);
    }

    // =============================================================================
    // FAN-IN LATENCY
    // =============================================================================

    #[tokio::test(start_paused = true)]
    async fn test_join_takes_max_not_sum() {
        let h = Harness::builder()
            .products(ValidatorMode::Delayed(Duration::from_millis(300)))
            .customers(ValidatorMode::Delayed(Duration::from_millis(400)))
            .build();

        let started = Instant::now();
        let decision = h.orders.create_order(1, 1, 2).await.unwrap();
        let elapsed = started.elapsed();

        assert!(decision.is_accepted());
        assert!(elapsed >= Duration::from_millis(400), "elapsed {elapsed:?}");
        assert!(elapsed < Duration::from_millis(700), "elapsed {elapsed:?}");
    }
}
