#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use crate::app_system::CartSystem;
    use crate::cart_actor::{CartError, CartEvent};
    use crate::checkout::{OrderConfirmation, SimulatedOutcome};
    use crate::config::AppConfig;
    use crate::domain::Product;
    use crate::mock_framework::{
        create_mock_client, expect_checkout, expect_get_total_items, expect_get_total_price,
    };
    use crate::presentation::{checkout_with_feedback, CartSummary, CheckoutFeedback};

    #[tokio::test]
    async fn test_checkout_failure_feedback() {
        let (client, mut rx) = create_mock_client(10);
        let seen = Arc::new(Mutex::new(Vec::new()));

        let task = {
            let seen = seen.clone();
            tokio::spawn(async move {
                checkout_with_feedback(&client, |feedback| seen.lock().unwrap().push(feedback)).await
            })
        };

        let responder = expect_checkout(&mut rx).await.expect("Expected Checkout");
        responder
            .send(Err(CartError::CheckoutFailed("order service declined".to_string())))
            .unwrap();

        let result = task.await.unwrap();
        assert!(matches!(result, Err(CartError::CheckoutFailed(_))));
        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                CheckoutFeedback::Processing,
                CheckoutFeedback::Failed {
                    message: "Checkout failed. Please try again".to_string(),
                    retryable: true,
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_checkout_success_feedback() {
        let (client, mut rx) = create_mock_client(10);
        let seen = Arc::new(Mutex::new(Vec::new()));

        let task = {
            let seen = seen.clone();
            tokio::spawn(async move {
                checkout_with_feedback(&client, |feedback| seen.lock().unwrap().push(feedback)).await
            })
        };

        let responder = expect_checkout(&mut rx).await.expect("Expected Checkout");
        responder
            .send(Ok(OrderConfirmation {
                order_id: "order_1".to_string(),
                total_items: 3,
                total_price: 45.0,
            }))
            .unwrap();

        let confirmation = task.await.unwrap().unwrap();
        assert_eq!(confirmation.order_id, "order_1");

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert!(matches!(
            &seen[1],
            CheckoutFeedback::Succeeded { order_id, .. } if order_id == "order_1"
        ));
    }

    #[tokio::test]
    async fn test_summary_reads_both_aggregates() {
        let (client, mut rx) = create_mock_client(10);

        let task = tokio::spawn(async move { CartSummary::load(&client).await });

        expect_get_total_items(&mut rx)
            .await
            .expect("Expected GetTotalItems")
            .send(Ok(4))
            .unwrap();
        expect_get_total_price(&mut rx)
            .await
            .expect("Expected GetTotalPrice")
            .send(Ok(61.5))
            .unwrap();

        let summary = task.await.unwrap().unwrap();
        assert_eq!(summary.item_count, 4);
        assert_eq!(summary.subtotal_display(), "$61.50");
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_after_failure_through_system() {
        let config = AppConfig {
            checkout_latency_ms: 100,
            checkout_outcome: "fail-every:2".parse::<SimulatedOutcome>().unwrap(),
            ..AppConfig::default()
        };
        let system = CartSystem::simulated(&config);
        let cart = system.cart_client.clone();

        let events = Arc::new(Mutex::new(Vec::new()));
        {
            let events = events.clone();
            cart.subscribe(move |event: &CartEvent| events.lock().unwrap().push(event.clone()))
                .await
                .unwrap();
        }

        cart.add_to_cart(Product::new(1, "Mug", 8.0)).await.unwrap();
        cart.add_to_cart(Product::new(1, "Mug", 8.0)).await.unwrap();

        // Attempts 1 and 2: the second one fails
        let first = cart.checkout().await.unwrap();
        assert_eq!(first.total_items, 2);
        cart.add_to_cart(Product::new(2, "Tea", 4.5)).await.unwrap();

        let err = checkout_with_feedback(&cart, |_| {}).await.unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(cart.total_items().await.unwrap(), 1);

        let retried = checkout_with_feedback(&cart, |_| {}).await.unwrap();
        assert_eq!(retried.total_price, 4.5);
        assert_eq!(cart.total_items().await.unwrap(), 0);

        let failures = events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| matches!(e, CartEvent::CheckoutFailed { retryable: true, .. }))
            .count();
        assert_eq!(failures, 1);

        system.shutdown().await.unwrap();
    }
}
