//! Persistence ports owned by the host, plus in-memory implementations.

use crate::checkout::order::{Order, Payment};
use crate::error::GatewayResult;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn save_order(&self, order: &Order) -> GatewayResult<()>;
    async fn get_order(&self, order_id: &str) -> GatewayResult<Option<Order>>;
}

#[async_trait]
pub trait PaymentStore: Send + Sync {
    async fn save_payment(&self, payment: &Payment) -> GatewayResult<()>;
    async fn payments_for_order(&self, order_id: &str) -> GatewayResult<Vec<Payment>>;
}

/// Thread-safe in-memory order store keyed by order id.
#[derive(Default, Clone)]
pub struct InMemoryOrderStore {
    orders: Arc<RwLock<HashMap<String, Order>>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn save_order(&self, order: &Order) -> GatewayResult<()> {
        let mut orders = self.orders.write().await;
        orders.insert(order.id.clone(), order.clone());
        Ok(())
    }

    async fn get_order(&self, order_id: &str) -> GatewayResult<Option<Order>> {
        let orders = self.orders.read().await;
        Ok(orders.get(order_id).cloned())
    }
}

/// Thread-safe in-memory payment store, in insertion order.
#[derive(Default, Clone)]
pub struct InMemoryPaymentStore {
    payments: Arc<RwLock<Vec<Payment>>>,
}

impl InMemoryPaymentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.payments.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.payments.read().await.is_empty()
    }
}

#[async_trait]
impl PaymentStore for InMemoryPaymentStore {
    async fn save_payment(&self, payment: &Payment) -> GatewayResult<()> {
        let mut payments = self.payments.write().await;
        payments.push(payment.clone());
        Ok(())
    }

    async fn payments_for_order(&self, order_id: &str) -> GatewayResult<Vec<Payment>> {
        let payments = self.payments.read().await;
        Ok(payments
            .iter()
            .filter(|p| p.order_id == order_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkout::order::{CheckoutSession, PaymentState};
    use crate::payments::types::Money;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn order_store_round_trips_session() {
        let store = InMemoryOrderStore::new();
        let mut order = Order::new("1", Money::new(dec!(12.50), "EUR"));
        order.set_checkout_session(CheckoutSession {
            return_mac: "MAC".to_string(),
            hosted_checkout_id: "HC".to_string(),
        });
        store.save_order(&order).await.unwrap();

        let loaded = store.get_order("1").await.unwrap().expect("order saved");
        assert_eq!(loaded.checkout_session(), order.checkout_session());
        assert!(store.get_order("2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn payment_store_filters_by_order() {
        let store = InMemoryPaymentStore::new();
        for order_id in ["1", "2", "1"] {
            store
                .save_payment(&Payment {
                    id: uuid::Uuid::new_v4(),
                    state: PaymentState::Completed,
                    amount: Money::new(dec!(1), "EUR"),
                    gateway_id: "gw".to_string(),
                    order_id: order_id.to_string(),
                    remote_id: "P".to_string(),
                    remote_state: "CAPTURED".to_string(),
                    created_at: chrono::Utc::now(),
                })
                .await
                .unwrap();
        }
        assert_eq!(store.len().await, 3);
        assert_eq!(store.payments_for_order("1").await.unwrap().len(), 2);
    }
}
