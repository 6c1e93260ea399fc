//! Order-side data the gateway reads and writes.

use crate::payments::types::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Correlation tokens issued by the processor for the latest checkout attempt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckoutSession {
    pub return_mac: String,
    pub hosted_checkout_id: String,
}

/// The host's order, reduced to what the gateway needs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Order {
    pub id: String,
    pub total: Money,
    pub balance: Money,
    #[serde(default)]
    checkout_session: Option<CheckoutSession>,
}

impl Order {
    /// New order with nothing paid yet, so the balance equals the total.
    pub fn new(id: impl Into<String>, total: Money) -> Self {
        Self {
            id: id.into(),
            balance: total.clone(),
            total,
            checkout_session: None,
        }
    }

    /// `None` means no checkout has been started for this order.
    pub fn checkout_session(&self) -> Option<&CheckoutSession> {
        self.checkout_session.as_ref()
    }

    /// Replace any previous session; an older attempt's tokens stop matching.
    pub fn set_checkout_session(&mut self, session: CheckoutSession) {
        self.checkout_session = Some(session);
    }

    pub fn clear_checkout_session(&mut self) -> Option<CheckoutSession> {
        self.checkout_session.take()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentState {
    Completed,
}

/// Payment record handed to the host for persistence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Payment {
    pub id: Uuid,
    pub state: PaymentState,
    pub amount: Money,
    pub gateway_id: String,
    pub order_id: String,
    pub remote_id: String,
    pub remote_state: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn new_order_has_no_session_and_full_balance() {
        let order = Order::new("7", Money::new(dec!(19.99), "USD"));
        assert!(order.checkout_session().is_none());
        assert_eq!(order.balance, order.total);
    }

    #[test]
    fn setting_a_session_overwrites_the_previous_one() {
        let mut order = Order::new("7", Money::new(dec!(5), "EUR"));
        order.set_checkout_session(CheckoutSession {
            return_mac: "A".to_string(),
            hosted_checkout_id: "1".to_string(),
        });
        order.set_checkout_session(CheckoutSession {
            return_mac: "B".to_string(),
            hosted_checkout_id: "2".to_string(),
        });
        assert_eq!(order.checkout_session().unwrap().return_mac, "B");
        assert_eq!(order.clear_checkout_session().unwrap().hosted_checkout_id, "2");
        assert!(order.checkout_session().is_none());
    }

    #[test]
    fn order_without_session_deserializes() {
        let order: Order = serde_json::from_value(serde_json::json!({
            "id": "9",
            "total": {"amount": "10.00", "currency": "USD"},
            "balance": {"amount": "10.00", "currency": "USD"}
        }))
        .expect("deserialization should succeed");
        assert!(order.checkout_session().is_none());
    }
}
