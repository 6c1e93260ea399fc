//! Return validation: match the shopper's redirect-back against the stored
//! session, then reconcile with the processor's authoritative status.

use crate::checkout::order::{Order, Payment, PaymentState};
use crate::config::GatewayConfig;
use crate::error::{GatewayError, GatewayResult};
use crate::logging::mask_token;
use crate::payments::provider::HostedCheckoutClient;
use crate::payments::types::{HostedCheckoutStatus, RemotePaymentStatus, StatusCategory};
use crate::payments::utils::secure_eq;
use reqwest::Url;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Correlation tokens read from the redirect-back query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReturnParams {
    pub return_mac: String,
    pub hosted_checkout_id: String,
}

impl ReturnParams {
    pub fn new(return_mac: impl Into<String>, hosted_checkout_id: impl Into<String>) -> Self {
        Self {
            return_mac: return_mac.into(),
            hosted_checkout_id: hosted_checkout_id.into(),
        }
    }

    /// Parse `RETURNMAC` and `hostedCheckoutId` from a full URL or a bare query
    /// string. Absent parameters come back empty and fail the integrity checks.
    pub fn from_query(input: &str) -> Self {
        let url = Url::parse(input).or_else(|_| {
            Url::parse(&format!(
                "http://localhost/?{}",
                input.trim_start_matches('?')
            ))
        });
        let mut params = ReturnParams::default();
        if let Ok(url) = url {
            for (key, value) in url.query_pairs() {
                match key.as_ref() {
                    "RETURNMAC" => params.return_mac = value.into_owned(),
                    "hostedCheckoutId" => params.hosted_checkout_id = value.into_owned(),
                    _ => {}
                }
            }
        }
        params
    }
}

fn check_correlation(order: &Order, params: &ReturnParams) -> GatewayResult<()> {
    let session = order.checkout_session();

    let stored_mac = session.map(|s| s.return_mac.as_str()).unwrap_or_default();
    if stored_mac.is_empty() || !secure_eq(params.return_mac.as_bytes(), stored_mac.as_bytes()) {
        return Err(GatewayError::integrity("RETURNMAC is invalid"));
    }

    let stored_id = session
        .map(|s| s.hosted_checkout_id.as_str())
        .unwrap_or_default();
    if stored_id.is_empty() || !secure_eq(params.hosted_checkout_id.as_bytes(), stored_id.as_bytes())
    {
        return Err(GatewayError::integrity("hosted checkout id is invalid"));
    }

    Ok(())
}

fn check_status(status: &RemotePaymentStatus) -> GatewayResult<()> {
    if status.overall_status != HostedCheckoutStatus::PaymentCreated {
        return Err(GatewayError::NotCompleted {
            message: "payment has not completed on the hosted pages".to_string(),
        });
    }
    if status.status_category != StatusCategory::Completed {
        return Err(GatewayError::NotCompleted {
            message: "payment has not been completed".to_string(),
        });
    }
    if !status.is_authorized {
        return Err(GatewayError::NotAuthorized {
            message: format!("payment {} is not authorized", status.remote_payment_id),
        });
    }
    Ok(())
}

/// Run the ordered validation chain and build the completed payment.
///
/// The first failing check aborts the chain. The returned payment is not yet
/// persisted.
pub async fn validate(
    client: &dyn HostedCheckoutClient,
    config: &GatewayConfig,
    gateway_id: &str,
    order: &Order,
    params: &ReturnParams,
) -> GatewayResult<Payment> {
    check_correlation(order, params).inspect_err(|e| {
        warn!(
            order_id = %order.id,
            return_mac = %mask_token(&params.return_mac),
            error = %e,
            "return request failed correlation check"
        );
    })?;

    let credentials = config.credentials()?;

    let status = client
        .get_hosted_checkout(&credentials, &params.hosted_checkout_id)
        .await
        .map_err(|e| match e {
            GatewayError::Upstream { .. } => e,
            other => GatewayError::upstream(other.to_string()),
        })
        .inspect_err(|e| {
            error!(
                order_id = %order.id,
                hosted_checkout_id = %params.hosted_checkout_id,
                error = %e,
                "hosted checkout lookup failed"
            );
        })?;

    check_status(&status).inspect_err(|e| {
        warn!(
            order_id = %order.id,
            hosted_checkout_id = %params.hosted_checkout_id,
            remote_state = %status.remote_state,
            error = %e,
            "hosted checkout not eligible for fulfilment"
        );
    })?;

    info!(
        order_id = %order.id,
        remote_id = %status.remote_payment_id,
        remote_state = %status.remote_state,
        "hosted checkout payment verified"
    );

    Ok(Payment {
        id: Uuid::new_v4(),
        state: PaymentState::Completed,
        amount: order.balance.clone(),
        gateway_id: gateway_id.to_string(),
        order_id: order.id.clone(),
        remote_id: status.remote_payment_id,
        remote_state: status.remote_state,
        created_at: chrono::Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkout::order::CheckoutSession;
    use crate::payments::types::Money;
    use rust_decimal_macros::dec;

    fn order_with_session(mac: &str, id: &str) -> Order {
        let mut order = Order::new("1", Money::new(dec!(19.99), "USD"));
        order.set_checkout_session(CheckoutSession {
            return_mac: mac.to_string(),
            hosted_checkout_id: id.to_string(),
        });
        order
    }

    fn status(
        overall: HostedCheckoutStatus,
        category: StatusCategory,
        authorized: bool,
    ) -> RemotePaymentStatus {
        RemotePaymentStatus {
            overall_status: overall,
            status_category: category,
            is_authorized: authorized,
            remote_payment_id: "P1".to_string(),
            remote_state: "CAPTURED".to_string(),
        }
    }

    #[test]
    fn parses_bare_query_string() {
        let params = ReturnParams::from_query("?RETURNMAC=MAC%2B1&hostedCheckoutId=HC1&x=y");
        assert_eq!(params, ReturnParams::new("MAC+1", "HC1"));
    }

    #[test]
    fn parses_full_return_url() {
        let params = ReturnParams::from_query(
            "https://shop.example/checkout/1/return?hostedCheckoutId=HC1&RETURNMAC=MAC1",
        );
        assert_eq!(params, ReturnParams::new("MAC1", "HC1"));
    }

    #[test]
    fn missing_parameters_parse_as_empty() {
        assert_eq!(ReturnParams::from_query(""), ReturnParams::default());
    }

    #[test]
    fn mac_mismatch_is_an_integrity_error_even_when_id_matches() {
        let order = order_with_session("A", "123");
        let err = check_correlation(&order, &ReturnParams::new("B", "123")).unwrap_err();
        assert_eq!(err, GatewayError::integrity("RETURNMAC is invalid"));
    }

    #[test]
    fn id_mismatch_is_an_integrity_error() {
        let order = order_with_session("A", "123");
        let err = check_correlation(&order, &ReturnParams::new("A", "999")).unwrap_err();
        assert_eq!(err, GatewayError::integrity("hosted checkout id is invalid"));
    }

    #[test]
    fn absent_session_never_matches() {
        let order = Order::new("1", Money::new(dec!(1), "USD"));
        let err = check_correlation(&order, &ReturnParams::default()).unwrap_err();
        assert_eq!(err, GatewayError::integrity("RETURNMAC is invalid"));
    }

    #[test]
    fn status_checks_run_in_order() {
        let not_created = check_status(&status(
            HostedCheckoutStatus::InProgress,
            StatusCategory::Completed,
            true,
        ));
        assert_eq!(
            not_created,
            Err(GatewayError::NotCompleted {
                message: "payment has not completed on the hosted pages".to_string()
            })
        );

        let pending = check_status(&status(
            HostedCheckoutStatus::PaymentCreated,
            StatusCategory::PendingPayment,
            false,
        ));
        assert_eq!(
            pending,
            Err(GatewayError::NotCompleted {
                message: "payment has not been completed".to_string()
            })
        );

        let unauthorized = check_status(&status(
            HostedCheckoutStatus::PaymentCreated,
            StatusCategory::Completed,
            false,
        ));
        assert!(matches!(unauthorized, Err(GatewayError::NotAuthorized { .. })));

        assert!(check_status(&status(
            HostedCheckoutStatus::PaymentCreated,
            StatusCategory::Completed,
            true,
        ))
        .is_ok());
    }
}
