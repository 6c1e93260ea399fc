//! Checkout initiation: create the hosted checkout and hand back a redirect.

use crate::checkout::order::{CheckoutSession, Order};
use crate::checkout::store::OrderStore;
use crate::config::GatewayConfig;
use crate::error::{GatewayError, GatewayResult};
use crate::logging::mask_token;
use crate::payments::provider::HostedCheckoutClient;
use crate::payments::types::{
    Address, AmountOfMoney, CheckoutOrder, CreateHostedCheckoutRequest, CreatedHostedCheckout,
    Customer, HostedCheckoutSpecificInput,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

const DEFAULT_BILLING_COUNTRY: &str = "US";

/// Host-supplied request context for a checkout attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutContext {
    /// Callback the processor sends the shopper back to.
    pub return_url: String,
    /// Language of the active request, passed through unchanged.
    pub locale: String,
    pub billing_country: String,
}

impl CheckoutContext {
    pub fn new(return_url: impl Into<String>, locale: impl Into<String>) -> Self {
        Self {
            return_url: return_url.into(),
            locale: locale.into(),
            billing_country: DEFAULT_BILLING_COUNTRY.to_string(),
        }
    }

    pub fn with_billing_country(mut self, country_code: impl Into<String>) -> Self {
        self.billing_country = country_code.into();
        self
    }
}

/// Where the host should send the shopper (HTTP 3xx is the host's job).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RedirectTarget {
    pub url: String,
}

pub fn build_request(
    order: &Order,
    context: &CheckoutContext,
) -> GatewayResult<CreateHostedCheckoutRequest> {
    Ok(CreateHostedCheckoutRequest {
        order: CheckoutOrder {
            amount_of_money: AmountOfMoney {
                amount: order.total.to_minor_units()?,
                currency_code: order.total.currency.clone(),
            },
            customer: Customer {
                billing_address: Address {
                    country_code: context.billing_country.clone(),
                },
                merchant_customer_id: order.id.clone(),
            },
        },
        hosted_checkout_specific_input: HostedCheckoutSpecificInput {
            locale: context.locale.clone(),
            show_result_page: false,
            return_url: context.return_url.clone(),
        },
    })
}

pub fn redirect_url(subdomain: &str, partial_redirect_url: &str) -> String {
    format!("https://{}.{}", subdomain, partial_redirect_url)
}

fn ensure_complete(created: &CreatedHostedCheckout) -> GatewayResult<()> {
    let missing = [
        ("RETURNMAC", &created.return_mac),
        ("hostedCheckoutId", &created.hosted_checkout_id),
        ("partialRedirectUrl", &created.partial_redirect_url),
    ]
    .into_iter()
    .find(|(_, value)| value.trim().is_empty());

    match missing {
        Some((name, _)) => Err(GatewayError::upstream(format!(
            "hosted checkout response is missing {}",
            name
        ))),
        None => Ok(()),
    }
}

/// Create a hosted checkout for `order` and persist its correlation tokens.
///
/// The session is saved through `orders` before the redirect is returned. If
/// that save fails the order keeps whatever session it had before the call.
pub async fn initiate(
    client: &dyn HostedCheckoutClient,
    orders: &dyn OrderStore,
    config: &GatewayConfig,
    order: &mut Order,
    context: &CheckoutContext,
) -> GatewayResult<RedirectTarget> {
    let credentials = config.credentials()?;
    let request = build_request(order, context)?;

    let created = client
        .create_hosted_checkout(&credentials, &request)
        .await
        .inspect_err(|e| {
            error!(order_id = %order.id, error = %e, "hosted checkout creation failed");
        })?;
    ensure_complete(&created)?;

    let previous = order.clear_checkout_session();
    order.set_checkout_session(CheckoutSession {
        return_mac: created.return_mac.clone(),
        hosted_checkout_id: created.hosted_checkout_id.clone(),
    });
    if let Err(e) = orders.save_order(order).await {
        order.clear_checkout_session();
        if let Some(previous) = previous {
            order.set_checkout_session(previous);
        }
        error!(order_id = %order.id, error = %e, "failed to persist checkout session");
        return Err(e);
    }

    info!(
        order_id = %order.id,
        hosted_checkout_id = %created.hosted_checkout_id,
        return_mac = %mask_token(&created.return_mac),
        "checkout session stored, redirecting shopper"
    );

    Ok(RedirectTarget {
        url: redirect_url(credentials.subdomain(), &created.partial_redirect_url),
    })
}
