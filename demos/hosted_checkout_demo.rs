// Creates a hosted checkout against the configured processor environment and
// prints the URL a shopper would be redirected to.
//
// Required: INGENICO_API_KEY, INGENICO_API_SECRET, INGENICO_INTEGRATOR,
// INGENICO_MERCHANT_ID. Optional: INGENICO_SUBDOMAIN, INGENICO_MODE.
//
// Run with: cargo run --example hosted_checkout_demo

use hosted_checkout_gateway::checkout::{InMemoryOrderStore, InMemoryPaymentStore, OrderStore};
use hosted_checkout_gateway::config::LoggingConfig;
use hosted_checkout_gateway::logging::init_tracing;
use hosted_checkout_gateway::payments::types::Money;
use hosted_checkout_gateway::{CheckoutContext, GatewayConfig, OffsiteRedirectGateway, Order};
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing(&LoggingConfig::from_env()?);

    let config = GatewayConfig::from_env()?;
    info!(mode = %config.mode, endpoint = %config.endpoint(), "gateway configuration loaded");

    let orders = InMemoryOrderStore::new();
    let gateway = OffsiteRedirectGateway::with_connect_client(
        "ingenico_demo",
        config,
        Arc::new(orders.clone()),
        Arc::new(InMemoryPaymentStore::new()),
    )?;

    let mut order = Order::new(
        uuid::Uuid::new_v4().to_string(),
        Money::new(Decimal::from_str("19.99")?, "USD"),
    );
    let context = CheckoutContext::new("https://shop.example/checkout/return", "en_US");

    match gateway.initiate(&mut order, &context).await {
        Ok(target) => {
            println!("Redirect shopper to: {}", target.url);
            if let Some(saved) = orders.get_order(&order.id).await? {
                println!("Stored session: {:?}", saved.checkout_session());
            }
        }
        Err(e) => {
            error!(error = %e, kind = e.kind(), "checkout initiation failed");
            println!("Checkout failed: {}", e.user_message());
        }
    }

    Ok(())
}
