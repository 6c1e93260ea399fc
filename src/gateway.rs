//! Off-site redirect payment gateway.
//!
//! Entry points the host calls at each stage of an order's checkout:
//! [`OffsiteRedirectGateway::initiate`] from the checkout controller,
//! [`OffsiteRedirectGateway::on_return`] from the return handler, and the
//! notify/cancel hooks.

use crate::checkout::initiator::{self, CheckoutContext, RedirectTarget};
use crate::checkout::order::{CheckoutSession, Order, Payment};
use crate::checkout::store::{OrderStore, PaymentStore};
use crate::checkout::validator::{self, ReturnParams};
use crate::config::GatewayConfig;
use crate::error::GatewayResult;
use crate::payments::provider::HostedCheckoutClient;
use crate::payments::providers::ConnectClient;
use std::sync::Arc;
use tracing::{debug, error, info};

pub const GATEWAY_PLUGIN_ID: &str = "ingenico_gc_offsite_redirect";
pub const LABEL: &str = "Ingenico GlobalConnect (Off-site redirect)";
pub const DISPLAY_LABEL: &str = "Ingenico GlobalConnect";
pub const PAYMENT_METHOD_TYPES: &[&str] = &["credit_card"];
pub const CREDIT_CARD_TYPES: &[&str] = &[
    "amex",
    "dinersclub",
    "discover",
    "jcb",
    "maestro",
    "mastercard",
    "visa",
];
pub const REQUIRES_BILLING_INFORMATION: bool = false;

/// Server-pushed notification from the processor.
#[derive(Debug, Clone, Default)]
pub struct NotifyRequest {
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

pub struct OffsiteRedirectGateway {
    id: String,
    config: GatewayConfig,
    client: Arc<dyn HostedCheckoutClient>,
    orders: Arc<dyn OrderStore>,
    payments: Arc<dyn PaymentStore>,
}

impl OffsiteRedirectGateway {
    /// `id` is the host's identifier for this configured gateway instance.
    pub fn new(
        id: impl Into<String>,
        config: GatewayConfig,
        client: Arc<dyn HostedCheckoutClient>,
        orders: Arc<dyn OrderStore>,
        payments: Arc<dyn PaymentStore>,
    ) -> Self {
        Self {
            id: id.into(),
            config,
            client,
            orders,
            payments,
        }
    }

    /// Gateway backed by the processor's REST API.
    pub fn with_connect_client(
        id: impl Into<String>,
        config: GatewayConfig,
        orders: Arc<dyn OrderStore>,
        payments: Arc<dyn PaymentStore>,
    ) -> GatewayResult<Self> {
        let client = Arc::new(ConnectClient::from_config(&config)?);
        Ok(Self::new(id, config, client, orders, payments))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn endpoint(&self) -> &str {
        self.config.endpoint()
    }

    pub async fn initiate(
        &self,
        order: &mut Order,
        context: &CheckoutContext,
    ) -> GatewayResult<RedirectTarget> {
        initiator::initiate(
            self.client.as_ref(),
            self.orders.as_ref(),
            &self.config,
            order,
            context,
        )
        .await
    }

    /// Validate the shopper's return and record the completed payment.
    ///
    /// The cleared session is saved before the payment, so replaying the same
    /// return URL fails the correlation check instead of paying twice. If the
    /// payment cannot be saved the session is put back, leaving the order
    /// retryable and no payment behind.
    pub async fn on_return(
        &self,
        order: &mut Order,
        params: &ReturnParams,
    ) -> GatewayResult<Payment> {
        let payment = validator::validate(
            self.client.as_ref(),
            &self.config,
            &self.id,
            order,
            params,
        )
        .await?;

        let session = order.clear_checkout_session();
        if let Err(e) = self.orders.save_order(order).await {
            restore_session(order, session);
            error!(order_id = %order.id, error = %e, "failed to save order after return");
            return Err(e);
        }

        if let Err(e) = self.payments.save_payment(&payment).await {
            error!(order_id = %order.id, error = %e, "failed to save payment, restoring session");
            restore_session(order, session);
            if let Err(restore_err) = self.orders.save_order(order).await {
                error!(
                    order_id = %order.id,
                    error = %restore_err,
                    "failed to restore checkout session"
                );
            }
            return Err(e);
        }

        info!(
            order_id = %order.id,
            payment_id = %payment.id,
            amount = %payment.amount,
            "payment recorded"
        );
        Ok(payment)
    }

    /// Asynchronous processor notifications are not handled yet.
    pub async fn on_notify(&self, request: &NotifyRequest) -> GatewayResult<()> {
        debug!(
            gateway_id = %self.id,
            body_len = request.body.len(),
            "notification received, ignoring"
        );
        Ok(())
    }

    pub async fn on_cancel(&self, order: &Order) -> GatewayResult<()> {
        info!(order_id = %order.id, "shopper cancelled hosted checkout");
        Ok(())
    }
}

fn restore_session(order: &mut Order, session: Option<CheckoutSession>) {
    if let Some(session) = session {
        order.set_checkout_session(session);
    }
}
