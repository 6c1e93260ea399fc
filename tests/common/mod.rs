#![allow(dead_code)]

use async_trait::async_trait;
use hosted_checkout_gateway::checkout::{
    InMemoryOrderStore, InMemoryPaymentStore, Order, OrderStore, Payment, PaymentStore,
};
use hosted_checkout_gateway::config::MerchantCredentials;
use hosted_checkout_gateway::payments::provider::HostedCheckoutClient;
use hosted_checkout_gateway::payments::types::{
    CreateHostedCheckoutRequest, CreatedHostedCheckout, HostedCheckoutStatus,
    RemotePaymentStatus, StatusCategory,
};
use hosted_checkout_gateway::{GatewayConfig, GatewayError, GatewayResult, OffsiteRedirectGateway};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Processor double: each create issues `MAC{n}`/`HC{n}`, lookups return the
/// configured status.
pub struct ScriptedClient {
    creates: AtomicUsize,
    lookups: AtomicUsize,
    pub create_error: Mutex<Option<GatewayError>>,
    pub status: Mutex<GatewayResult<RemotePaymentStatus>>,
    pub last_request: Mutex<Option<CreateHostedCheckoutRequest>>,
}

impl ScriptedClient {
    pub fn new(status: GatewayResult<RemotePaymentStatus>) -> Self {
        Self {
            creates: AtomicUsize::new(0),
            lookups: AtomicUsize::new(0),
            create_error: Mutex::new(None),
            status: Mutex::new(status),
            last_request: Mutex::new(None),
        }
    }

    pub fn create_calls(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    pub fn lookup_calls(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HostedCheckoutClient for ScriptedClient {
    async fn create_hosted_checkout(
        &self,
        _credentials: &MerchantCredentials,
        request: &CreateHostedCheckoutRequest,
    ) -> GatewayResult<CreatedHostedCheckout> {
        let n = self.creates.fetch_add(1, Ordering::SeqCst) + 1;
        *self.last_request.lock().unwrap() = Some(request.clone());
        if let Some(err) = self.create_error.lock().unwrap().clone() {
            return Err(err);
        }
        Ok(CreatedHostedCheckout {
            return_mac: format!("MAC{n}"),
            hosted_checkout_id: format!("HC{n}"),
            partial_redirect_url: format!("pay1.secured-by-ingenico.com/checkout/HC{n}"),
        })
    }

    async fn get_hosted_checkout(
        &self,
        _credentials: &MerchantCredentials,
        _hosted_checkout_id: &str,
    ) -> GatewayResult<RemotePaymentStatus> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.status.lock().unwrap().clone()
    }
}

pub fn remote_status(
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

pub fn captured() -> RemotePaymentStatus {
    remote_status(
        HostedCheckoutStatus::PaymentCreated,
        StatusCategory::Completed,
        true,
    )
}

pub fn test_config() -> GatewayConfig {
    GatewayConfig {
        api_key: "api-key".to_string(),
        api_secret: "api-secret".to_string(),
        integrator: "Acme Shop".to_string(),
        merchant_id: "1234".to_string(),
        subdomain: "payment".to_string(),
        ..GatewayConfig::default()
    }
}

/// Order store whose writes always fail; counts attempted saves.
#[derive(Default)]
pub struct FailingOrderStore {
    pub saves: AtomicUsize,
}

#[async_trait]
impl OrderStore for FailingOrderStore {
    async fn save_order(&self, _order: &Order) -> GatewayResult<()> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        Err(storage_down())
    }

    async fn get_order(&self, _order_id: &str) -> GatewayResult<Option<Order>> {
        Ok(None)
    }
}

/// Payment store whose writes always fail.
#[derive(Default)]
pub struct FailingPaymentStore;

#[async_trait]
impl PaymentStore for FailingPaymentStore {
    async fn save_payment(&self, _payment: &Payment) -> GatewayResult<()> {
        Err(storage_down())
    }

    async fn payments_for_order(&self, _order_id: &str) -> GatewayResult<Vec<Payment>> {
        Ok(Vec::new())
    }
}

pub fn storage_down() -> GatewayError {
    GatewayError::Storage {
        message: "db down".to_string(),
    }
}

pub fn gateway_with_stores(
    config: GatewayConfig,
    status: GatewayResult<RemotePaymentStatus>,
    orders: Arc<dyn OrderStore>,
    payments: Arc<dyn PaymentStore>,
) -> (OffsiteRedirectGateway, Arc<ScriptedClient>) {
    let client = Arc::new(ScriptedClient::new(status));
    let gateway = OffsiteRedirectGateway::new("ingenico", config, client.clone(), orders, payments);
    (gateway, client)
}

pub struct Harness {
    pub gateway: OffsiteRedirectGateway,
    pub client: Arc<ScriptedClient>,
    pub orders: InMemoryOrderStore,
    pub payments: InMemoryPaymentStore,
}

pub fn harness(config: GatewayConfig, status: GatewayResult<RemotePaymentStatus>) -> Harness {
    let client = Arc::new(ScriptedClient::new(status));
    let orders = InMemoryOrderStore::new();
    let payments = InMemoryPaymentStore::new();
    let gateway = OffsiteRedirectGateway::new(
        "ingenico",
        config,
        client.clone(),
        Arc::new(orders.clone()),
        Arc::new(payments.clone()),
    );
    Harness {
        gateway,
        client,
        orders,
        payments,
    }
}
