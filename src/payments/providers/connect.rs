use crate::config::{GatewayConfig, MerchantCredentials};
use crate::error::GatewayResult;
use crate::payments::provider::HostedCheckoutClient;
use crate::payments::types::{
    CreateHostedCheckoutRequest, CreatedHostedCheckout, GetHostedCheckoutResponse,
    RemotePaymentStatus,
};
use crate::payments::utils::SignedHttpClient;
use async_trait::async_trait;
use std::time::Duration;
use tracing::info;

/// REST client for the processor's hosted checkout endpoints.
pub struct ConnectClient {
    http: SignedHttpClient,
}

impl ConnectClient {
    pub fn new(timeout: Duration) -> GatewayResult<Self> {
        Ok(Self {
            http: SignedHttpClient::new(timeout)?,
        })
    }

    pub fn from_config(config: &GatewayConfig) -> GatewayResult<Self> {
        Self::new(Duration::from_secs(config.timeout_secs))
    }

    fn hosted_checkouts_path(credentials: &MerchantCredentials) -> String {
        format!("/v1/{}/hostedcheckouts", credentials.merchant_id())
    }
}

#[async_trait]
impl HostedCheckoutClient for ConnectClient {
    async fn create_hosted_checkout(
        &self,
        credentials: &MerchantCredentials,
        request: &CreateHostedCheckoutRequest,
    ) -> GatewayResult<CreatedHostedCheckout> {
        let created: CreatedHostedCheckout = self
            .http
            .request_json(
                reqwest::Method::POST,
                credentials,
                &Self::hosted_checkouts_path(credentials),
                Some(request),
            )
            .await?;
        info!(
            hosted_checkout_id = %created.hosted_checkout_id,
            "hosted checkout created"
        );
        Ok(created)
    }

    async fn get_hosted_checkout(
        &self,
        credentials: &MerchantCredentials,
        hosted_checkout_id: &str,
    ) -> GatewayResult<RemotePaymentStatus> {
        let path = format!(
            "{}/{}",
            Self::hosted_checkouts_path(credentials),
            hosted_checkout_id
        );
        let raw: GetHostedCheckoutResponse = self
            .http
            .request_json::<_, ()>(reqwest::Method::GET, credentials, &path, None)
            .await?;
        RemotePaymentStatus::try_from(raw)
    }
}
