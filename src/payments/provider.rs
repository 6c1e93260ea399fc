use crate::config::MerchantCredentials;
use crate::error::GatewayResult;
use crate::payments::types::{
    CreateHostedCheckoutRequest, CreatedHostedCheckout, RemotePaymentStatus,
};
use async_trait::async_trait;

/// The two processor operations the gateway consumes.
#[async_trait]
pub trait HostedCheckoutClient: Send + Sync {
    /// Create a hosted checkout. A payload the processor rejects surfaces as
    /// `GatewayError::UpstreamValidation` carrying the processor's message.
    async fn create_hosted_checkout(
        &self,
        credentials: &MerchantCredentials,
        request: &CreateHostedCheckoutRequest,
    ) -> GatewayResult<CreatedHostedCheckout>;

    async fn get_hosted_checkout(
        &self,
        credentials: &MerchantCredentials,
        hosted_checkout_id: &str,
    ) -> GatewayResult<RemotePaymentStatus>;
}
