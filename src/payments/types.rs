use crate::error::{GatewayError, GatewayResult};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Money {
    pub amount: Decimal,
    pub currency: String,
}

impl Money {
    pub fn new(amount: Decimal, currency: impl Into<String>) -> Self {
        Self {
            amount,
            currency: currency.into(),
        }
    }

    /// Amount in minor units (`round(amount * 100)`, half away from zero).
    pub fn to_minor_units(&self) -> GatewayResult<i64> {
        self.amount
            .checked_mul(Decimal::ONE_HUNDRED)
            .map(|v| v.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
            .and_then(|v| v.to_i64())
            .ok_or_else(|| GatewayError::Validation {
                message: format!("amount out of range: {}", self.amount),
                field: Some("amount".to_string()),
            })
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}

// ---------------------------------------------------------------------------
// Create hosted checkout
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateHostedCheckoutRequest {
    pub order: CheckoutOrder,
    pub hosted_checkout_specific_input: HostedCheckoutSpecificInput,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutOrder {
    pub amount_of_money: AmountOfMoney,
    pub customer: Customer,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AmountOfMoney {
    pub amount: i64,
    pub currency_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub billing_address: Address,
    pub merchant_customer_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub country_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HostedCheckoutSpecificInput {
    pub locale: String,
    pub show_result_page: bool,
    pub return_url: String,
}

/// Correlation data returned by a successful create call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreatedHostedCheckout {
    #[serde(rename = "RETURNMAC")]
    pub return_mac: String,
    pub hosted_checkout_id: String,
    pub partial_redirect_url: String,
}

// ---------------------------------------------------------------------------
// Get hosted checkout
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HostedCheckoutStatus {
    InProgress,
    PaymentCreated,
    CancelledByConsumer,
    ClientNotEligibleForSelectedPaymentProduct,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusCategory {
    Created,
    PendingPayment,
    AccountVerified,
    PendingMerchant,
    #[serde(rename = "PENDING_CONNECT_OR_3RD_PARTY")]
    PendingConnectOr3rdParty,
    Completed,
    Reversed,
    Refunded,
    Unsuccessful,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetHostedCheckoutResponse {
    pub status: HostedCheckoutStatus,
    #[serde(default)]
    pub created_payment_output: Option<CreatedPaymentOutput>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedPaymentOutput {
    #[serde(default)]
    pub payment: Option<RemotePayment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemotePayment {
    pub id: String,
    pub status: String,
    pub status_output: StatusOutput,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusOutput {
    pub status_category: StatusCategory,
    #[serde(default)]
    pub is_authorized: bool,
}

/// Authoritative status of a hosted checkout, fetched fresh on every return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemotePaymentStatus {
    pub overall_status: HostedCheckoutStatus,
    pub status_category: StatusCategory,
    pub is_authorized: bool,
    pub remote_payment_id: String,
    pub remote_state: String,
}

impl TryFrom<GetHostedCheckoutResponse> for RemotePaymentStatus {
    type Error = GatewayError;

    fn try_from(response: GetHostedCheckoutResponse) -> Result<Self, Self::Error> {
        let payment = response.created_payment_output.and_then(|o| o.payment);
        match payment {
            Some(payment) => Ok(RemotePaymentStatus {
                overall_status: response.status,
                status_category: payment.status_output.status_category,
                is_authorized: payment.status_output.is_authorized,
                remote_payment_id: payment.id,
                remote_state: payment.status,
            }),
            None if response.status == HostedCheckoutStatus::PaymentCreated => Err(
                GatewayError::upstream("hosted checkout reports PAYMENT_CREATED without a payment"),
            ),
            None => Ok(RemotePaymentStatus {
                overall_status: response.status,
                status_category: StatusCategory::Other,
                is_authorized: false,
                remote_payment_id: String::new(),
                remote_state: String::new(),
            }),
        }
    }
}

/// Error envelope returned by the processor on non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorResponse {
    #[serde(default)]
    pub error_id: Option<String>,
    #[serde(default)]
    pub errors: Vec<ApiError>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub property_name: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiErrorResponse {
    pub fn first_message(&self) -> Option<&str> {
        self.errors.iter().find_map(|e| e.message.as_deref())
    }
}
