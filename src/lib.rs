//! Off-site hosted checkout gateway for the Ingenico GlobalConnect processor.
//!
//! The shopper is redirected to the processor's hosted payment page; on
//! return the correlation tokens are checked and the payment status is
//! fetched server-to-server before any payment is recorded.

pub mod checkout;
pub mod config;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod payments;

pub use checkout::{CheckoutContext, Order, Payment, RedirectTarget, ReturnParams};
pub use config::{GatewayConfig, GatewayMode};
pub use error::{GatewayError, GatewayResult};
pub use gateway::OffsiteRedirectGateway;
