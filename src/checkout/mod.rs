pub mod initiator;
pub mod order;
pub mod store;
pub mod validator;

pub use initiator::{CheckoutContext, RedirectTarget};
pub use order::{CheckoutSession, Order, Payment, PaymentState};
pub use store::{InMemoryOrderStore, InMemoryPaymentStore, OrderStore, PaymentStore};
pub use validator::ReturnParams;
