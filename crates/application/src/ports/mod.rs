//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the authentication coordinator and
//! external systems. Each port is a trait implemented by adapters in the
//! infrastructure layer, or by fakes in tests.

mod backend_exchange;
mod clock;
mod identity_sdk;

pub use backend_exchange::{BackendExchange, ExchangeError};
pub use clock::Clock;
pub use identity_sdk::{IdentitySdk, SdkError, SdkEvent, SdkEventReceiver};
