//! Infrastructure adapters

mod mock_exchange;
mod reqwest_exchange;
mod system_clock;

pub use mock_exchange::MockBackendExchange;
pub use reqwest_exchange::ReqwestBackendExchange;
pub use system_clock::SystemClock;
