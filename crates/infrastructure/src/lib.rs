//! Parley Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, plus configuration loading.

pub mod adapters;
pub mod sdk;
pub mod settings;

pub use adapters::{MockBackendExchange, ReqwestBackendExchange, SystemClock};
pub use sdk::SimulatedIdentitySdk;
pub use settings::{
    AppConfig, AppConfigError, CoordinatorSettings, ExchangeMode, ExchangeSettings,
};
