pub mod adapters;
pub mod api;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::CliArgs;

pub use crate::config::{AppConfig, ProviderConfig};
pub use crate::core::gateway::TariffGateway;
pub use crate::domain::model::{CalculationRequest, PackageDimensions, TariffOffer};
pub use crate::domain::ports::TariffProvider;
pub use crate::utils::error::{ErrorKind, GatewayError, Result};
