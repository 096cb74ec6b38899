pub mod gateway;
pub mod offer_normalizer;
pub mod request_builder;
pub mod response_parser;
pub mod xml_tree;

pub use crate::domain::model::{CalculationRequest, PackageDimensions, RawOffer, TariffOffer};
pub use crate::domain::ports::TariffProvider;
pub use crate::utils::error::Result;
