use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError};

pub const COURIER_SERVICE: &str = "PONY_EXPRESS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct PackageDimensions {
    #[validate(range(min = 1, message = "must be greater than zero"))]
    pub height: i64,
    #[validate(range(min = 1, message = "must be greater than zero"))]
    pub length: i64,
    #[validate(range(min = 1, message = "must be greater than zero"))]
    pub width: i64,
    #[validate(range(exclusive_min = 0.0, message = "must be greater than zero"))]
    pub weight: f64,
}

/// 單次運費試算請求
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CalculationRequest {
    #[validate(custom(function = "validate_not_blank"))]
    pub from_location: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub to_location: String,
    #[validate(nested)]
    pub packages: PackageDimensions,
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some(Cow::from("must not be blank"));
        return Err(err);
    }
    Ok(())
}

/// provider 回傳的原始報價 (`DeliveryRate`)，欄位保持原始文字
#[derive(Debug, Clone, PartialEq)]
pub struct RawOffer {
    pub min_term: String,
    pub sum: String,
    pub description: String,
    pub delivery_method: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TariffOffer {
    pub courier_service: String,
    pub courier_service_rating: Option<i32>,
    pub price: i64,
    pub delivery_time_in_day: i64,
    pub pickup_day: DateTime<FixedOffset>,
    pub delivery_day: DateTime<FixedOffset>,
    pub delivery_rate: String,
    pub delivery_rate_description: Option<String>,
}
