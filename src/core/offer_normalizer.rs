use crate::domain::model::{RawOffer, TariffOffer, COURIER_SERVICE};
use crate::utils::error::{GatewayError, Result};
use chrono::{DateTime, Duration, FixedOffset, Utc};

/// 取件時間固定以 UTC+3 (莫斯科時間，無夏令時間) 表示
const PICKUP_UTC_OFFSET_SECS: i32 = 3 * 3600;

pub fn pickup_offset() -> FixedOffset {
    FixedOffset::east_opt(PICKUP_UTC_OFFSET_SECS).expect("UTC+3 is a valid offset")
}

pub fn normalize(offer: &RawOffer, now: DateTime<Utc>) -> Result<TariffOffer> {
    let delivery_time_in_day = parse_days(&offer.min_term)?;
    let price = parse_price(&offer.sum)?;

    let pickup_day = now.with_timezone(&pickup_offset());
    let delivery_day = Duration::try_days(delivery_time_in_day)
        .and_then(|term| pickup_day.checked_add_signed(term))
        .ok_or_else(|| {
            GatewayError::structural(format!(
                "MinTerm '{}' is out of the supported date range",
                offer.min_term
            ))
        })?;

    Ok(TariffOffer {
        courier_service: COURIER_SERVICE.to_string(),
        courier_service_rating: None,
        price,
        delivery_time_in_day,
        pickup_day,
        delivery_day,
        delivery_rate: offer.description.clone(),
        delivery_rate_description: offer.delivery_method.clone(),
    })
}

fn parse_days(min_term: &str) -> Result<i64> {
    let days: i64 = min_term.trim().parse().map_err(|e| {
        GatewayError::structural(format!("MinTerm '{}' is not an integer: {}", min_term, e))
    })?;

    if days < 0 {
        return Err(GatewayError::structural(format!(
            "MinTerm '{}' must not be negative",
            min_term
        )));
    }
    Ok(days)
}

/// `Sum` 為十進位字串，向零截斷為整數
fn parse_price(sum: &str) -> Result<i64> {
    let value: f64 = sum.trim().parse().map_err(|e| {
        GatewayError::structural(format!("Sum '{}' is not a decimal number: {}", sum, e))
    })?;

    let truncated = value.trunc();
    if !truncated.is_finite() || truncated < i64::MIN as f64 || truncated > i64::MAX as f64 {
        return Err(GatewayError::structural(format!(
            "Sum '{}' is out of range",
            sum
        )));
    }
    Ok(truncated as i64)
}
