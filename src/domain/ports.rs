use crate::domain::model::{CalculationRequest, TariffOffer};
use crate::utils::error::Result;
use async_trait::async_trait;

/// 運費試算來源；HTTP 層只依賴這個介面
#[async_trait]
pub trait TariffProvider: Send + Sync {
    async fn get_calc_tariff(&self, request: &CalculationRequest) -> Result<Vec<TariffOffer>>;
}
