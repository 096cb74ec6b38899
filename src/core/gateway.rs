use crate::adapters::soap::SoapClient;
use crate::config::ProviderConfig;
use crate::core::{offer_normalizer, request_builder, response_parser};
use crate::domain::model::{CalculationRequest, TariffOffer};
use crate::domain::ports::TariffProvider;
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::Utc;

/// PONY EXPRESS 運費試算閘道：組請求 → 呼叫 SOAP → 解析 → 正規化
pub struct TariffGateway {
    config: ProviderConfig,
}

impl TariffGateway {
    pub fn new(config: ProviderConfig) -> Self {
        Self { config }
    }

    async fn run_pipeline(&self, request: &CalculationRequest) -> Result<Vec<TariffOffer>> {
        let request_body = request_builder::build(request);
        tracing::debug!("📝 Provider request body:\n{}", request_body);

        let raw_response = {
            let client = SoapClient::connect(&self.config)?;
            client
                .submit_request(&self.config.access_key, &request_body)
                .await?
        };
        tracing::debug!("📥 Provider response body:\n{}", raw_response);

        let raw_offers = response_parser::parse(raw_response.as_bytes())?;

        let now = Utc::now();
        raw_offers
            .iter()
            .map(|offer| offer_normalizer::normalize(offer, now))
            .collect()
    }
}

#[async_trait]
impl TariffProvider for TariffGateway {
    async fn get_calc_tariff(&self, request: &CalculationRequest) -> Result<Vec<TariffOffer>> {
        tracing::info!(
            "📦 Calculating tariffs {} → {} ({}x{}x{}, {} kg)",
            request.from_location,
            request.to_location,
            request.packages.length,
            request.packages.width,
            request.packages.height,
            request.packages.weight
        );

        let result = self.run_pipeline(request).await;

        match &result {
            Ok(offers) => tracing::info!("✅ Provider returned {} offers", offers.len()),
            Err(e) if e.kind().is_client_error() => {
                tracing::warn!("⚠️ Provider rejected calculation ({}): {}", e.kind(), e)
            }
            Err(e) => tracing::error!(
                "❌ Tariff calculation failed ({}, retryable: {}): {}",
                e.kind(),
                e.is_retryable(),
                e
            ),
        }

        result
    }
}
