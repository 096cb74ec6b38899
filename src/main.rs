use clap::Parser;
use courier_tariff_gateway::api::{self, AppState};
use courier_tariff_gateway::utils::{logger, validation::Validate};
use courier_tariff_gateway::{CliArgs, TariffGateway};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    // 載入配置
    let config = match args.load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load configuration: {}", e);
            eprintln!("💡 Pass --config <file> or set PONY_API_URL and PONY_API_KEY");
            std::process::exit(1);
        }
    };

    // 初始化日誌
    logger::init_logger(&config.logging.level, &config.logging.format);

    tracing::info!("Starting courier-tariff-gateway");
    tracing::debug!("Config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    tracing::info!("📡 Provider endpoint: {}", config.provider.endpoint()?);

    let gateway = TariffGateway::new(config.provider.clone());
    let state = AppState::new(Arc::new(gateway), config.server.expose_error_details);

    api::serve(&config.bind_address(), state).await?;

    Ok(())
}
