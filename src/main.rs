use anyhow::Result;
use std::sync::Arc;
use teslabridge::logging::{get_logger, init_logging};
use teslabridge::{Config, TeslaAccessory};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid config: {}", e))?;
    init_logging(&config.logging).map_err(|e| anyhow::anyhow!("Failed to init logging: {}", e))?;

    let logger = get_logger("main");
    logger.info("teslabridge starting up");

    let accessory = Arc::new(
        TeslaAccessory::from_config(&config)
            .map_err(|e| anyhow::anyhow!("Failed to create accessory: {}", e))?,
    );

    #[cfg(feature = "web")]
    let web_task = config.web.enabled.then(|| {
        let web_accessory = accessory.clone();
        let host = config.web.host.clone();
        let port = config.web.port;
        tokio::spawn(async move {
            if let Err(e) = teslabridge::web::serve(web_accessory, &host, port).await {
                get_logger("web").error(&e.to_string());
            }
        })
    });

    tokio::signal::ctrl_c().await?;
    logger.info("Shutdown requested");

    #[cfg(feature = "web")]
    if let Some(task) = web_task {
        task.abort();
    }
    accessory.shutdown();
    logger.info("Shutdown complete");
    Ok(())
}
