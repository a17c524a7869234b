pub mod api;
pub mod config;
pub mod confirmation;
pub mod form;
pub mod page;
pub mod session;

use anyhow::Context;
use tokio::io::BufReader;

use api::ApiClient;
use config::AppConfig;
use confirmation::SystemBrowser;
use page::PageContent;
use session::Session;

pub fn run() -> anyhow::Result<()> {
    env_logger::init();

    // ─── Configuration ───────────────────────────────────────────────
    let config_dir = AppConfig::default_dir().context("No config directory on this platform")?;
    let app_config = AppConfig::load(&config_dir);
    log::info!("Lead service: {}", app_config.backend_url);

    let client = ApiClient::from_config(&app_config)?;
    let content = PageContent::bundled().map_err(anyhow::Error::msg)?;

    let runtime = tokio::runtime::Runtime::new().context("Failed to start tokio runtime")?;

    runtime.block_on(async move {
        match client.health().await {
            Ok(health) if health.is_healthy() => log::info!("Lead service healthy"),
            Ok(health) => log::warn!(
                "Lead service reports {}: {}",
                health.status,
                health.error.unwrap_or_default()
            ),
            Err(e) => log::warn!("Lead service unreachable: {}", e),
        }

        let session = Session::new(client, SystemBrowser, content, app_config);
        let registered = session.run(BufReader::new(tokio::io::stdin())).await?;
        log::info!("Session ended, {} lead(s) registered", registered);
        Ok::<(), anyhow::Error>(())
    })
}
