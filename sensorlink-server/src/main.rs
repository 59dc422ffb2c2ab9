use std::sync::Arc;

use chrono::Local;

use sensorlink_server::cli::Command;
use sensorlink_server::configs::Settings;
use sensorlink_server::run;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Arc::new(Settings::new()?);

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            let app_name = env!("CARGO_PKG_NAME").replace('-', "_");
            let level = settings.logger.level.as_str();

            format!("{app_name}={level}").into()
        }))
        .init();

    let command = Command::parse(std::env::args().skip(1), Local::now().date_naive())?;

    run(&settings, command).await
}
