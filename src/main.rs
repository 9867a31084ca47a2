use anyhow::Result;

use voxlate::app::App;
use voxlate::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    tracing::info!("Starting voxlate voice translation frontend");

    // Load configuration
    let config = Config::load()?;
    config.validate()?;

    let app = App::new(config)?;
    app.run().await
}
