//! Panopticon binary.
//!
//! Loads `.env`, reads configuration and archives gateway events until Ctrl-C.

use panopticon::{PanopticonConfig, init_tracing, run};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = PanopticonConfig::load()?;
    run(config).await?;

    Ok(())
}
