//! Entity configuration service

use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};

use entity_config::{catalogue::Catalogue, config::Args, logging, server, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    logging::init(&args.log_level, args.log_format);

    if let Err(e) = args.validate() {
        error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    let source = args.catalogue_source();
    let catalogue = match Catalogue::load(&source, args.assembly_options()) {
        Ok(catalogue) => catalogue,
        Err(e) => {
            error!("Catalogue {} failed to assemble: {}", source, e);
            std::process::exit(1);
        }
    };

    let config = catalogue.config();
    info!("======================================");
    info!("  Entity configuration service");
    info!("======================================");
    info!("Listen: {}", args.listen);
    info!("Catalogue: {}", source);
    info!(
        "Systems: {}, categories: {}, flows: {}, steps: {}",
        config.systems.len(),
        config.categories.len(),
        config.flows.len(),
        config.steps.len()
    );
    info!("General overrides: {}", catalogue.general_forms().overrides().len());
    info!("Strict uiSchema: {}", args.strict_ui_schema);
    info!("Allowed origins: {}", args.allowed_origins.join(", "));
    info!("======================================");

    let state = Arc::new(AppState::new(args, catalogue));

    server::run(state).await?;

    Ok(())
}
