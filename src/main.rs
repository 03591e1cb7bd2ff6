mod shutdown;
mod startup;

use tracing::info;

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Initialize logging
    startup::init_logging()?;

    info!("Starting practice-hours editor");

    // Load configuration
    let config = startup::load_config()?;
    let doctor = startup::doctor_from_args(&config)?;

    // Run the editor
    startup::run_editor(config, &doctor).await
}
