use anyhow::Result;
use tracing::info;

fn main() -> Result<()> {
    // Diagnostics go to stderr; stdout is reserved for the UCI protocol.
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_writer(std::io::stderr)
        .init();

    info!("skewer starting");
    skewer_uci::UciEngine::new().run()?;
    Ok(())
}
