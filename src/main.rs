use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gridlens::assets::AssetLoader;
use gridlens::models::AppConfig;
use gridlens::server;

#[derive(Parser)]
#[command(name = "gridlens")]
#[command(about = "Checkerboard overlay and color statistics for uploaded images")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Apply the checkerboard overlay to an image file directly
    Process {
        /// Input image (png, jpg, jpeg or gif)
        input: PathBuf,

        /// Output image path (format from extension)
        #[arg(short, long)]
        output: PathBuf,

        /// Cell size as a percentage of the shorter image dimension
        #[arg(short, long, default_value_t = 10.0)]
        cell_size: f64,

        /// Also write the original image's statistics chart here
        #[arg(long)]
        original_chart: Option<PathBuf>,

        /// Also write the processed image's statistics chart here
        #[arg(long)]
        processed_chart: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve) => run_server().await,
        Some(Commands::Process {
            input,
            output,
            cell_size,
            original_chart,
            processed_chart,
        }) => run_process_command(&input, &output, cell_size, original_chart, processed_chart),
        None => {
            run_status_command();
            Ok(())
        }
    }
}

async fn run_server() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gridlens=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

    let asset_loader = Arc::new(AssetLoader::from_env());
    let config = Arc::new(AppConfig::load_from_assets(&asset_loader));

    let state = server::create_app_state(config, asset_loader)?;
    let app = server::build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "Gridlens server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Apply the overlay to a file without starting a server.
fn run_process_command(
    input: &PathBuf,
    output: &PathBuf,
    cell_size: f64,
    original_chart: Option<PathBuf>,
    processed_chart: Option<PathBuf>,
) -> anyhow::Result<()> {
    use gridlens::rendering::ChartRenderer;
    use image::DynamicImage;

    // Minimal logging for CLI
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gridlens=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    if !cell_size.is_finite() || cell_size <= 0.0 {
        anyhow::bail!("cell size must be a positive number, got {cell_size}");
    }

    let image = image::open(input)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", input.display()))?;

    let processed = pixelgrid::overlay(&image, cell_size);
    processed
        .save(output)
        .map_err(|e| anyhow::anyhow!("Failed to write {}: {e}", output.display()))?;
    println!("Wrote {}", output.display());

    if original_chart.is_some() || processed_chart.is_some() {
        let renderer = ChartRenderer::new();

        if let Some(path) = original_chart {
            let png = renderer.render_png(&image, "Original Image")?;
            std::fs::write(&path, png)?;
            println!("Wrote {}", path.display());
        }

        if let Some(path) = processed_chart {
            let processed = DynamicImage::ImageRgb8(processed);
            let png = renderer.render_png(&processed, "Processed Image")?;
            std::fs::write(&path, png)?;
            println!("Wrote {}", path.display());
        }
    }

    Ok(())
}

/// Display status and configuration information
fn run_status_command() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let bind_addr = std::env::var("BIND_ADDR").ok();
    let config_file = std::env::var("CONFIG_FILE").ok();
    let templates_dir = std::env::var("TEMPLATES_DIR").ok();

    println!("Gridlens v{VERSION}");
    println!("Checkerboard overlay and color statistics for uploaded images\n");

    println!("Environment Variables:");
    println!(
        "  BIND_ADDR     = {}",
        bind_addr.as_deref().unwrap_or("0.0.0.0:3000 (default)")
    );
    println!(
        "  CONFIG_FILE   = {}",
        config_file.as_deref().unwrap_or("(not set)")
    );
    println!(
        "  TEMPLATES_DIR = {}",
        templates_dir.as_deref().unwrap_or("(not set)")
    );

    let loader = AssetLoader::from_env();
    let config = AppConfig::load_from_assets(&loader);

    println!("\nEffective Configuration:");
    println!("  upload_dir           = {}", config.upload_dir.display());
    println!("  default_cell_percent = {}", config.default_cell_percent);
    println!("  max_upload_bytes     = {}", config.max_upload_bytes);

    println!("\nRun 'gridlens serve' to start the server.");
}
