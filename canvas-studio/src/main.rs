//! # Design Canvas Studio
//!
//! Headless host binary for the design canvas.

use canvas_core::CanvasStore;
use canvas_renderer::{AlbumDirectory, ExportPipeline, RasterCapture};
use canvas_studio::{load_script, CliArgs, Command, ScriptRunner, StudioConfig};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "canvas_studio=info,canvas_core=info,canvas_renderer=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Design Canvas Studio");

    let args = CliArgs::parse();
    let config = StudioConfig::from(args);

    tracing::info!(
        "Canvas {}x{}, exporting to {} (album \"{}\")",
        config.width,
        config.height,
        config.out_dir.display(),
        config.album
    );

    let store = CanvasStore::new(config.canvas_config());
    let album =
        AlbumDirectory::new(&config.out_dir).with_permission(config.gallery_permission);
    let pipeline = ExportPipeline::new(RasterCapture::new(config.export_config()), album)
        .with_album(config.album.clone());
    let mut runner = ScriptRunner::new(store.clone(), pipeline);

    // Without a script the blank canvas is exported once.
    let commands = match &config.script {
        Some(path) => load_script(path).await?,
        None => {
            tracing::info!("No script given, exporting the blank canvas");
            vec![Command::Export]
        }
    };
    runner.run(&commands).await;

    if config.dump_registry {
        println!("{}", store.registry().to_json()?);
    }

    tracing::info!("Design Canvas Studio exited");
    Ok(())
}
