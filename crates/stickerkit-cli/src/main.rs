//! Stickerkit CLI: run local files through the sticker pipeline.
//!
//! Reads the same environment as a chat deployment (FFMPEG_PATH, TEMP_DIR,
//! STORAGE_UPLOAD_URL, ...), optionally from a `.env` file.

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use stickerkit_cli::{default_output_path, FileMessage};
use stickerkit_core::Config;
use stickerkit_infra::{init_telemetry, shutdown_telemetry, StatusBroadcaster};
use stickerkit_processing::{classify, Reply, StickerPipeline};
use stickerkit_storage::create_offload_client;

#[derive(Parser)]
#[command(name = "stickerkit", about = "Turn images, GIFs and videos into WhatsApp stickers")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a file into a 512x512 WebP sticker
    Convert {
        /// Path to the image, GIF or video
        file: PathBuf,
        /// MIME type; guessed from the extension when omitted
        #[arg(long)]
        mime: Option<String>,
        /// Caption sent with the media; defaults to the configured trigger
        #[arg(long)]
        caption: Option<String>,
        /// Output path; defaults to the input with a .webp extension
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Show which conversion strategy a MIME type selects
    Classify {
        /// MIME type, e.g. image/gif
        mime: String,
    },
    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env().context("Invalid configuration")?;
    init_telemetry(config.log_format, &config.environment).map_err(|e| anyhow!(e))?;

    let result = match cli.command {
        Commands::Convert {
            file,
            mime,
            caption,
            output,
        } => convert(&config, file, mime, caption, output).await,
        Commands::Classify { mime } => {
            println!("{}", serde_json::json!({ "mime_type": mime, "class": classify(&mime) }));
            Ok(())
        }
        Commands::Config => print_config(&config),
    };

    shutdown_telemetry().await;
    result
}

async fn convert(
    config: &Config,
    file: PathBuf,
    mime: Option<String>,
    caption: Option<String>,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let offload = create_offload_client(&config.storage)?;
    let status = StatusBroadcaster::new();
    let mut updates = status.subscribe();
    let pipeline = Arc::new(StickerPipeline::from_config(config, offload, status)?);

    let printer = tokio::spawn(async move {
        while let Ok(event) = updates.recv().await {
            eprintln!("[{:?}] {}", event.severity, event.message);
        }
    });

    let output = output.unwrap_or_else(|| default_output_path(&file));
    let caption = caption.unwrap_or_else(|| config.trigger_caption.clone());
    let message = FileMessage::new(file, mime, Some(caption));

    let reply = pipeline
        .spawn_event(message)
        .await
        .context("Pipeline task panicked")?;

    // Closes the status channel so the printer drains and exits.
    drop(pipeline);
    let _ = printer.await;

    match reply {
        Some(Reply::Sticker(sticker)) => {
            tokio::fs::write(&output, &sticker.data)
                .await
                .with_context(|| format!("Failed to write {}", output.display()))?;
            tracing::info!(
                output = %output.display(),
                bytes = sticker.data.len(),
                animated = sticker.animated,
                "Sticker written"
            );
            println!("{}", output.display());
            Ok(())
        }
        Some(Reply::Text(text)) => Err(anyhow!(text)),
        None => {
            println!("Ignored: caption did not match the trigger or the media type is not supported");
            Ok(())
        }
    }
}

fn print_config(config: &Config) -> anyhow::Result<()> {
    let value = serde_json::json!({
        "environment": config.environment,
        "ffmpeg_path": config.ffmpeg_path,
        "encoder_timeout_secs": config.encoder_timeout.as_secs(),
        "temp_dir": config.temp_dir.display().to_string(),
        "trigger_caption": config.trigger_caption,
        "log_format": format!("{:?}", config.log_format).to_lowercase(),
        "storage": {
            "offload_enabled": config.storage.is_configured(),
            "upload_url": config.storage.upload_url,
            "default_ttl_minutes": config.storage.default_ttl_minutes,
        },
    });
    let out = serde_json::to_string_pretty(&value).context("Serialize config")?;
    println!("{}", out);
    Ok(())
}
