use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;

use captioncraft::client::{CaptionClient, ClientState, DEFAULT_SERVER_URL};
use captioncraft::{telemetry, Tone};

/// Caption an image through a running CaptionCraft server.
#[derive(Parser, Debug)]
#[command(name = "caption", version)]
struct Args {
    /// Image to caption (jpg, png, webp, gif, ...)
    image: PathBuf,

    /// Caption style
    #[arg(short, long, value_enum, default_value_t = Tone::default())]
    tone: Tone,

    /// Base URL of the caption server
    #[arg(long, env = "CAPTION_SERVER_URL", default_value = DEFAULT_SERVER_URL)]
    server: String,

    /// Print the caption exactly as returned, e.g. to pipe into a clipboard tool
    #[arg(long)]
    raw: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    telemetry::init_tracing("warn");
    let args = Args::parse();

    let mut state = ClientState::new();
    state.select_tone(args.tone);
    let selected = state.select_image(&args.image).await?;

    if !args.raw {
        eprintln!(
            "📸 {} ({}, {} KB) • tone: {}",
            selected.file_name(),
            selected.image.mime_type,
            selected.image.bytes.len().div_ceil(1024),
            args.tone
        );
        eprintln!("🍳 Cooking caption...");
    }

    let client = CaptionClient::new(&args.server);
    state.generate(&client).await;

    if args.raw {
        if let Some(caption) = state.caption() {
            println!("{caption}");
        }
    } else if let Some(rendered) = state.rendered() {
        let color = std::io::stdout().is_terminal();
        println!("\n{}", rendered.styled(color));
    }

    Ok(())
}
