use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use colored::Colorize;
use dotenv::dotenv;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;

use food_lens::capture::camera::{CameraDevice, StubCamera, UnavailableCamera};
use food_lens::capture::picker::{FixedPathPicker, TerminalPicker};
use food_lens::commands::{food_cmd, CommandHandler, Flow};
use food_lens::config::ServiceConfig;
use food_lens::{AnalysisPipeline, CaptureController, FoodConfig, Session};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CameraKind {
    /// Synthetic test pattern
    Stub,
    /// No camera; every request fails
    None,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Nutrition estimates from food photos", long_about = None)]
struct Args {
    /// ImgBB API key (defaults to IMGBB_API_KEY)
    #[arg(long)]
    imgbb_key: Option<String>,

    /// Groq API key (defaults to GROQ_API_KEY)
    #[arg(long)]
    groq_key: Option<String>,

    /// Vision model identifier
    #[arg(long)]
    model: Option<String>,

    /// Analyze this image once and exit
    #[arg(long)]
    image: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "none")]
    camera: CameraKind,

    /// Also write result cards to this HTML file
    #[arg(long)]
    html: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    colored::control::set_override(true);
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut services = ServiceConfig::from_env()?;
    if let Some(model) = args.model.clone() {
        services.model = model;
    }
    let credentials = FoodConfig::with_overrides(args.imgbb_key.clone(), args.groq_key.clone())
        .context("API keys must be provided via flags or environment")?;
    let pipeline = AnalysisPipeline::from_config(credentials, &services)?;

    let camera: Arc<dyn CameraDevice> = match args.camera {
        CameraKind::Stub => Arc::new(StubCamera::default()),
        CameraKind::None => Arc::new(UnavailableCamera),
    };
    let capture = CaptureController::new(camera, Arc::new(TerminalPicker));
    let mut session = Session::new(capture, pipeline);

    match &args.image {
        Some(path) => run_once(&mut session, path, args.html.as_deref()).await,
        None => run_cli_mode(CommandHandler::new(session, args.html.clone())).await,
    }
}

async fn run_once(session: &mut Session, path: &Path, html: Option<&Path>) -> anyhow::Result<()> {
    if let Err(e) = session.start_upload_with(&FixedPathPicker::new(path)).await {
        food_cmd::print_results(session.view());
        return Err(e.into());
    }
    food_cmd::analyze(session, html).await?;
    Ok(())
}

async fn run_cli_mode(mut command_handler: CommandHandler) -> anyhow::Result<()> {
    command_handler.handle_command("help").await.map_err(anyhow::Error::msg)?;

    let mut rl = Editor::<(), DefaultHistory>::new()?;

    loop {
        match rl.readline("🍽️  ") {
            Ok(line) => {
                let input = line.trim();
                let _ = rl.add_history_entry(input);

                match command_handler.handle_command(input).await {
                    Ok(Flow::Continue) => {}
                    Ok(Flow::Exit) => break,
                    Err(e) => println!("{}", e.red()),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }
    Ok(())
}
