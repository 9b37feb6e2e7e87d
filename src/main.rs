use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

use listing_wizard::config::Config;
use listing_wizard::logging;
use listing_wizard::rest;
use listing_wizard::wizard::{Classification, StepCatalog, StepSequencer};

#[derive(Parser)]
#[command(name = "listing-wizard")]
#[command(about = "Step sequencing for multi-step property listing forms")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long)]
    config: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the step catalog, marking steps hidden for a classification
    Steps {
        /// Property classification tag (e.g. land_parcel, parking)
        #[arg(short = 'k', long)]
        classification: Option<String>,
    },

    /// Walk the wizard from a form position to the last visible step
    Walk {
        /// Property classification tag
        #[arg(short = 'k', long)]
        classification: Option<String>,

        /// Furthest step reached, 1-based
        #[arg(short, long, default_value_t = 1)]
        form_position: usize,
    },

    /// Start the REST API server
    Api {
        /// Port to listen on (default from config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Print the OpenAPI document
    Openapi {
        /// Emit YAML instead of JSON
        #[arg(long)]
        yaml: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (needed for logging setup)
    let config = Config::load(cli.config.as_deref())?;

    let is_serve_mode = matches!(cli.command, Commands::Api { .. });
    let logging_handle = logging::init_logging(&config, is_serve_mode, cli.debug)?;

    match cli.command {
        Commands::Steps { classification } => cmd_steps(classification),
        Commands::Walk {
            classification,
            form_position,
        } => cmd_walk(classification, form_position),
        Commands::Api { port } => {
            if let Some(path) = &logging_handle.log_file_path {
                eprintln!("Logging to {}", path.display());
            }
            cmd_api(config, port).await?;
        }
        Commands::Openapi { yaml } => cmd_openapi(yaml)?,
    }

    Ok(())
}

fn parse_classification(tag: Option<String>) -> Classification {
    tag.as_deref()
        .map(Classification::from_tag)
        .unwrap_or_default()
}

fn cmd_steps(classification: Option<String>) {
    let classification = parse_classification(classification);
    let sequencer = StepSequencer::new(Arc::new(StepCatalog::listing()), classification, 1);

    println!("Steps for '{}':", sequencer.classification());
    for (index, step) in sequencer.catalog().steps().iter().enumerate() {
        let marker = if sequencer.is_visible(index) {
            " "
        } else {
            "-"
        };
        println!("  {} {:>2}  {:<14} {}", marker, index, step.id, step.title);
    }
    println!(
        "{} of {} steps visible",
        sequencer.visible_count(),
        sequencer.catalog().len()
    );
}

fn cmd_walk(classification: Option<String>, form_position: usize) {
    let classification = parse_classification(classification);
    let mut sequencer =
        StepSequencer::new(Arc::new(StepCatalog::listing()), classification, form_position);

    loop {
        let index = sequencer.current_index();
        let title = sequencer
            .current_step()
            .map(|step| step.title.as_str())
            .unwrap_or("?");
        println!(
            "{:>2}  {:<24} {:>5.1}%",
            index,
            title,
            sequencer.progress_fraction() * 100.0
        );

        if sequencer.is_on_last_visible() {
            break;
        }
        sequencer.advance();
        if sequencer.current_index() == index {
            break;
        }
    }
}

async fn cmd_api(config: Config, port: Option<u16>) -> Result<()> {
    let port = port.unwrap_or(config.api.port);

    println!("Starting REST API server...");
    println!("  Port: {}", port);
    println!("  State: {}", config.state_path().display());
    println!("  Endpoints:");
    println!("    GET    /api/v1/health                 Health check");
    println!("    GET    /api/v1/status                 Server status");
    println!("    GET    /api/v1/steps                  List catalog steps");
    println!("    GET    /api/v1/sessions               List open sessions");
    println!("    POST   /api/v1/sessions               Open or resume a session");
    println!("    PATCH  /api/v1/sessions/:id/form      Update the listing form");
    println!("    POST   /api/v1/sessions/:id/advance   Next visible step");
    println!("    POST   /api/v1/sessions/:id/retreat   Previous visible step");
    println!("    POST   /api/v1/sessions/:id/jump      Jump to a step");
    println!();

    let (state, writer_handle) = rest::ApiState::with_json_store(config);
    let served = rest::serve(state, port).await;

    // Sessions are gone once the server stops; let queued writes finish
    let stats = writer_handle.await?;
    tracing::info!(written = stats.written, failed = stats.failed, "write-behind drained");

    served
}

fn cmd_openapi(yaml: bool) -> Result<()> {
    let doc = if yaml {
        rest::ApiDoc::yaml()?
    } else {
        rest::ApiDoc::json()?
    };
    println!("{}", doc);
    Ok(())
}
