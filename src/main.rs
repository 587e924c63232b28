//! kotoami CLI: language-learning knowledge network builder.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use kotoami::builder::NetworkBuilder;
use kotoami::config::NetworkConfig;
use kotoami::eval;

#[derive(Parser)]
#[command(name = "kotoami", version, about = "Language-learning knowledge network builder")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the network artifacts from validated records.
    Build {
        /// Path to the validated grammar pattern records.
        #[arg(long)]
        grammar: PathBuf,

        /// Path to the validated vocabulary entry records.
        #[arg(long)]
        vocab: PathBuf,

        /// Optional guidebook lesson records for enrichment.
        #[arg(long)]
        lessons: Option<PathBuf>,

        /// Output directory for nodes.json and edges.json.
        #[arg(long, default_value = "network_output")]
        out: PathBuf,

        /// TOML file overriding threshold and weight defaults.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Fail instead of writing an edgeless graph.
        #[arg(long)]
        strict_edges: bool,
    },

    /// Score previously built artifacts.
    Evaluate {
        /// Directory holding nodes.json and edges.json.
        #[arg(long, default_value = "network_output")]
        artifacts: PathBuf,

        /// Prior edges.json to compute the reproducibility Jaccard against.
        #[arg(long)]
        prev_edges: Option<PathBuf>,

        /// Print the report as JSON instead of text.
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            grammar,
            vocab,
            lessons,
            out,
            config,
            strict_edges,
        } => {
            let config = match config {
                Some(path) => NetworkConfig::from_toml_file(&path).into_diagnostic()?,
                None => NetworkConfig::default(),
            };

            let builder = NetworkBuilder::new(config)
                .into_diagnostic()?
                .strict_edges(strict_edges);
            let report = builder
                .build(&grammar, &vocab, lessons.as_deref(), &out)
                .into_diagnostic()?;

            println!("{report}");
            println!("artifacts written to {}", out.display());
        }

        Commands::Evaluate {
            artifacts,
            prev_edges,
            json,
        } => {
            let report = eval::evaluate(&artifacts, prev_edges.as_deref()).into_diagnostic()?;
            if json {
                let rendered = serde_json::to_string_pretty(&report).into_diagnostic()?;
                println!("{rendered}");
            } else {
                println!("{report}");
            }
        }
    }

    Ok(())
}
