#![forbid(unsafe_code)]

use std::io;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::EnvFilter;

use ailabel::console::{self, ConsoleOptions};
use ailabel::{
    encode_judgments, Catalog, GithubContentsSink, LocalDirSink, SessionOptions, SessionState,
    UploadSink, DISPLAY_IMAGE_COUNT,
};

#[derive(Parser)]
#[command(name = "ailabel", version, about = "Pairwise title preference labeling")]
struct Cli {
    /// Log level for ailabel events (overridden by RUST_LOG)
    #[arg(long, global = true, default_value = "info")]
    log_level: Level,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rate variant pairs interactively and export the judgments
    ///
    /// Exports go to the GitHub repository configured through AILABEL_GITHUB_*
    /// environment variables, or to --out-dir when given.
    Rate {
        /// Catalog source (.csv or .json)
        catalog: PathBuf,

        /// Write exports to this directory instead of GitHub
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Export automatically after this many judgments
        #[arg(long)]
        export_every: Option<usize>,

        /// Seed for reproducible pair sampling
        #[arg(long)]
        rng_seed: Option<u64>,

        /// Image cells shown per item
        #[arg(long, default_value_t = DISPLAY_IMAGE_COUNT)]
        images: usize,

        /// Keep pending judgments on quit instead of exporting them
        #[arg(long)]
        no_export_on_quit: bool,
    },
    /// Validate a catalog source and print its item count
    Check {
        /// Catalog source (.csv or .json)
        catalog: PathBuf,
    },
}

fn init_logging(level: Level) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("ailabel={}", level.as_str().to_lowercase()))
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.log_level);

    match cli.command {
        Commands::Check { catalog } => {
            let catalog = Catalog::load(&catalog)?;
            println!("{} items", catalog.item_count());
        }
        Commands::Rate {
            catalog,
            out_dir,
            export_every,
            rng_seed,
            images,
            no_export_on_quit,
        } => {
            if matches!(export_every, Some(0)) {
                return Err("--export-every must be >= 1".into());
            }

            let catalog = Catalog::load(&catalog)?;
            let sink: Box<dyn UploadSink> = match out_dir {
                Some(dir) => Box::new(LocalDirSink::new(dir)?),
                None => Box::new(GithubContentsSink::from_env()?),
            };

            let mut state = SessionState::new(&SessionOptions { rng_seed });
            let options = ConsoleOptions {
                export_every,
                image_slots: images,
                export_on_quit: !no_export_on_quit,
            };

            let stdin = io::stdin();
            let summary = console::run(
                &catalog,
                &mut state,
                sink.as_ref(),
                &options,
                stdin.lock(),
                io::stdout(),
            )
            .await?;

            if summary.pending > 0 {
                eprintln!(
                    "{} comparisons were not exported; their records follow:",
                    summary.pending
                );
                eprint!("{}", encode_judgments(state.pending()));
            }
        }
    }

    Ok(())
}
