use anyhow::Context;
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{self, Write};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};
use treegen::settings::Settings;
use treegen::{server, tree, viewer, BranchGuard, TreeParams};

#[derive(Parser)]
#[command(name = "treegen")]
#[command(author = "Terminal Art Generator")]
#[command(version)]
#[command(about = "Create pretty or awful trees from randomized recursive branching", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render one tree and show it (or write it with --output)
    #[command(allow_negative_numbers = true)]
    Render {
        #[command(flatten)]
        params: TreeParams,

        /// Write the PNG here instead of opening a viewer ("-" for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip the branch_chance_mu safety limit
        #[arg(long)]
        unchecked: bool,
    },

    /// Serve the parameter form over HTTP
    Serve {
        /// Address to listen on (default from settings, else 127.0.0.1:5000)
        #[arg(short, long)]
        bind: Option<SocketAddr>,
    },
}

fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(settings.log_level.as_deref().unwrap_or("info")))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let (settings, settings_error) = match Settings::load() {
        Ok(settings) => (settings, None),
        Err(e) => (Settings::default(), Some(e)),
    };
    init_tracing(&settings);
    if let Some(e) = settings_error {
        warn!(error = %e, "using default settings");
    }

    match cli.command {
        Commands::Render {
            params,
            output,
            unchecked,
        } => {
            let guard = if unchecked {
                BranchGuard::Waive
            } else {
                BranchGuard::Enforce
            };
            let config = params.validate(guard).context("invalid tree parameters")?;
            let seed = params.seed.unwrap_or_else(tree::clock_seed);
            info!(seed, "growing tree");

            let mut rng = StdRng::seed_from_u64(seed);
            let canvas = tree::render(&config, &mut rng);

            match output {
                Some(path) if path.as_os_str() == "-" => {
                    let png = canvas.encode_png()?;
                    let mut stdout = io::stdout().lock();
                    stdout.write_all(&png)?;
                    stdout.flush()?;
                }
                Some(path) => {
                    canvas
                        .save(&path)
                        .with_context(|| format!("cannot write {}", path.display()))?;
                    info!(path = %path.display(), "tree saved");
                }
                None => {
                    viewer::show(&canvas, seed, settings.render.viewer.as_deref())
                        .context("cannot open image viewer")?;
                }
            }
        }
        Commands::Serve { bind } => {
            let addr = bind.unwrap_or(settings.server.bind);
            server::run(addr)?;
        }
    }

    Ok(())
}
