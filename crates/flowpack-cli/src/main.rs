mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "flowpack", about = "Package flows as containerized HTTP services")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a service bundle from a flow file
    Generate {
        /// Flow JSON file
        flow: PathBuf,
        /// Output root (default: [bundle].output_dir)
        #[arg(long)]
        out: Option<PathBuf>,
        /// Also write <bundle>.zip
        #[arg(long)]
        zip: bool,
    },
    /// Zip a generated bundle directory
    Archive {
        /// Bundle directory
        bundle: PathBuf,
    },
    /// Build a container image from a bundle
    Build {
        /// Bundle directory
        bundle: PathBuf,
        /// Image name (default: derived from the bundle directory)
        #[arg(long)]
        image: Option<String>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Start a detached container from an image
    Run {
        /// Image name
        image: String,
        /// Container name (default: the image name)
        #[arg(long)]
        name: Option<String>,
        /// Host port (default: first free port in [ports])
        #[arg(long, short = 'p')]
        port: Option<u16>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Generate, build, and run a flow in one step (container `<image>-<port>`)
    Deploy {
        /// Flow JSON file
        flow: PathBuf,
        /// Output root (default: [bundle].output_dir)
        #[arg(long)]
        out: Option<PathBuf>,
        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the first free local port
    Port {
        /// First port to try (default: [ports].start)
        #[arg(long)]
        start: Option<u16>,
        /// Last port to try (default: [ports].max)
        #[arg(long)]
        max: Option<u16>,
    },
    /// Check container runtime setup
    Doctor,
    /// Eject bundle templates for manual customization
    Eject,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { flow, out, zip } => commands::generate(&flow, out, zip)?,
        Commands::Archive { bundle } => commands::archive(&bundle)?,
        Commands::Build {
            bundle,
            image,
            json,
        } => commands::build(&bundle, image, json).await?,
        Commands::Run {
            image,
            name,
            port,
            json,
        } => commands::run(&image, name, port, json).await?,
        Commands::Deploy { flow, out, json } => commands::deploy(&flow, out, json).await?,
        Commands::Port { start, max } => commands::port(start, max)?,
        Commands::Doctor => commands::doctor().await?,
        Commands::Eject => commands::eject()?,
    }

    Ok(())
}
