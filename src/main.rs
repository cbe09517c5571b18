use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use profile_network::export::export_networks;
use profile_network::generate::generate_profile_csv;
use profile_network::server::{serve, ServeConfig};
use profile_network::{LoaderConfig, NetworkRegistry, ProfileTable};
use std::env;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    name = "profile-network",
    version,
    about = "Attribute-sharing networks over academic profiles"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct DataArgs {
    /// Profile CSV to load
    #[arg(long, default_value = "gemini_profesores.csv")]
    data: PathBuf,

    /// Field delimiter of the profile CSV
    #[arg(long, default_value_t = ';')]
    delimiter: char,
}

impl DataArgs {
    fn loader(&self) -> anyhow::Result<LoaderConfig> {
        if !self.delimiter.is_ascii() {
            bail!("delimiter must be a single ASCII character");
        }
        Ok(LoaderConfig {
            delimiter: self.delimiter as u8,
        })
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Precompute every network and serve the visualization
    Serve {
        #[command(flatten)]
        data: DataArgs,
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
        #[arg(long, default_value_t = 5000)]
        port: u16,
    },
    /// Write each network to <out>/<attribute>.json
    Export {
        #[command(flatten)]
        data: DataArgs,
        #[arg(long, default_value = "data1")]
        out: PathBuf,
    },
    /// Write a synthetic profile CSV
    Generate {
        #[arg(long, default_value_t = 140)]
        rows: usize,
        #[arg(long, default_value = "gemini_profesores.csv")]
        out: PathBuf,
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("PROFNET_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "profile_network=debug,info"
        } else {
            "profile_network=info,warn"
        })
    });

    let format = env::var("PROFNET_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());
    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => registry.with(fmt::layer().json().with_ansi(false)).init(),
        _ => registry.with(fmt::layer().compact()).init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { data, host, port } => {
            let config = ServeConfig {
                loader: data.loader()?,
                data: data.data,
                host,
                port,
            };
            serve(config).await
        }
        Commands::Export { data, out } => {
            let table = ProfileTable::from_path(&data.data, &data.loader()?)
                .with_context(|| format!("loading {}", data.data.display()))?;
            let registry = NetworkRegistry::build(&table);
            let written = export_networks(&registry, &out)?;
            println!("Wrote {} networks to {}", written.len(), out.display());
            Ok(())
        }
        Commands::Generate { rows, out, seed } => {
            generate_profile_csv(rows, seed, &out)
                .with_context(|| format!("generating {}", out.display()))?;
            println!("Wrote {rows} sample profiles to {}", out.display());
            Ok(())
        }
    }
}
