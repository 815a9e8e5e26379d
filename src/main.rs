use std::{path::PathBuf, process::ExitCode};

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::{error, info};
use pipeline::{
    PipelineConfig,
    config::{DEFAULT_DATA_PATH, DEFAULT_SEED, DEFAULT_TEST_SIZE},
};
use server::{
    ServerConfig,
    config::{DEFAULT_ARTIFACTS_DIR, DEFAULT_HOST, DEFAULT_PORT},
};

#[derive(Debug, Parser)]
#[command(name = "house-pricing")]
#[command(version)]
#[command(about = "Train and serve a linear house price model", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fit scaler and model on a CSV and write the artifacts
    Train {
        /// CSV with size, bedrooms, age and price columns
        #[arg(long, default_value = DEFAULT_DATA_PATH)]
        data: PathBuf,

        /// Output directory for modelo.json and scaler.json
        #[arg(long, default_value = DEFAULT_ARTIFACTS_DIR)]
        artifacts: PathBuf,

        /// Seed of the train/test shuffle
        #[arg(long, default_value_t = DEFAULT_SEED)]
        seed: u64,

        /// Fraction of rows held out for evaluation
        #[arg(long, default_value_t = DEFAULT_TEST_SIZE)]
        test_size: f64,
    },

    /// Serve predictions over HTTP
    Serve {
        /// Bind address
        #[arg(long, env = "HOST", default_value = DEFAULT_HOST)]
        host: String,

        /// Listen port
        #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
        port: u16,

        /// Directory holding modelo.json and scaler.json
        #[arg(long, env = "ARTIFACTS_DIR", default_value = DEFAULT_ARTIFACTS_DIR)]
        artifacts: PathBuf,
    },
}

async fn train(config: PipelineConfig) -> anyhow::Result<()> {
    let data = config.data_path.display().to_string();
    let outcome = tokio::task::spawn_blocking(move || pipeline::run(&config))
        .await
        .context("training task panicked")?
        .with_context(|| format!("training on {data} failed"))?;

    info!(
        "training done: test r2 {:.4} ({}), artifacts in {}",
        outcome.fitted.evaluation.test.r2(),
        outcome.fitted.evaluation.quality(),
        outcome.store.dir().display()
    );
    Ok(())
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let addr = config.addr();
    server::serve(config)
        .await
        .with_context(|| format!("server on {addr} failed"))
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let res = match cli.command {
        Commands::Train {
            data,
            artifacts,
            seed,
            test_size,
        } => {
            let config = PipelineConfig::new(data, artifacts)
                .with_seed(seed)
                .with_test_size(test_size);
            train(config).await
        }
        Commands::Serve {
            host,
            port,
            artifacts,
        } => {
            let config = ServerConfig {
                host,
                port,
                artifacts_dir: artifacts,
            };
            serve(config).await
        }
    };

    match res {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn train_defaults() {
        let cli = Cli::try_parse_from(["house-pricing", "train"]).unwrap();
        let Commands::Train {
            data,
            artifacts,
            seed,
            test_size,
        } = cli.command
        else {
            panic!("expected train");
        };

        assert_eq!(data, PathBuf::from("./precios_casa.csv"));
        assert_eq!(artifacts, PathBuf::from("./artifacts"));
        assert_eq!(seed, 42);
        assert_eq!(test_size, 0.2);
    }

    #[test]
    fn train_flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "house-pricing",
            "train",
            "--data",
            "data/sample_data.csv",
            "--seed",
            "7",
            "--test-size",
            "0.3",
        ])
        .unwrap();

        let Commands::Train {
            data, seed, test_size, ..
        } = cli.command
        else {
            panic!("expected train");
        };
        assert_eq!(data, PathBuf::from("data/sample_data.csv"));
        assert_eq!(seed, 7);
        assert_eq!(test_size, 0.3);
    }

    #[test]
    fn serve_accepts_address_flags() {
        let cli = Cli::try_parse_from([
            "house-pricing",
            "serve",
            "--host",
            "127.0.0.1",
            "--port",
            "8080",
            "--artifacts",
            "/srv/models",
        ])
        .unwrap();

        let Commands::Serve {
            host,
            port,
            artifacts,
        } = cli.command
        else {
            panic!("expected serve");
        };
        assert_eq!(host, "127.0.0.1");
        assert_eq!(port, 8080);
        assert_eq!(artifacts, PathBuf::from("/srv/models"));
    }

    #[test]
    fn unknown_subcommand_is_rejected() {
        assert!(Cli::try_parse_from(["house-pricing", "predict"]).is_err());
    }
}
