use clap::{Parser, Subcommand};

use crate::{
    api::{create_router, ApiSettings, AppState},
    config::Config,
    services::{BuildRequest, Credentials, ProgressFn, SnapshotService},
};

/// Streaming catalog snapshot builder and server
#[derive(Parser)]
#[command(name = "stream-catalog")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve snapshots over HTTP (default)
    Serve,

    /// Load the latest snapshot or build a new one
    Build {
        /// Rebuild even if a snapshot already exists
        #[arg(long)]
        force: bool,

        /// Page cap per provider and category
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        max_pages: Option<u32>,
    },

    /// Print the name of the latest snapshot
    Latest,
}

impl Cli {
    pub async fn run(self, config: Config) -> anyhow::Result<()> {
        let service = SnapshotService::from_config(&config);

        match self.command {
            None | Some(Commands::Serve) => serve(config, service).await,
            Some(Commands::Build { force, max_pages }) => {
                let request = BuildRequest {
                    credentials: Credentials::from_config(&config),
                    force_refresh: force,
                    max_pages: max_pages.unwrap_or(config.max_pages),
                };

                let progress = |message: &str, fraction: f64| {
                    tracing::info!(fraction = fraction, "{}", message);
                };

                let (snapshot, origin) = service
                    .load_or_build(&request, Some(&progress as &ProgressFn<'_>))
                    .await?;

                println!(
                    "{} ({:?}): {} entries",
                    snapshot.filename,
                    origin,
                    snapshot.len()
                );
                Ok(())
            }
            Some(Commands::Latest) => {
                match service.store().find_latest()? {
                    Some(filename) => println!("{}", filename),
                    None => println!("No snapshot found in {}", config.snapshot_dir.display()),
                }
                Ok(())
            }
        }
    }
}

async fn serve(config: Config, service: SnapshotService) -> anyhow::Result<()> {
    let state = AppState::new(
        service,
        ApiSettings {
            credentials: Credentials::from_config(&config),
            default_max_pages: config.max_pages,
        },
    );
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
