use axum_helpers::{JwtAuth, JwtConfig, TokenSubject, create_production_app, health_router};
use clap::{Parser, Subcommand};
use core_config::FromEnv;
use core_config::tracing::{init_tracing, install_color_eyre};
use database::mongodb::MongoConfig;
use domain_events::{EventService, MongoEventRepository, NewEvent, seed::default_seed_events};
use std::path::PathBuf;
use tracing::{info, warn};

mod api;
mod config;
mod openapi;
mod state;

use config::{Config, Environment};
use state::AppState;

#[derive(Parser)]
#[command(name = "events-api", version)]
#[command(about = "Event discovery and registration service")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server (default)
    Serve,

    /// Delete every event and load the seed set. Destroys all registrations.
    Seed {
        /// Required; seeding refuses to run without it
        #[arg(long)]
        confirm: bool,

        /// JSON array of events to load instead of the built-in set
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Print a development access token signed with JWT_SECRET
    Token {
        #[arg(long)]
        user_id: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        name: String,

        #[arg(long)]
        picture: Option<String>,
    },
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output
    install_color_eyre();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve().await,
        Commands::Seed { confirm, file } => {
            init_tracing(&Environment::from_env());
            seed(confirm, file).await
        }
        Commands::Token {
            user_id,
            email,
            name,
            picture,
        } => {
            init_tracing(&Environment::from_env());
            token(&user_id, &email, &name, picture.as_deref())
        }
    }
}

async fn serve() -> eyre::Result<()> {
    let config = Config::from_env()?;
    init_tracing(&config.environment);

    info!(url = %config.mongodb.url(), "Connecting to MongoDB");
    let mongo_client =
        database::mongodb::connect_from_config_with_retry(&config.mongodb, None).await?;
    let db = mongo_client.database(config.mongodb.database());
    info!(database = %config.mongodb.database(), "Connected to MongoDB");

    api::events::init_indexes(&db).await?;

    let state = AppState {
        jwt: JwtAuth::new(&config.jwt),
        config,
        mongo_client,
        db,
    };

    let api_routes = api::routes(&state);
    let router = axum_helpers::create_router::<openapi::ApiDoc>(api_routes)?;
    let app = router.merge(health_router(state.config.app.clone()));

    info!(
        timeout = ?state.config.server.shutdown_timeout,
        "Starting events API with graceful shutdown"
    );

    let mongo_client = state.mongo_client.clone();
    create_production_app(app, &state.config.server, async move {
        info!("Shutting down: closing MongoDB connections");
        mongo_client.shutdown().await;
        info!("MongoDB connection closed");
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Events API shutdown complete");
    Ok(())
}

async fn seed(confirm: bool, file: Option<PathBuf>) -> eyre::Result<()> {
    if !confirm {
        eyre::bail!("seeding deletes every event and registration; re-run with --confirm");
    }

    let events: Vec<NewEvent> = match &file {
        Some(path) => {
            let raw = tokio::fs::read_to_string(path).await?;
            serde_json::from_str(&raw)
                .map_err(|e| eyre::eyre!("Invalid seed file {}: {}", path.display(), e))?
        }
        None => default_seed_events(),
    };

    let mongodb = MongoConfig::from_env()?;
    let client = database::mongodb::connect_from_config_with_retry(&mongodb, None).await?;
    let db = client.database(mongodb.database());
    api::events::init_indexes(&db).await?;

    warn!(database = %mongodb.database(), "Replacing all events with seed data");
    let service = EventService::new(MongoEventRepository::new(&db));
    let created = service.reset_seed_events(events).await?;

    for event in &created {
        info!(id = %event.id, title = %event.title, "Seeded event");
    }
    info!(count = created.len(), "Seeding complete");
    Ok(())
}

fn token(user_id: &str, email: &str, name: &str, picture: Option<&str>) -> eyre::Result<()> {
    let jwt = JwtAuth::new(&JwtConfig::from_env()?);
    let token = jwt.create_access_token(&TokenSubject {
        user_id,
        email,
        name,
        picture,
    })?;

    println!("{token}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["events-api"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_seed_flags() {
        let cli = Cli::try_parse_from(["events-api", "seed", "--confirm", "-f", "events.json"])
            .unwrap();
        match cli.command {
            Some(Commands::Seed { confirm, file }) => {
                assert!(confirm);
                assert_eq!(file, Some(PathBuf::from("events.json")));
            }
            _ => panic!("expected seed command"),
        }
    }

    #[tokio::test]
    async fn test_seed_without_confirm_refuses() {
        let err = seed(false, None).await.unwrap_err();
        assert!(err.to_string().contains("--confirm"));
    }

    #[test]
    fn test_token_requires_identity() {
        assert!(Cli::try_parse_from(["events-api", "token", "--user-id", "u1"]).is_err());
    }

    #[test]
    fn test_token_uses_jwt_secret() {
        temp_env::with_var("JWT_SECRET", Some("a-development-secret-of-32-chars!!"), || {
            assert!(token("u1", "u1@example.com", "Ada", None).is_ok());
        });
        temp_env::with_var("JWT_SECRET", Some("short"), || {
            assert!(token("u1", "u1@example.com", "Ada", None).is_err());
        });
    }
}
