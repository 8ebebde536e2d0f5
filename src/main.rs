use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use project_board::config::{cors_origins_from_env, ServerConfig};
use project_board::service::ProjectService;
use project_board::{api, db};

#[derive(Parser)]
#[command(name = "pboard")]
#[command(about = "REST backend for university group projects and their Kanban tasks")]
struct Cli {
    #[command(flatten)]
    server: ServerArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (default)
    Serve,
    /// Apply pending database migrations and exit
    Migrate,
}

#[derive(Args)]
struct ServerArgs {
    /// Address to bind
    #[arg(long, global = true, env = "PROJECT_BOARD_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port for the HTTP API
    #[arg(short, long, global = true, env = "PROJECT_BOARD_PORT", default_value = "8080")]
    port: u16,

    /// Path to the SQLite database file (defaults to the platform data directory)
    #[arg(long, global = true, env = "PROJECT_BOARD_DATABASE")]
    database: Option<PathBuf>,
}

impl From<ServerArgs> for ServerConfig {
    fn from(args: ServerArgs) -> Self {
        Self {
            host: args.host,
            port: args.port,
            database: args.database,
            cors_origins: cors_origins_from_env(),
        }
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG")
            .unwrap_or_else(|_| "project_board=debug,pboard=debug,tower_http=debug".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn open_database(path: Option<PathBuf>) -> anyhow::Result<db::Database> {
    let db = match path {
        Some(path) => db::Database::open(path)?,
        None => db::Database::open_default()?,
    };
    db.migrate()?;
    Ok(db)
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let db = open_database(config.database.clone())?;
    let app = api::create_router_with_cors(ProjectService::new(db), config.cors_layer());

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!("Project board listening on http://{}", config.bind_address());

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = ServerConfig::from(cli.server);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await?,
        Commands::Migrate => {
            open_database(config.database)?;
            tracing::info!("Database is up to date");
        }
    }

    Ok(())
}
