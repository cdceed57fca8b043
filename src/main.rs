//! jaat-gateway - content API for posts, quotes and logs

use clap::Parser;
use std::sync::Arc;
use tracing::{error, info, warn};

use jaat_gateway::{
    auth::AuthSecret,
    config::Args,
    db::MongoClient,
    logging,
    server::{self, AppState},
    store::{ContentStore, MemoryContentStore, MongoContentStore},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    logging::init(&args.log_level, args.log_format)?;

    if let Err(e) = args.validate() {
        error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    info!("======================================");
    info!("  jaat-gateway v{}", env!("CARGO_PKG_VERSION"));
    info!("======================================");
    info!("Listen: {}", args.listen);
    info!("Mode: {}", if args.dev_mode { "DEVELOPMENT" } else { "PRODUCTION" });
    info!("Database: {}", args.mongodb_db);
    info!("Request timeout: {} ms", args.request_timeout_ms);
    info!("Max body: {} bytes", args.max_body_bytes);
    info!("======================================");

    let store = match connect_store(&args).await {
        Ok(store) => store,
        Err(e) => {
            if args.dev_mode {
                warn!("MongoDB unavailable (dev mode, using in-memory store): {}", e);
                Arc::new(MemoryContentStore::new()) as Arc<dyn ContentStore>
            } else {
                error!("MongoDB connection failed: {}", e);
                std::process::exit(1);
            }
        }
    };

    let auth = match AuthSecret::resolve(args.auth_secret.as_deref(), store.as_ref(), args.dev_mode).await {
        Ok(secret) => secret,
        Err(e) => {
            error!("Auth secret unavailable: {}", e);
            std::process::exit(1);
        }
    };

    let state = Arc::new(AppState::new(args, store, auth));
    server::run(state).await?;

    Ok(())
}

async fn connect_store(args: &Args) -> jaat_gateway::Result<Arc<dyn ContentStore>> {
    let mongo = MongoClient::new(&args.mongodb_uri, &args.mongodb_db).await?;
    let store = MongoContentStore::new(&mongo).await?;
    info!("MongoDB connected successfully");
    Ok(Arc::new(store))
}
