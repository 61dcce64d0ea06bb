use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use common::storage::BlobStore;
use common::storage::filesystem::FilesystemBlobStore;
use common::storage::memory::MemoryBlobStore;
use common::storage::s3::{S3BlobStore, S3Settings};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use server::config::{AppConfig, StorageBackend, StorageConfig};
use server::services::conversion::{ImageConverter, Passthrough, WebpConverter};
use server::state::AppState;

async fn blob_store(config: &StorageConfig) -> anyhow::Result<Arc<dyn BlobStore>> {
    let store: Arc<dyn BlobStore> = match config.backend {
        StorageBackend::Filesystem => Arc::new(
            FilesystemBlobStore::new(config.data_dir.clone(), config.max_blob_size)
                .await
                .with_context(|| format!("opening blob directory {}", config.data_dir.display()))?,
        ),
        StorageBackend::Memory => {
            warn!("Using in-memory blob storage; objects are lost on restart");
            Arc::new(MemoryBlobStore::new())
        }
        StorageBackend::S3 => {
            let s3 = config
                .s3
                .clone()
                .context("storage.backend is s3 but the storage.s3 section is missing")?;
            Arc::new(S3BlobStore::new(&S3Settings {
                bucket: s3.bucket,
                region: s3.region,
                endpoint: s3.endpoint,
                access_key: s3.access_key,
                secret_key: s3.secret_key,
                path_style: s3.path_style,
            })?)
        }
    };
    Ok(store)
}

fn image_converter(config: &AppConfig) -> Arc<dyn ImageConverter> {
    match &config.image.conversion_endpoint {
        Some(endpoint) => Arc::new(WebpConverter::new(
            reqwest::Client::new(),
            endpoint.clone(),
            config.image.api_token.clone(),
        )),
        None => {
            warn!("No image conversion endpoint configured; images are staged unconverted");
            Arc::new(Passthrough)
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load().context("loading configuration")?;

    let db = server::database::init_db(&config.database)
        .await
        .context("connecting to the database")?;
    server::seed::ensure_indexes(&db).await?;

    let state = AppState {
        db,
        blob_store: blob_store(&config.storage).await?,
        converter: image_converter(&config),
        config: config.clone(),
    };
    let app = server::build_router(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("invalid server.host / server.port")?;
    info!("Server running at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
