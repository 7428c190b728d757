use sqlx::mysql::MySqlPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use uniportal::{AppState, config::Config, cors_layer, create_router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logging: RUST_LOG se presente, altrimenti info per l'applicazione e per tower_http
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "uniportal=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Inizializza la configurazione (.env + variabili d'ambiente)
    let config = Config::from_env().map_err(|e| {
        error!("Invalid configuration: {}", e);
        e
    })?;
    config.print_info();

    // Pool di connessioni e migrazioni embedded
    let pool = MySqlPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;
    info!("Database connected");

    sqlx::migrate!().run(&pool).await?;
    info!("Database migrations applied");

    // Stato condiviso: repository, storage, CRM e registro immagini
    let state = Arc::new(AppState::from_config(pool, &config).await?);

    // Crea il router
    let app = create_router(state).layer(cors_layer(config.cors_origin.as_deref()));

    // Definisci l'indirizzo
    let addr: SocketAddr = format!("{}:{}", config.server_host, config.server_port).parse()?;
    info!("Server listening on http://{}", addr);

    // Crea il listener TCP e avvia il server
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
