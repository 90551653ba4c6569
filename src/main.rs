mod config;
mod feed;
mod routes;
mod services;
mod state;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let config = config::ServerConfig::from_env().expect("invalid server configuration");

    let state = match &config.settings_file {
        Some(path) => {
            let file = services::persistence::SettingsFile::new(path.clone());
            let record = file.load_or_init().await.expect("settings file init failed");
            tracing::info!(path = %file.path().display(), "settings loaded from file");
            state::AppState::with_file(record, file)
        }
        None => {
            tracing::warn!("SETTINGS_FILE not set; settings are kept in memory only");
            state::AppState::in_memory()
        }
    };

    let state = match &config.newsapi_key {
        Some(key) => {
            let client = feed::newsapi::NewsClient::new(key.clone(), config.newsapi_base_url.as_deref())
                .expect("news client init failed");
            state.with_news(client)
        }
        None => {
            tracing::warn!("NEWSAPI_KEY not set; the feed serves a setup notice");
            state
        }
    };

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .expect("failed to bind");

    tracing::info!(port = config.port, "newsdesk settings store listening");
    axum::serve(listener, app).await.expect("server failed");
}
