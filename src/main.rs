use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use discord_resolver::{AppState, config::Config, discord::DiscordClient, router::create_router};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 加载配置
    let config = Config::from_env();
    if config.discord_token.is_none() {
        tracing::error!(
            "Discord token missing in {}, lookups are disabled",
            config.secrets_path.display()
        );
    }

    #[cfg(debug_assertions)]
    tracing::info!("Running in debug mode with CORS enabled");

    let client = Arc::new(DiscordClient::new(config.discord_api_base.clone()));
    let state = AppState::new(config, client);
    let addr = SocketAddr::new(
        state.config.server_host.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid server_host, falling back to dual-stack default");
            IpAddr::V6(std::net::Ipv6Addr::UNSPECIFIED)
        }),
        state.config.server_port,
    );
    let app = create_router(state);

    // 启动服务器
    tracing::info!("Server listening on {}", addr);
    axum::serve(
        tokio::net::TcpListener::bind(&addr)
            .await
            .expect("Failed to bind"),
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Failed to start server");
}
