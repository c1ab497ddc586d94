use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;

    let state = amocrm_mock::MockState::default();
    let config = state.config();
    tracing::info!(
        %addr,
        client_id = %config.client_id,
        login = %config.login,
        "mock amoCRM account listening"
    );
    amocrm_mock::serve(listener, state).await
}
