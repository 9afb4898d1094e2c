use anyhow::Context as _;

use cabinet_infra::{AppContext, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cabinet_observability::init();

    let config = Config::from_env()?;
    let bind_addr = config.bind_addr.clone();
    let ctx = AppContext::init(config).await?;

    let app = cabinet_api::app::build_app(ctx.provider());

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    ctx.shutdown().await;
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
