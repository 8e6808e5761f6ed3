extern crate services;

use anyhow::{Context, Result};
use axum_tracing_opentelemetry::middleware::{OtelAxumLayer, OtelInResponseLayer};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use lib_core::server::config::{config, init_config, ENV_JAEGER_ENDPOINT, SERVER_VERSION};
use lib_rpc_client::client::rest::init_reqwest_client;
use services::handler::mcp::ReqwestUpstream;

#[tokio::main]
async fn main() -> Result<()> {
    // `.env` is optional
    let dotenv = dotenvy::dotenv();

    init_tracing()?;

    if let Err(e) = dotenv {
        tracing::debug!("No .env loaded: {}", e);
    }

    tracing::info!("Starting {}...", SERVER_VERSION);

    init_config()?;
    init_reqwest_client()?;

    let upstream = ReqwestUpstream::new(config().upstream_url.clone());
    tracing::info!("Forwarding MCP calls to [{}]", upstream.url());

    let app = services::router(upstream)
        .layer(OtelInResponseLayer::default())
        .layer(OtelAxumLayer::default());

    let listen = config().listen;
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .with_context(|| format!("Bind [{listen}] failed"))?;
    tracing::info!("Listening on [{}]", listen);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    opentelemetry::global::shutdown_tracer_provider();

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Listen for shutdown signal failed: {}", e);
        return std::future::pending().await;
    }
    tracing::info!("Shutting down...");
}

/// Log to stdout, and to jaeger when `MCD_JAEGER_ENDPOINT` is set.
fn init_tracing() -> Result<()> {
    // Init global text map propagator
    opentelemetry::global::set_text_map_propagator(
        opentelemetry_jaeger::Propagator::with_custom_header_and_baggage(
            "x-mcd-trace-id",
            "x-mcd-ctx-",
        ),
    );

    let jaeger_endpoint = std::env::var(ENV_JAEGER_ENDPOINT)
        .ok()
        .filter(|e| !e.trim().is_empty());

    let tracing_layer = match jaeger_endpoint {
        Some(endpoint) => {
            // Init Jaeger tracer
            let tracer = opentelemetry_jaeger::new_agent_pipeline()
                .with_service_name("mcd-coupon-server")
                .with_endpoint(endpoint)
                .with_instrumentation_library_tags(false)
                .install_batch(opentelemetry_sdk::runtime::Tokio)
                .context("Init jaeger tracer failed")?;
            Some(tracing_opentelemetry::layer().with_tracer(tracer))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_layer)
        .with(fmt::layer())
        .try_init()
        .context("Init tracing subscriber failed")
}
