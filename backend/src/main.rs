//! Backend entry-point: wires the record store, REST endpoints, and OpenAPI
//! docs.

use std::env;
use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};
use url::Url;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use backend::api::HealthState;
#[cfg(debug_assertions)]
use backend::doc::ApiDoc;
use backend::domain::ports::RecordStore;
use backend::outbound::events::TracingEventSink;
use backend::outbound::persistence::{InMemoryRecordStore, RestRecordStore};
use backend::server::{self, AppContext};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let store = build_store()?;
    let context = web::Data::new(AppContext::new(store, Arc::new(TracingEventSink)));

    let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".into());

    let health_state = web::Data::new(HealthState::new());
    // Clone for server factory so readiness probe remains accessible.
    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        let app = App::new()
            .app_data(server_health_state.clone())
            .app_data(context.clone())
            .configure(server::configure);

        #[cfg(debug_assertions)]
        let app =
            app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

        app
    })
    .bind(bind_addr)?;

    health_state.mark_ready();
    server.run().await
}

/// Pick the record store from the environment.
///
/// `STORE_URL` (with optional `STORE_API_KEY`) selects the remote store.
/// Without it the in-memory store is used, but only in debug builds or when
/// `STORE_ALLOW_MEMORY=1` opts in; releases otherwise refuse to start on an
/// ephemeral store.
fn build_store() -> std::io::Result<Arc<dyn RecordStore>> {
    match env::var("STORE_URL") {
        Ok(raw) => {
            let base = Url::parse(&raw)
                .map_err(|e| std::io::Error::other(format!("invalid STORE_URL {raw}: {e}")))?;
            let api_key = env::var("STORE_API_KEY").ok();
            let store = RestRecordStore::new(base, api_key).map_err(std::io::Error::other)?;
            info!(url = %raw, "using remote record store");
            Ok(Arc::new(store))
        }
        Err(_) => {
            let allow_dev = env::var("STORE_ALLOW_MEMORY").ok().as_deref() == Some("1");
            if cfg!(debug_assertions) || allow_dev {
                warn!("STORE_URL unset; using in-memory record store (dev only)");
                Ok(Arc::new(InMemoryRecordStore::new()))
            } else {
                Err(std::io::Error::other(
                    "STORE_URL is required outside development builds",
                ))
            }
        }
    }
}
