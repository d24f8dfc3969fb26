use axum::{
    Router,
    extract::{DefaultBodyLimit, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};

use std::{path::PathBuf, sync::Arc};

use crate::{analytics, batches, earnings, expenses, exports, items, uploads, user};
use engine::{Engine, EngineError};

/// Runtime options of the HTTP server.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Directory receiving uploaded receipts.
    pub upload_dir: PathBuf,
    /// Largest accepted request body, in bytes.
    pub max_upload_bytes: usize,
    /// ISO code shown next to dashboard figures.
    pub currency: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("./uploads"),
            max_upload_bytes: 10 * 1024 * 1024,
            currency: "UGX".to_string(),
        }
    }
}

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub config: Arc<ServerConfig>,
}

/// Resolve Basic credentials to an `engine::User` stored in the request
/// extensions.
async fn auth(
    auth_header: Option<TypedHeader<Authorization<Basic>>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(TypedHeader(auth_header)) = auth_header else {
        return Err(StatusCode::UNAUTHORIZED);
    };
    if auth_header.username().is_empty() || auth_header.password().is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let user = match state
        .engine
        .authenticate(auth_header.username(), auth_header.password())
        .await
    {
        Ok(user) => user,
        Err(EngineError::InvalidCredentials) => return Err(StatusCode::UNAUTHORIZED),
        Err(err) => {
            tracing::error!("authentication failed: {err}");
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Build the full application router.
pub fn router(engine: Engine, config: ServerConfig) -> Router {
    let body_limit = config.max_upload_bytes;
    let state = ServerState {
        engine: Arc::new(engine),
        config: Arc::new(config),
    };

    let protected = Router::new()
        .route("/me", get(user::me))
        .route("/batches", get(batches::list).post(batches::create))
        .route(
            "/batches/{id}",
            get(batches::get)
                .put(batches::update)
                .delete(batches::delete),
        )
        .route("/batches/{id}/analytics", get(batches::analytics))
        .route("/batches/{id}/expenses.csv", get(exports::batch_expenses))
        .route("/batches/{id}/earnings.csv", get(exports::batch_earnings))
        .route("/batches/{id}/report.csv", get(exports::batch_report))
        .route("/expenses", post(expenses::create))
        .route(
            "/expenses/{id}",
            get(expenses::get)
                .put(expenses::update)
                .delete(expenses::delete),
        )
        .route("/expenses/{id}/attachment", get(expenses::attachment))
        .route("/earnings", post(earnings::create))
        .route(
            "/earnings/{id}",
            get(earnings::get)
                .put(earnings::update)
                .delete(earnings::delete),
        )
        .route("/items", get(items::list))
        .route("/upload", post(uploads::upload))
        .route("/analytics", get(analytics::dashboard))
        .route("/analytics/export.csv", get(exports::dashboard))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth));

    Router::new()
        .route("/register", post(user::register))
        .merge(protected)
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

pub async fn run(engine: Engine, config: ServerConfig, addr: &str) {
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener on {addr}: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, config, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    config: ServerConfig,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(engine, config)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    config: ServerConfig,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, config, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
