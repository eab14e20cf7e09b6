/// HTTP server bootstrap
use std::{
    future::{Future, IntoFuture},
    net::SocketAddr,
    sync::Arc,
    time::Duration,
};

use axum::{
    error_handling::HandleErrorLayer,
    extract::{Extension, Request, State},
    http::{header, Method},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    BoxError, Router,
};
use tokio::{
    net::TcpListener,
    sync::{oneshot, watch},
};
use tower::{timeout::TimeoutLayer, ServiceBuilder};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    config::ServerSettings,
    error::{ApiError, Result},
    repository::UserRepository,
    routes::{self, users::SharedUserService},
    service::UserServiceImpl,
};

pub const API_PREFIX: &str = "/api/v1";

/// Time left for cut-off responses to flush once the grace period is over.
const CUT_OFF_FLUSH: Duration = Duration::from_secs(1);

/// Wire the business layer on top of a repository.
pub fn user_service(repo: Arc<dyn UserRepository>) -> SharedUserService {
    Arc::new(UserServiceImpl::new(repo))
}

/// Full application router: versioned routes plus CORS, tracing and a
/// per-request deadline.
pub fn build_router(service: SharedUserService, request_timeout: Duration) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            header::ORIGIN,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::AUTHORIZATION,
        ]);

    Router::new()
        .nest(API_PREFIX, routes::api_router())
        .layer(Extension(service))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .layer(TimeoutLayer::new(request_timeout)),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

async fn handle_middleware_error(err: BoxError) -> ApiError {
    if err.is::<tower::timeout::error::Elapsed>() {
        tracing::warn!("Request timed out");
        ApiError::RequestTimeout("request timed out".to_string())
    } else {
        tracing::error!("Unhandled middleware error: {}", err);
        ApiError::Internal(err.to_string())
    }
}

/// Answers 503 for a request still running when `stop` flips to true,
/// dropping the handler (and any query it is waiting on).
async fn cut_off_on_hard_stop(
    State(stop): State<watch::Receiver<bool>>,
    req: Request,
    next: Next,
) -> Response {
    tokio::select! {
        response = next.run(req) => response,
        _ = hard_stopped(stop) => {
            tracing::warn!("Request cut off by shutdown");
            ApiError::Unavailable("server is shutting down".to_string()).into_response()
        }
    }
}

async fn hard_stopped(mut stop: watch::Receiver<bool>) {
    if stop.wait_for(|stopped| *stopped).await.is_err() {
        // sender gone without a hard stop
        std::future::pending::<()>().await;
    }
}

pub struct ApiServer {
    listener: TcpListener,
    router: Router,
    shutdown_grace: Duration,
    hard_stop: watch::Sender<bool>,
}

impl ApiServer {
    /// Bind the listen address. Nothing is served until `run`.
    pub async fn bind(settings: &ServerSettings, service: SharedUserService) -> Result<Self> {
        let addr = format!("{}:{}", settings.host, settings.port);
        let listener = TcpListener::bind(&addr).await?;

        let (hard_stop, stop_rx) = watch::channel(false);
        let router = build_router(service, settings.request_timeout())
            .layer(middleware::from_fn_with_state(stop_rx, cut_off_on_hard_stop));

        Ok(Self {
            listener,
            router,
            shutdown_grace: settings.shutdown_grace(),
            hard_stop,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve until `shutdown` resolves. After that no new connections are
    /// accepted and in-flight requests get `shutdown_grace` to finish.
    /// Requests still running then are answered with 503 and their handlers
    /// dropped.
    pub async fn run<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        tracing::info!("Listening on http://{}", self.local_addr()?);
        let Self {
            listener,
            router,
            shutdown_grace: grace,
            hard_stop,
        } = self;

        let (stopping_tx, stopping_rx) = oneshot::channel::<()>();
        let signal = async move {
            shutdown.await;
            tracing::info!("Shutdown requested, draining in-flight requests");
            let _ = stopping_tx.send(());
        };

        let serve = axum::serve(listener, router)
            .with_graceful_shutdown(signal)
            .into_future();
        tokio::pin!(serve);

        tokio::select! {
            biased;
            result = &mut serve => return Ok(result?),
            _ = stopping_rx => {}
        }

        if let Ok(result) = tokio::time::timeout(grace, &mut serve).await {
            result?;
            tracing::info!("Server stopped");
            return Ok(());
        }

        tracing::warn!(
            grace_secs = grace.as_secs(),
            "Grace period elapsed, cutting off in-flight requests"
        );
        let _ = hard_stop.send(true);

        match tokio::time::timeout(CUT_OFF_FLUSH, serve).await {
            Ok(result) => result?,
            Err(_) => tracing::warn!("Connections still open after cut-off, abandoning them"),
        }

        tracing::info!("Server stopped");
        Ok(())
    }
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
