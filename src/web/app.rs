//! HTTP handlers and router assembly.
//!
//! Handles:
//! - Landing page and symptom form
//! - Placeholder result page
//! - Inference on `POST /predict`

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{rejection::FormRejection, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Router,
};
use tower_http::trace::TraceLayer;

use crate::application::{PredictError, PredictionService};
use crate::ports::{FeatureScaler, Predictor};

use super::pages;

/// Shared handler state: one service for the whole process.
pub type AppState<C, K, S> = Arc<PredictionService<C, K, S>>;

/// Build the application router around a prediction service.
pub fn router<C, K, S>(service: AppState<C, K, S>) -> Router
where
    C: Predictor + 'static,
    K: Predictor + 'static,
    S: FeatureScaler + 'static,
{
    Router::new()
        .route("/", get(home))
        .route("/front-end", get(front_end).post(front_end_submit))
        .route(
            "/predict",
            post(predict::<C, K, S>).fallback(predict_wrong_method),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

/// Bind `addr` and serve `app` until Ctrl-C.
///
/// # Errors
/// Returns `EndoscreenError::Io` if the address cannot be bound or the
/// server fails.
pub async fn serve(addr: SocketAddr, app: Router) -> crate::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {e}");
        // Without a signal handler, keep serving until the process is killed.
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

async fn home() -> Html<String> {
    Html(pages::home::render())
}

async fn front_end() -> Html<String> {
    Html(pages::form::render())
}

async fn front_end_submit() -> Html<String> {
    Html(pages::result::render_placeholder())
}

async fn predict<C, K, S>(
    State(service): State<AppState<C, K, S>>,
    form: Result<Form<Vec<(String, String)>>, FormRejection>,
) -> Response
where
    C: Predictor + 'static,
    K: Predictor + 'static,
    S: FeatureScaler + 'static,
{
    let pairs = match form {
        Ok(Form(pairs)) => pairs,
        Err(rejection) => {
            // Treated as an empty submission; the first feature is reported missing.
            tracing::warn!("Unreadable form body: {rejection}");
            Vec::new()
        }
    };

    match service.predict_pairs(&pairs) {
        Ok(prediction) => Html(pages::result::render(&prediction)).into_response(),
        Err(err) => error_response(&err),
    }
}

async fn predict_wrong_method() -> (StatusCode, &'static str) {
    (StatusCode::BAD_REQUEST, "Bad Request")
}

fn error_response(err: &PredictError) -> Response {
    if err.is_client_error() {
        tracing::info!("Rejected submission: {err}");
        return (StatusCode::BAD_REQUEST, err.to_string()).into_response();
    }

    tracing::error!("Prediction failed: {err}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        format!("Error occurred: {err}"),
    )
        .into_response()
}
