use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use axum::{
    Json,
    Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_with::{DisplayFromStr, serde_as};
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::{
    core::{Optimizer, Outcome, Rejection, Series, Tariffs},
    prelude::*,
    quantity::{energy::KilowattHours, power::Kilowatts},
};

pub struct AppState {
    pub tariffs: Tariffs,
    pub request_timeout: Duration,
}

pub fn router(state: AppState) -> Router {
    let request_timeout = state.request_timeout;
    Router::new()
        .route("/", get(get_index))
        .route("/calculate", post(post_calculate))
        .with_state(Arc::new(state))
        .layer((
            TraceLayer::new_for_http(),
            TimeoutLayer::new(request_timeout),
            CorsLayer::permissive(),
        ))
}

/// Per <https://github.com/tokio-rs/axum/blob/main/examples/graceful-shutdown/src/main.rs>.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("shutting down…");
}

async fn get_index() -> Html<&'static str> {
    Html(include_str!("server/index.html"))
}

/// Billing history as typed into the entry page: whitespace-separated numbers.
#[serde_as]
#[derive(Deserialize)]
pub struct CalculateRequest {
    #[serde_as(as = "DisplayFromStr")]
    off_peak_demand: Series<Kilowatts>,

    #[serde_as(as = "DisplayFromStr")]
    peak_demand: Series<Kilowatts>,

    #[serde_as(as = "DisplayFromStr")]
    peak_consumption: Series<KilowattHours>,

    #[serde_as(as = "DisplayFromStr")]
    off_peak_consumption: Series<KilowattHours>,
}

#[instrument(skip_all)]
async fn post_calculate(
    State(state): State<Arc<AppState>>,
    request: Result<Json<CalculateRequest>, JsonRejection>,
) -> Result<Json<Outcome>, ProcessingError> {
    let Json(request) = request?;
    info!(n_periods = request.off_peak_demand.len(), "calculating…");

    // The scan length grows with the demand magnitude, keep it off the reactor,
    // and stop it once the request is dropped, for example, on timeout:
    let should_terminate = Arc::new(AtomicBool::new(false));
    let _terminate_on_drop = TerminateOnDrop(Arc::clone(&should_terminate));
    let outcome = tokio::task::spawn_blocking(move || {
        Optimizer::builder()
            .tariffs(&state.tariffs)
            .off_peak_demand(request.off_peak_demand)
            .peak_demand(request.peak_demand)
            .peak_consumption(request.peak_consumption)
            .off_peak_consumption(request.off_peak_consumption)
            .should_terminate(&should_terminate)
            .optimize()
    })
    .await??;

    match &outcome {
        Outcome::Optimized(comparison) => {
            info!(
                recommended_modality = %comparison.recommended_modality,
                minimum_cost = %comparison.minimum_cost,
                "calculated"
            );
        }
        Outcome::Rejected(rejection) => {
            warn!(error = %rejection.error, "rejected");
        }
    }
    Ok(Json(outcome))
}

/// Raises the flag when dropped.
struct TerminateOnDrop(Arc<AtomicBool>);

impl Drop for TerminateOnDrop {
    fn drop(&mut self) {
        self.0.store(true, Ordering::Relaxed);
    }
}

/// Anything that went wrong besides an inconsistent history.
pub struct ProcessingError(Error);

impl<E: Into<Error>> From<E> for ProcessingError {
    fn from(error: E) -> Self {
        Self(error.into())
    }
}

impl IntoResponse for ProcessingError {
    fn into_response(self) -> Response {
        warn!("failed to process the request: {:#}", self.0);
        let body = Rejection { error: format!("processing error: {:#}", self.0) };
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}
