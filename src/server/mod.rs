//! HTTP の受け口
//!
//! JSON の解釈とエラー応答への変換だけを担い、採点そのものは [`Scorer`] に任せる。
//!
//! [`Scorer`]: crate::scorer::Scorer

pub mod cors;
mod routes;

pub use cors::CorsPolicy;
pub use routes::{CalculateRequest, QuestionView};

use crate::catalog::Catalog;
use crate::config::AppConfig;
use crate::error::AppError;
use crate::scorer::Aggregation;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tracing::info;

/// リクエスト間で共有する読み取り専用の状態
#[derive(Debug, Clone)]
pub struct ScoringState {
    catalog: Arc<Catalog>,
    aggregation: Aggregation,
}

impl ScoringState {
    pub fn new(catalog: Arc<Catalog>, aggregation: Aggregation) -> Self {
        Self {
            catalog,
            aggregation,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn aggregation(&self) -> Aggregation {
        self.aggregation
    }
}

pub fn router(state: ScoringState, policy: CorsPolicy) -> Router {
    Router::new()
        .route("/health", get(routes::healthcheck))
        .route("/api/questions", get(routes::questions))
        .route("/api/calculate", post(routes::calculate))
        .with_state(state)
        .layer(middleware::from_fn_with_state(policy, cors::enforce))
}

pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let catalog = Arc::new(config.scoring.load_catalog()?);
    info!(
        questions = catalog.questions().len(),
        max_valid_id = catalog.max_valid_id(),
        "question catalog loaded"
    );

    let state = ScoringState::new(catalog, config.scoring.aggregation);
    let policy = CorsPolicy::new(config.cors.allowed_origins.iter().cloned());
    let app = router(state, policy);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!(
        %addr,
        aggregation = %config.scoring.aggregation,
        "personality scoring service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
