//! Business-hours route used by the browser UI banner.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use ouvidoria_core::{check_business_hours, BusinessHoursStatus};
use tracing::info;

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/verificar-horario-comercial", get(get_business_hours))
}

/// GET /api/horario/verificar-horario-comercial: local-time service window.
async fn get_business_hours(State(state): State<Arc<AppState>>) -> Json<BusinessHoursStatus> {
    let now = chrono::Local::now().naive_local();
    let status = check_business_hours(now, state.config.business_hours);

    info!(
        "Business hours check: {} {} - {} - open: {}",
        status.data_atual, status.hora_atual, status.dia_semana, status.eh_horario_comercial
    );

    Json(status)
}
