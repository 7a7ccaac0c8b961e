// src/handlers/dashboard.rs

use axum::{extract::State, Json};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::role::{ManagerRole, RequireRole},
    models::dashboard::DashboardSummary,
};

/// Contadores do painel do gerente.
#[utoipa::path(
    get,
    path = "/api/manage/dashboard",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Resumo", body = DashboardSummary),
        (status = 403, description = "Apenas gerentes")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_dashboard(
    State(app_state): State<AppState>,
    _guard: RequireRole<ManagerRole>,
) -> Result<Json<DashboardSummary>, AppError> {
    let summary = app_state.dashboard_service.get_summary().await?;
    Ok(Json(summary))
}
