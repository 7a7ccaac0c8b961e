// src/handlers/maintenance.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::role::{ManagerRole, RequireRole},
    models::{
        enriched::EnrichedMaintenance,
        maintenance::{
            CreateMaintenancePayload, MaintenanceItem, UpdateMaintenancePayload,
            UpdateMaintenanceStatusPayload,
        },
    },
    services::listing::{paginate, ListQuery, Page},
};

#[utoipa::path(
    post,
    path = "/api/manage/maintenance",
    tag = "Maintenance",
    request_body = CreateMaintenancePayload,
    responses(
        (status = 201, description = "Manutenção agendada", body = MaintenanceItem),
        (status = 400, description = "Dados inválidos ou veículo inexistente")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_maintenance(
    State(app_state): State<AppState>,
    _guard: RequireRole<ManagerRole>,
    Json(payload): Json<CreateMaintenancePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let item = app_state.maintenance_service.create_item(payload).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

#[utoipa::path(
    get,
    path = "/api/manage/maintenance",
    tag = "Maintenance",
    params(ListQuery),
    responses((status = 200, description = "Manutenções paginadas", body = Page<EnrichedMaintenance>)),
    security(("api_jwt" = []))
)]
pub async fn list_maintenance(
    State(app_state): State<AppState>,
    _guard: RequireRole<ManagerRole>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<EnrichedMaintenance>>, AppError> {
    let items = app_state.maintenance_service.list_enriched().await?;
    Ok(Json(paginate(items, &query)))
}

#[utoipa::path(
    get,
    path = "/api/manage/maintenance/{id}",
    tag = "Maintenance",
    params(("id" = Uuid, Path, description = "ID da manutenção")),
    responses(
        (status = 200, description = "Manutenção", body = MaintenanceItem),
        (status = 404, description = "Manutenção não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_maintenance(
    State(app_state): State<AppState>,
    _guard: RequireRole<ManagerRole>,
    Path(id): Path<Uuid>,
) -> Result<Json<MaintenanceItem>, AppError> {
    Ok(Json(app_state.maintenance_service.get_item(id).await?))
}

#[utoipa::path(
    put,
    path = "/api/manage/maintenance/{id}",
    tag = "Maintenance",
    params(("id" = Uuid, Path, description = "ID da manutenção")),
    request_body = UpdateMaintenancePayload,
    responses((status = 200, description = "Manutenção atualizada", body = MaintenanceItem)),
    security(("api_jwt" = []))
)]
pub async fn update_maintenance(
    State(app_state): State<AppState>,
    _guard: RequireRole<ManagerRole>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMaintenancePayload>,
) -> Result<Json<MaintenanceItem>, AppError> {
    payload.validate()?;

    let item = app_state.maintenance_service.update_item(id, payload).await?;
    Ok(Json(item))
}

#[utoipa::path(
    patch,
    path = "/api/manage/maintenance/{id}/status",
    tag = "Maintenance",
    params(("id" = Uuid, Path, description = "ID da manutenção")),
    request_body = UpdateMaintenanceStatusPayload,
    responses((status = 200, description = "Estado alterado", body = MaintenanceItem)),
    security(("api_jwt" = []))
)]
pub async fn set_maintenance_status(
    State(app_state): State<AppState>,
    _guard: RequireRole<ManagerRole>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMaintenanceStatusPayload>,
) -> Result<Json<MaintenanceItem>, AppError> {
    let item = app_state
        .maintenance_service
        .set_status(id, payload.status)
        .await?;
    Ok(Json(item))
}

#[utoipa::path(
    delete,
    path = "/api/manage/maintenance/{id}",
    tag = "Maintenance",
    params(("id" = Uuid, Path, description = "ID da manutenção")),
    responses(
        (status = 204, description = "Manutenção excluída"),
        (status = 404, description = "Manutenção não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_maintenance(
    State(app_state): State<AppState>,
    _guard: RequireRole<ManagerRole>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.maintenance_service.delete_item(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
