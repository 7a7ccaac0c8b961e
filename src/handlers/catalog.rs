// src/handlers/catalog.rs

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
    models::catalog::{CreateCatalogItemPayload, ServiceCatalogItem, UpdateCatalogItemPayload},
    services::listing::{paginate, ListQuery, Page},
};

/// Serviços ativos, para qualquer usuário logado.
#[utoipa::path(
    get,
    path = "/api/catalog",
    tag = "Catalog",
    responses((status = 200, description = "Serviços ativos", body = Vec<ServiceCatalogItem>)),
    security(("api_jwt" = []))
)]
pub async fn list_active_services(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<ServiceCatalogItem>>, AppError> {
    Ok(Json(app_state.catalog_service.list_active().await?))
}

#[utoipa::path(
    get,
    path = "/api/manage/catalog",
    tag = "Catalog",
    params(ListQuery),
    responses((status = 200, description = "Catálogo completo", body = Page<ServiceCatalogItem>)),
    security(("api_jwt" = []))
)]
pub async fn list_services(
    State(app_state): State<AppState>,
    _guard: RequireRole<ManagerRole>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<ServiceCatalogItem>>, AppError> {
    let items = app_state.catalog_service.list_all().await?;
    Ok(Json(paginate(items, &query)))
}

#[utoipa::path(
    post,
    path = "/api/manage/catalog",
    tag = "Catalog",
    request_body = CreateCatalogItemPayload,
    responses((status = 201, description = "Serviço criado", body = ServiceCatalogItem)),
    security(("api_jwt" = []))
)]
pub async fn create_service(
    State(app_state): State<AppState>,
    _guard: RequireRole<ManagerRole>,
    Json(payload): Json<CreateCatalogItemPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let item = app_state.catalog_service.create_item(payload).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

#[utoipa::path(
    get,
    path = "/api/manage/catalog/{id}",
    tag = "Catalog",
    params(("id" = Uuid, Path, description = "ID do serviço")),
    responses(
        (status = 200, description = "Serviço", body = ServiceCatalogItem),
        (status = 404, description = "Serviço não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_service(
    State(app_state): State<AppState>,
    _guard: RequireRole<ManagerRole>,
    Path(id): Path<Uuid>,
) -> Result<Json<ServiceCatalogItem>, AppError> {
    Ok(Json(app_state.catalog_service.get_item(id).await?))
}

#[utoipa::path(
    put,
    path = "/api/manage/catalog/{id}",
    tag = "Catalog",
    params(("id" = Uuid, Path, description = "ID do serviço")),
    request_body = UpdateCatalogItemPayload,
    responses((status = 200, description = "Serviço atualizado", body = ServiceCatalogItem)),
    security(("api_jwt" = []))
)]
pub async fn update_service(
    State(app_state): State<AppState>,
    _guard: RequireRole<ManagerRole>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCatalogItemPayload>,
) -> Result<Json<ServiceCatalogItem>, AppError> {
    payload.validate()?;

    let item = app_state.catalog_service.update_item(id, payload).await?;
    Ok(Json(item))
}

#[utoipa::path(
    delete,
    path = "/api/manage/catalog/{id}",
    tag = "Catalog",
    params(("id" = Uuid, Path, description = "ID do serviço")),
    responses(
        (status = 204, description = "Serviço excluído"),
        (status = 404, description = "Serviço não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_service(
    State(app_state): State<AppState>,
    _guard: RequireRole<ManagerRole>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.catalog_service.delete_item(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
