// src/handlers/portal.rs

// Portal do cliente: tudo filtrado pelo usuário logado. Registro de outro
// cliente responde 404, igual a inexistente.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    handlers::files::file_response,
    middleware::auth::CurrentUser,
    models::{
        enriched::{EnrichedInvoice, EnrichedMaintenance, EnrichedVehicle},
        vehicle::VehicleDetail,
    },
    services::listing::{paginate, ListQuery, Page},
};

// O dono é sempre o usuário logado; `ownerId` da query é ignorado
fn own(mut query: ListQuery) -> ListQuery {
    query.owner_id = None;
    query
}

#[utoipa::path(
    get,
    path = "/api/portal/vehicles",
    tag = "Portal",
    params(ListQuery),
    responses((status = 200, description = "Meus veículos", body = Page<EnrichedVehicle>)),
    security(("api_jwt" = []))
)]
pub async fn list_my_vehicles(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<EnrichedVehicle>>, AppError> {
    let vehicles = app_state.vehicle_service.list_for_owner(user.id).await?;
    Ok(Json(paginate(vehicles, &own(query))))
}

#[utoipa::path(
    get,
    path = "/api/portal/vehicles/{id}",
    tag = "Portal",
    params(("id" = Uuid, Path, description = "ID do veículo")),
    responses(
        (status = 200, description = "Detalhe do veículo", body = VehicleDetail),
        (status = 404, description = "Veículo não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_my_vehicle(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<VehicleDetail>, AppError> {
    let detail = app_state.vehicle_service.vehicle_detail(id, &user).await?;
    Ok(Json(detail))
}

#[utoipa::path(
    get,
    path = "/api/portal/vehicles/{id}/image",
    tag = "Portal",
    params(("id" = Uuid, Path, description = "ID do veículo")),
    responses(
        (status = 200, description = "Imagem do veículo", content_type = "image/*"),
        (status = 404, description = "Sem imagem")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_my_vehicle_image(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let vehicle = app_state.vehicle_service.get_for_viewer(id, &user).await?;
    let (path, data) = app_state.vehicle_service.download_image(&vehicle).await?;
    Ok(file_response(&path, data))
}

#[utoipa::path(
    get,
    path = "/api/portal/invoices",
    tag = "Portal",
    params(ListQuery),
    responses((status = 200, description = "Minhas faturas", body = Page<EnrichedInvoice>)),
    security(("api_jwt" = []))
)]
pub async fn list_my_invoices(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<EnrichedInvoice>>, AppError> {
    let invoices = app_state.invoice_service.list_for_client(user.id).await?;
    Ok(Json(paginate(invoices, &own(query))))
}

#[utoipa::path(
    get,
    path = "/api/portal/invoices/{id}/pdf",
    tag = "Portal",
    params(("id" = Uuid, Path, description = "ID da fatura")),
    responses(
        (status = 200, description = "PDF da fatura", content_type = "application/pdf"),
        (status = 404, description = "Fatura ou PDF não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_my_invoice_pdf(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let invoice = app_state.invoice_service.get_for_viewer(id, &user).await?;
    let (path, data) = app_state.invoice_service.download_pdf(&invoice).await?;
    Ok(file_response(&path, data))
}

#[utoipa::path(
    get,
    path = "/api/portal/maintenance",
    tag = "Portal",
    params(ListQuery),
    responses((status = 200, description = "Minhas manutenções", body = Page<EnrichedMaintenance>)),
    security(("api_jwt" = []))
)]
pub async fn list_my_maintenance(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<EnrichedMaintenance>>, AppError> {
    let items = app_state.maintenance_service.list_for_client(user.id).await?;
    Ok(Json(paginate(items, &own(query))))
}
