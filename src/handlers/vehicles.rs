// src/handlers/vehicles.rs

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    handlers::files::{file_response, read_upload, FileKind, UploadForm},
    middleware::role::{ManagerRole, RequireRole},
    models::{
        enriched::EnrichedVehicle,
        vehicle::{CreateVehiclePayload, UpdateVehiclePayload, Vehicle, VehicleDetail},
    },
    services::listing::{paginate, ListQuery, Page},
};

#[utoipa::path(
    post,
    path = "/api/manage/vehicles",
    tag = "Vehicles",
    request_body = CreateVehiclePayload,
    responses(
        (status = 201, description = "Veículo cadastrado", body = Vehicle),
        (status = 400, description = "Dados inválidos ou dono inexistente"),
        (status = 409, description = "VIN já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_vehicle(
    State(app_state): State<AppState>,
    _guard: RequireRole<ManagerRole>,
    Json(payload): Json<CreateVehiclePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let vehicle = app_state.vehicle_service.create_vehicle(payload).await?;
    Ok((StatusCode::CREATED, Json(vehicle)))
}

#[utoipa::path(
    get,
    path = "/api/manage/vehicles",
    tag = "Vehicles",
    params(ListQuery),
    responses((status = 200, description = "Veículos com o nome do dono", body = Page<EnrichedVehicle>)),
    security(("api_jwt" = []))
)]
pub async fn list_vehicles(
    State(app_state): State<AppState>,
    _guard: RequireRole<ManagerRole>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<EnrichedVehicle>>, AppError> {
    let vehicles = app_state.vehicle_service.list_enriched().await?;
    Ok(Json(paginate(vehicles, &query)))
}

#[utoipa::path(
    get,
    path = "/api/manage/vehicles/{id}",
    tag = "Vehicles",
    params(("id" = Uuid, Path, description = "ID do veículo")),
    responses(
        (status = 200, description = "Detalhe do veículo", body = VehicleDetail),
        (status = 404, description = "Veículo não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_vehicle(
    State(app_state): State<AppState>,
    RequireRole(manager, _): RequireRole<ManagerRole>,
    Path(id): Path<Uuid>,
) -> Result<Json<VehicleDetail>, AppError> {
    let detail = app_state.vehicle_service.vehicle_detail(id, &manager).await?;
    Ok(Json(detail))
}

#[utoipa::path(
    put,
    path = "/api/manage/vehicles/{id}",
    tag = "Vehicles",
    params(("id" = Uuid, Path, description = "ID do veículo")),
    request_body = UpdateVehiclePayload,
    responses(
        (status = 200, description = "Veículo atualizado", body = Vehicle),
        (status = 404, description = "Veículo não encontrado"),
        (status = 409, description = "VIN já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_vehicle(
    State(app_state): State<AppState>,
    _guard: RequireRole<ManagerRole>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateVehiclePayload>,
) -> Result<Json<Vehicle>, AppError> {
    payload.validate()?;

    let vehicle = app_state.vehicle_service.update_vehicle(id, payload).await?;
    Ok(Json(vehicle))
}

#[utoipa::path(
    delete,
    path = "/api/manage/vehicles/{id}",
    tag = "Vehicles",
    params(("id" = Uuid, Path, description = "ID do veículo")),
    responses(
        (status = 204, description = "Veículo excluído"),
        (status = 404, description = "Veículo não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_vehicle(
    State(app_state): State<AppState>,
    _guard: RequireRole<ManagerRole>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.vehicle_service.delete_vehicle(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/manage/vehicles/{id}/image",
    tag = "Vehicles",
    params(("id" = Uuid, Path, description = "ID do veículo")),
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses((status = 200, description = "Imagem atualizada", body = Vehicle)),
    security(("api_jwt" = []))
)]
pub async fn upload_vehicle_image(
    State(app_state): State<AppState>,
    _guard: RequireRole<ManagerRole>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<Vehicle>, AppError> {
    let upload = read_upload(multipart, FileKind::Image).await?;
    let vehicle = app_state
        .vehicle_service
        .upload_image(id, &upload.filename, upload.data)
        .await?;
    Ok(Json(vehicle))
}

#[utoipa::path(
    get,
    path = "/api/manage/vehicles/{id}/image",
    tag = "Vehicles",
    params(("id" = Uuid, Path, description = "ID do veículo")),
    responses(
        (status = 200, description = "Imagem do veículo", content_type = "image/*"),
        (status = 404, description = "Sem imagem")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_vehicle_image(
    State(app_state): State<AppState>,
    _guard: RequireRole<ManagerRole>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let vehicle = app_state.vehicle_service.get_vehicle(id).await?;
    let (path, data) = app_state.vehicle_service.download_image(&vehicle).await?;
    Ok(file_response(&path, data))
}
