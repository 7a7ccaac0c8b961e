// src/handlers/clients.rs

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
    models::client::{Client, CreateClientPayload, UpdateClientPayload},
    services::listing::{paginate, ListQuery, Page},
};

#[utoipa::path(
    post,
    path = "/api/manage/clients",
    tag = "Clients",
    request_body = CreateClientPayload,
    responses(
        (status = 201, description = "Cliente cadastrado", body = Client),
        (status = 400, description = "Dados inválidos"),
        (status = 403, description = "Apenas gerentes"),
        (status = 409, description = "E-mail já existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_client(
    State(app_state): State<AppState>,
    _guard: RequireRole<ManagerRole>,
    Json(payload): Json<CreateClientPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let client = app_state.client_service.create_client(payload).await?;
    Ok((StatusCode::CREATED, Json(client)))
}

/// `status` aceita `active` ou `inactive`.
#[utoipa::path(
    get,
    path = "/api/manage/clients",
    tag = "Clients",
    params(ListQuery),
    responses((status = 200, description = "Clientes paginados", body = Page<Client>)),
    security(("api_jwt" = []))
)]
pub async fn list_clients(
    State(app_state): State<AppState>,
    _guard: RequireRole<ManagerRole>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<Client>>, AppError> {
    let clients = app_state.client_service.list_clients().await?;
    Ok(Json(paginate(clients, &query)))
}

#[utoipa::path(
    get,
    path = "/api/manage/clients/{id}",
    tag = "Clients",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Cliente", body = Client),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_client(
    State(app_state): State<AppState>,
    _guard: RequireRole<ManagerRole>,
    Path(id): Path<Uuid>,
) -> Result<Json<Client>, AppError> {
    Ok(Json(app_state.client_service.get_client(id).await?))
}

#[utoipa::path(
    put,
    path = "/api/manage/clients/{id}",
    tag = "Clients",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    request_body = UpdateClientPayload,
    responses(
        (status = 200, description = "Cliente atualizado", body = Client),
        (status = 404, description = "Cliente não encontrado"),
        (status = 409, description = "Alteração bloquearia a própria conta")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_client(
    State(app_state): State<AppState>,
    RequireRole(manager, _): RequireRole<ManagerRole>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateClientPayload>,
) -> Result<Json<Client>, AppError> {
    payload.validate()?;
    if manager.id == id && payload.revokes_manager_access() {
        return Err(AppError::Conflict(
            "Você não pode desativar nem rebaixar a própria conta.".to_string(),
        ));
    }

    let client = app_state.client_service.update_client(id, payload).await?;
    Ok(Json(client))
}

#[utoipa::path(
    delete,
    path = "/api/manage/clients/{id}",
    tag = "Clients",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 204, description = "Cliente excluído"),
        (status = 404, description = "Cliente não encontrado"),
        (status = 409, description = "Cliente possui veículos")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_client(
    State(app_state): State<AppState>,
    _guard: RequireRole<ManagerRole>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.client_service.delete_client(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/manage/clients/{id}/deactivate",
    tag = "Clients",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses((status = 200, description = "Cliente desativado", body = Client)),
    security(("api_jwt" = []))
)]
pub async fn deactivate_client(
    State(app_state): State<AppState>,
    RequireRole(manager, _): RequireRole<ManagerRole>,
    Path(id): Path<Uuid>,
) -> Result<Json<Client>, AppError> {
    if manager.id == id {
        return Err(AppError::Conflict("Você não pode desativar a própria conta.".to_string()));
    }
    let client = app_state.client_service.set_active(id, false).await?;
    Ok(Json(client))
}

#[utoipa::path(
    post,
    path = "/api/manage/clients/{id}/reactivate",
    tag = "Clients",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses((status = 200, description = "Cliente reativado", body = Client)),
    security(("api_jwt" = []))
)]
pub async fn reactivate_client(
    State(app_state): State<AppState>,
    _guard: RequireRole<ManagerRole>,
    Path(id): Path<Uuid>,
) -> Result<Json<Client>, AppError> {
    let client = app_state.client_service.set_active(id, true).await?;
    Ok(Json(client))
}

#[utoipa::path(
    post,
    path = "/api/manage/clients/{id}/profile-image",
    tag = "Clients",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses((status = 200, description = "Foto atualizada", body = Client)),
    security(("api_jwt" = []))
)]
pub async fn upload_client_profile_image(
    State(app_state): State<AppState>,
    _guard: RequireRole<ManagerRole>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<Client>, AppError> {
    let upload = read_upload(multipart, FileKind::Image).await?;
    let client = app_state
        .client_service
        .upload_profile_image(id, &upload.filename, upload.data)
        .await?;
    Ok(Json(client))
}

#[utoipa::path(
    get,
    path = "/api/manage/clients/{id}/profile-image",
    tag = "Clients",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Imagem", content_type = "image/*"),
        (status = 404, description = "Sem foto de perfil")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_client_profile_image(
    State(app_state): State<AppState>,
    _guard: RequireRole<ManagerRole>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let client = app_state.client_service.get_client(id).await?;
    let (path, data) = app_state.client_service.download_profile_image(&client).await?;
    Ok(file_response(&path, data))
}
