// src/handlers/me.rs

use axum::{
    extract::{Multipart, State},
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    handlers::files::{file_response, read_upload, FileKind, UploadForm},
    middleware::auth::CurrentUser,
    models::client::{Client, UpdateProfilePayload},
};

// Handler da rota protegida /me
#[utoipa::path(
    get,
    path = "/api/me",
    tag = "Users",
    responses(
        (status = 200, description = "Perfil do usuário logado", body = Client),
        (status = 401, description = "Não autenticado"),
        (status = 403, description = "Conta pendente ou desativada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_me(CurrentUser(user): CurrentUser) -> Json<Client> {
    Json(user)
}

#[utoipa::path(
    put,
    path = "/api/me",
    tag = "Users",
    request_body = UpdateProfilePayload,
    responses(
        (status = 200, description = "Perfil atualizado", body = Client),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_me(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<UpdateProfilePayload>,
) -> Result<Json<Client>, AppError> {
    payload.validate()?;

    let client = app_state.client_service.update_profile(user.id, payload).await?;
    Ok(Json(client))
}

#[utoipa::path(
    post,
    path = "/api/me/profile-image",
    tag = "Users",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Foto atualizada", body = Client),
        (status = 400, description = "Arquivo inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn upload_my_profile_image(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    multipart: Multipart,
) -> Result<Json<Client>, AppError> {
    let upload = read_upload(multipart, FileKind::Image).await?;
    let client = app_state
        .client_service
        .upload_profile_image(user.id, &upload.filename, upload.data)
        .await?;
    Ok(Json(client))
}

#[utoipa::path(
    get,
    path = "/api/me/profile-image",
    tag = "Users",
    responses(
        (status = 200, description = "Imagem", content_type = "image/*"),
        (status = 404, description = "Sem foto de perfil")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_my_profile_image(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    let (path, data) = app_state.client_service.download_profile_image(&user).await?;
    Ok(file_response(&path, data))
}
