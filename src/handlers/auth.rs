// src/handlers/auth.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::auth::{
        AuthResponse, LoginUserPayload, PasswordResetConfirmPayload, PasswordResetRequestPayload,
        RegisterUserPayload,
    },
};

#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = RegisterUserPayload,
    responses(
        (status = 201, description = "Conta criada", body = AuthResponse),
        (status = 400, description = "Dados inválidos"),
        (status = 403, description = "Conta vinculada a um cliente desativado"),
        (status = 409, description = "E-mail já existe")
    )
)]
pub async fn register(
    State(app_state): State<AppState>,
    Json(payload): Json<RegisterUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let response = app_state.auth_service.register_user(payload).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginUserPayload,
    responses(
        (status = 200, description = "Login realizado", body = AuthResponse),
        (status = 401, description = "Credenciais inválidas"),
        (status = 403, description = "Conta pendente ou desativada")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginUserPayload>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate()?;

    let response = app_state.auth_service.login_user(payload).await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/auth/password-reset/request",
    tag = "Auth",
    request_body = PasswordResetRequestPayload,
    responses(
        (status = 202, description = "Se a conta existir, o e-mail será enviado")
    )
)]
pub async fn request_password_reset(
    State(app_state): State<AppState>,
    Json(payload): Json<PasswordResetRequestPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    app_state.auth_service.request_password_reset(&payload.email).await?;
    Ok((
        StatusCode::ACCEPTED,
        Json(json!({ "message": "Se a conta existir, enviaremos as instruções por e-mail." })),
    ))
}

#[utoipa::path(
    post,
    path = "/api/auth/password-reset/confirm",
    tag = "Auth",
    request_body = PasswordResetConfirmPayload,
    responses(
        (status = 204, description = "Senha alterada"),
        (status = 401, description = "Token inválido ou expirado")
    )
)]
pub async fn confirm_password_reset(
    State(app_state): State<AppState>,
    Json(payload): Json<PasswordResetConfirmPayload>,
) -> Result<StatusCode, AppError> {
    payload.validate()?;

    app_state.auth_service.confirm_password_reset(payload).await?;
    Ok(StatusCode::NO_CONTENT)
}
