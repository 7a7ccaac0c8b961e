// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};

use crate::{common::error::AppError, config::AppState, models::client::Client};

// O middleware em si: só deixa passar sessões ativas (cliente ou gerente).
// O estado é recalculado a cada requisição, então desativar um cliente
// tem efeito imediato.
pub async fn auth_guard(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let bearer = request.headers().typed_get::<Authorization<Bearer>>();
    let token = bearer.as_ref().map(|auth| auth.token());

    let session = app_state.auth_service.resolve_session(token).await?;
    let user = session.into_active()?;

    // Insere o usuário nos "extensions" da requisição
    request.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(request).await)
}

// Extrator para obter o usuário autenticado diretamente nos handlers
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Client);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(AppError::InvalidToken)
    }
}
