// src/middleware/role.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;

use crate::{
    common::error::AppError,
    middleware::auth::CurrentUser,
    models::client::{Client, Role},
};

/// 1. O Trait que define o papel exigido por uma rota
pub trait RoleDef: Send + Sync + 'static {
    fn role() -> Role;
}

pub struct ManagerRole;

impl RoleDef for ManagerRole {
    fn role() -> Role {
        Role::Manager
    }
}

/// 2. O Extractor (Guardião). Depende do `auth_guard` ter rodado antes.
pub struct RequireRole<T>(pub Client, pub PhantomData<T>);

// 3. Implementação do FromRequestParts
impl<T, S> FromRequestParts<S> for RequireRole<T>
where
    T: RoleDef,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;

        if user.role != T::role() {
            tracing::warn!("Acesso negado ao usuário {} (papel {:?})", user.id, user.role);
            return Err(AppError::Forbidden);
        }

        Ok(RequireRole(user, PhantomData))
    }
}
