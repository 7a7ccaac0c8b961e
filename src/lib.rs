// src/lib.rs

use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, patch, post},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod common;
pub mod config;
pub mod db;
pub mod docs;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod storage;
pub mod store;

use crate::{
    config::AppState,
    docs::ApiDoc,
    handlers::files::MAX_UPLOAD_BYTES,
    middleware::auth::auth_guard,
};

/// Monta o router completo. Usado pelo `main` e pelos testes de integração.
pub fn build_router(app_state: AppState) -> Router {
    // Rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/password-reset/request", post(handlers::auth::request_password_reset))
        .route("/password-reset/confirm", post(handlers::auth::confirm_password_reset));

    // Portal do cliente (só os próprios registros)
    let portal_routes = Router::new()
        .route("/vehicles", get(handlers::portal::list_my_vehicles))
        .route("/vehicles/{id}", get(handlers::portal::get_my_vehicle))
        .route("/vehicles/{id}/image", get(handlers::portal::get_my_vehicle_image))
        .route("/invoices", get(handlers::portal::list_my_invoices))
        .route("/invoices/{id}/pdf", get(handlers::portal::get_my_invoice_pdf))
        .route("/maintenance", get(handlers::portal::list_my_maintenance));

    // Área do gerente: cada handler exige `RequireRole<ManagerRole>`
    let manage_routes = Router::new()
        .route("/dashboard", get(handlers::dashboard::get_dashboard))
        // Clientes
        .route(
            "/clients",
            post(handlers::clients::create_client).get(handlers::clients::list_clients),
        )
        .route(
            "/clients/{id}",
            get(handlers::clients::get_client)
                .put(handlers::clients::update_client)
                .delete(handlers::clients::delete_client),
        )
        .route("/clients/{id}/deactivate", post(handlers::clients::deactivate_client))
        .route("/clients/{id}/reactivate", post(handlers::clients::reactivate_client))
        .route(
            "/clients/{id}/profile-image",
            post(handlers::clients::upload_client_profile_image)
                .get(handlers::clients::get_client_profile_image),
        )
        // Veículos
        .route(
            "/vehicles",
            post(handlers::vehicles::create_vehicle).get(handlers::vehicles::list_vehicles),
        )
        .route(
            "/vehicles/{id}",
            get(handlers::vehicles::get_vehicle)
                .put(handlers::vehicles::update_vehicle)
                .delete(handlers::vehicles::delete_vehicle),
        )
        .route(
            "/vehicles/{id}/image",
            post(handlers::vehicles::upload_vehicle_image).get(handlers::vehicles::get_vehicle_image),
        )
        // Faturas
        .route(
            "/invoices",
            post(handlers::invoices::create_invoice).get(handlers::invoices::list_invoices),
        )
        .route(
            "/invoices/{id}",
            get(handlers::invoices::get_invoice)
                .put(handlers::invoices::update_invoice)
                .delete(handlers::invoices::delete_invoice),
        )
        .route("/invoices/{id}/status", patch(handlers::invoices::set_invoice_status))
        .route(
            "/invoices/{id}/pdf",
            post(handlers::invoices::upload_invoice_pdf).get(handlers::invoices::download_invoice_pdf),
        )
        .route("/invoices/{id}/pdf/generate", post(handlers::invoices::generate_invoice_pdf))
        .route("/invoices/{id}/whatsapp", get(handlers::invoices::invoice_whatsapp_link))
        // Manutenção
        .route(
            "/maintenance",
            post(handlers::maintenance::create_maintenance)
                .get(handlers::maintenance::list_maintenance),
        )
        .route(
            "/maintenance/{id}",
            get(handlers::maintenance::get_maintenance)
                .put(handlers::maintenance::update_maintenance)
                .delete(handlers::maintenance::delete_maintenance),
        )
        .route(
            "/maintenance/{id}/status",
            patch(handlers::maintenance::set_maintenance_status),
        )
        // Catálogo de serviços
        .route(
            "/catalog",
            post(handlers::catalog::create_service).get(handlers::catalog::list_services),
        )
        .route(
            "/catalog/{id}",
            get(handlers::catalog::get_service)
                .put(handlers::catalog::update_service)
                .delete(handlers::catalog::delete_service),
        );

    // Tudo abaixo exige sessão ativa
    let protected_routes = Router::new()
        // Perfil do usuário logado
        .route("/me", get(handlers::me::get_me).put(handlers::me::update_me))
        .route(
            "/me/profile-image",
            post(handlers::me::upload_my_profile_image).get(handlers::me::get_my_profile_image),
        )
        .route("/catalog", get(handlers::catalog::list_active_services))
        .nest("/portal", portal_routes)
        .nest("/manage", manage_routes)
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/api/health", get(handlers::health::health))
        .nest("/api/auth", auth_routes)
        .nest("/api", protected_routes)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(app_state)
}
