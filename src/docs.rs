// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health,

        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::request_password_reset,
        handlers::auth::confirm_password_reset,

        // --- Users ---
        handlers::me::get_me,
        handlers::me::update_me,
        handlers::me::upload_my_profile_image,
        handlers::me::get_my_profile_image,

        // --- Portal ---
        handlers::portal::list_my_vehicles,
        handlers::portal::get_my_vehicle,
        handlers::portal::get_my_vehicle_image,
        handlers::portal::list_my_invoices,
        handlers::portal::get_my_invoice_pdf,
        handlers::portal::list_my_maintenance,

        // --- Dashboard ---
        handlers::dashboard::get_dashboard,

        // --- Clients ---
        handlers::clients::create_client,
        handlers::clients::list_clients,
        handlers::clients::get_client,
        handlers::clients::update_client,
        handlers::clients::delete_client,
        handlers::clients::deactivate_client,
        handlers::clients::reactivate_client,
        handlers::clients::upload_client_profile_image,
        handlers::clients::get_client_profile_image,

        // --- Vehicles ---
        handlers::vehicles::create_vehicle,
        handlers::vehicles::list_vehicles,
        handlers::vehicles::get_vehicle,
        handlers::vehicles::update_vehicle,
        handlers::vehicles::delete_vehicle,
        handlers::vehicles::upload_vehicle_image,
        handlers::vehicles::get_vehicle_image,

        // --- Invoices ---
        handlers::invoices::create_invoice,
        handlers::invoices::list_invoices,
        handlers::invoices::get_invoice,
        handlers::invoices::update_invoice,
        handlers::invoices::set_invoice_status,
        handlers::invoices::delete_invoice,
        handlers::invoices::upload_invoice_pdf,
        handlers::invoices::generate_invoice_pdf,
        handlers::invoices::download_invoice_pdf,
        handlers::invoices::invoice_whatsapp_link,

        // --- Maintenance ---
        handlers::maintenance::create_maintenance,
        handlers::maintenance::list_maintenance,
        handlers::maintenance::get_maintenance,
        handlers::maintenance::update_maintenance,
        handlers::maintenance::set_maintenance_status,
        handlers::maintenance::delete_maintenance,

        // --- Catalog ---
        handlers::catalog::list_active_services,
        handlers::catalog::list_services,
        handlers::catalog::create_service,
        handlers::catalog::get_service,
        handlers::catalog::update_service,
        handlers::catalog::delete_service,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::PasswordResetRequestPayload,
            models::auth::PasswordResetConfirmPayload,
            models::auth::AuthResponse,

            // --- Clients ---
            models::client::Role,
            models::client::DocumentType,
            models::client::IdentityDocument,
            models::client::Address,
            models::client::Client,
            models::client::CreateClientPayload,
            models::client::UpdateClientPayload,
            models::client::UpdateProfilePayload,

            // --- Vehicles ---
            models::vehicle::Vehicle,
            models::vehicle::VehicleDetail,
            models::vehicle::CreateVehiclePayload,
            models::vehicle::UpdateVehiclePayload,

            // --- Invoices ---
            models::invoice::InvoiceStatus,
            models::invoice::InvoiceServiceItem,
            models::invoice::Invoice,
            models::invoice::LineItemPayload,
            models::invoice::CreateInvoicePayload,
            models::invoice::UpdateInvoicePayload,
            models::invoice::UpdateInvoiceStatusPayload,
            models::invoice::WhatsappLinkResponse,

            // --- Maintenance ---
            models::maintenance::MaintenanceStatus,
            models::maintenance::MaintenanceItem,
            models::maintenance::CreateMaintenancePayload,
            models::maintenance::UpdateMaintenancePayload,
            models::maintenance::UpdateMaintenanceStatusPayload,

            // --- Catalog ---
            models::catalog::ServiceCatalogItem,
            models::catalog::CreateCatalogItemPayload,
            models::catalog::UpdateCatalogItemPayload,

            // --- Listagens ---
            models::enriched::EnrichedInvoice,
            models::enriched::EnrichedVehicle,
            models::enriched::EnrichedMaintenance,
            models::dashboard::DashboardSummary,

            handlers::files::UploadForm,
        )
    ),
    tags(
        (name = "Health", description = "Verificação do serviço"),
        (name = "Auth", description = "Autenticação, Registro e Recuperação de Senha"),
        (name = "Users", description = "Dados do Usuário e Perfil"),
        (name = "Portal", description = "Veículos, Faturas e Manutenções do Cliente"),
        (name = "Dashboard", description = "Indicadores do Gerente"),
        (name = "Clients", description = "Gestão de Clientes"),
        (name = "Vehicles", description = "Gestão de Veículos"),
        (name = "Invoices", description = "Faturas, PDF e WhatsApp"),
        (name = "Maintenance", description = "Manutenções Agendadas"),
        (name = "Catalog", description = "Catálogo de Serviços")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
