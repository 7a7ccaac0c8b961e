// src/config.rs

use std::{env, path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{
        CatalogRepository, ClientRepository, IdentityRepository, InvoiceRepository,
        MaintenanceRepository, VehicleRepository,
    },
    services::{
        auth::{AuthService, ResetMailer},
        catalog_service::CatalogService,
        client_service::ClientService,
        dashboard_service::DashboardService,
        document_service::DocumentService,
        invoice_service::InvoiceService,
        maintenance_service::MaintenanceService,
        vehicle_service::VehicleService,
    },
    storage::BlobStore,
    store::Datastore,
};

/// Dados da oficina impressos nas faturas e usados nas mensagens.
#[derive(Debug, Clone)]
pub struct ShopInfo {
    pub name: String,
    pub tax_id: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
}

impl Default for ShopInfo {
    fn default() -> Self {
        Self {
            name: "Oficina".to_string(),
            tax_id: None,
            address: None,
            phone: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub blob_root: PathBuf,
    pub fonts_dir: PathBuf,
    pub font_family: String,
    pub shop: ShopInfo,
    pub bootstrap_manager_email: Option<String>,
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Lê o `.env` (se existir) e as variáveis de ambiente.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;

        let shop = ShopInfo {
            name: optional("SHOP_NAME").unwrap_or_else(|| ShopInfo::default().name),
            tax_id: optional("SHOP_TAX_ID"),
            address: optional("SHOP_ADDRESS"),
            phone: optional("SHOP_PHONE"),
        };

        Ok(Self {
            database_url,
            jwt_secret,
            bind_addr: optional("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            blob_root: optional("BLOB_ROOT").unwrap_or_else(|| "./storage".to_string()).into(),
            fonts_dir: optional("FONTS_DIR").unwrap_or_else(|| "./fonts".to_string()).into(),
            font_family: optional("FONT_FAMILY").unwrap_or_else(|| "Roboto".to_string()),
            shop,
            bootstrap_manager_email: optional("BOOTSTRAP_MANAGER_EMAIL"),
        })
    }

    pub async fn connect_database(&self) -> anyhow::Result<PgPool> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&self.database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");
        Ok(pool)
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub client_service: ClientService,
    pub vehicle_service: VehicleService,
    pub invoice_service: InvoiceService,
    pub maintenance_service: MaintenanceService,
    pub catalog_service: CatalogService,
    pub dashboard_service: DashboardService,
}

impl AppState {
    /// Monta o gráfico de dependências a partir dos clientes de backend.
    /// Os clientes são recebidos prontos (Postgres/disco em produção,
    /// memória nos testes).
    pub fn new(
        config: &Config,
        store: Arc<dyn Datastore>,
        blobs: Arc<dyn BlobStore>,
        mailer: Arc<dyn ResetMailer>,
    ) -> Self {
        let client_repo = ClientRepository::new(store.clone());
        let vehicle_repo = VehicleRepository::new(store.clone());
        let invoice_repo = InvoiceRepository::new(store.clone());
        let maintenance_repo = MaintenanceRepository::new(store.clone());
        let catalog_repo = CatalogRepository::new(store.clone());
        let identity_repo = IdentityRepository::new(store);

        let auth_service = AuthService::new(
            identity_repo,
            client_repo.clone(),
            config.jwt_secret.clone(),
            mailer,
            config.bootstrap_manager_email.clone(),
        );
        let documents = DocumentService::new(
            config.fonts_dir.clone(),
            config.font_family.clone(),
            config.shop.clone(),
        );

        Self {
            auth_service,
            client_service: ClientService::new(
                client_repo.clone(),
                vehicle_repo.clone(),
                blobs.clone(),
            ),
            vehicle_service: VehicleService::new(
                vehicle_repo.clone(),
                client_repo.clone(),
                invoice_repo.clone(),
                maintenance_repo.clone(),
                blobs.clone(),
            ),
            invoice_service: InvoiceService::new(
                invoice_repo.clone(),
                vehicle_repo.clone(),
                client_repo.clone(),
                documents,
                blobs,
            ),
            maintenance_service: MaintenanceService::new(
                maintenance_repo.clone(),
                vehicle_repo.clone(),
                client_repo.clone(),
            ),
            catalog_service: CatalogService::new(catalog_repo),
            dashboard_service: DashboardService::new(
                client_repo,
                vehicle_repo,
                invoice_repo,
                maintenance_repo,
            ),
        }
    }
}
