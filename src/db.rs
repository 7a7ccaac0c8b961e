pub mod catalog_repo;
pub use catalog_repo::CatalogRepository;
pub mod client_repo;
pub use client_repo::ClientRepository;
pub mod identity_repo;
pub use identity_repo::IdentityRepository;
pub mod invoice_repo;
pub use invoice_repo::InvoiceRepository;
pub mod maintenance_repo;
pub use maintenance_repo::MaintenanceRepository;
pub mod vehicle_repo;
pub use vehicle_repo::VehicleRepository;
