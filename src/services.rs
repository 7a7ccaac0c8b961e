pub mod auth;
pub mod billing;
pub mod catalog_service;
pub mod client_service;
pub mod dashboard_service;
pub mod document_service;
pub mod enrichment;
pub mod invoice_service;
pub mod listing;
pub mod maintenance_service;
pub mod notification;
pub mod vehicle_service;
