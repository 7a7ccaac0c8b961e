pub mod auth;
pub mod catalog;
pub mod clients;
pub mod dashboard;
pub mod files;
pub mod health;
pub mod invoices;
pub mod maintenance;
pub mod me;
pub mod portal;
pub mod vehicles;
