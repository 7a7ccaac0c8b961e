pub mod auth;
pub mod catalog;
pub mod client;
pub mod dashboard;
pub mod enriched;
pub mod invoice;
pub mod maintenance;
pub mod vehicle;
