// src/models/dashboard.rs

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

// Resumo do portal do gerente (os cards do topo)
#[derive(Debug, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub active_clients: usize,
    pub vehicles: usize,
    pub pending_invoices: usize,
    pub overdue_invoices: usize,
    pub open_maintenance: usize, // upcoming + due
    #[schema(value_type = f64)]
    pub paid_revenue: Decimal, // Soma do total das faturas pagas
}
