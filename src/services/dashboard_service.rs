// src/services/dashboard_service.rs

use crate::{
    common::error::AppError,
    db::{ClientRepository, InvoiceRepository, MaintenanceRepository, VehicleRepository},
    models::{dashboard::DashboardSummary, invoice::InvoiceStatus},
};

#[derive(Clone)]
pub struct DashboardService {
    client_repo: ClientRepository,
    vehicle_repo: VehicleRepository,
    invoice_repo: InvoiceRepository,
    maintenance_repo: MaintenanceRepository,
}

impl DashboardService {
    pub fn new(
        client_repo: ClientRepository,
        vehicle_repo: VehicleRepository,
        invoice_repo: InvoiceRepository,
        maintenance_repo: MaintenanceRepository,
    ) -> Self {
        Self { client_repo, vehicle_repo, invoice_repo, maintenance_repo }
    }

    pub async fn get_summary(&self) -> Result<DashboardSummary, AppError> {
        let active_clients = self.client_repo.list_active().await?.len();
        let vehicles = self.vehicle_repo.list_all().await?.len();
        let invoices = self.invoice_repo.list_all().await?;
        let open_maintenance = self.maintenance_repo.list_open().await?.len();

        let mut summary = DashboardSummary {
            active_clients,
            vehicles,
            open_maintenance,
            ..Default::default()
        };
        for invoice in &invoices {
            match invoice.status {
                InvoiceStatus::Pending => summary.pending_invoices += 1,
                InvoiceStatus::Overdue => summary.overdue_invoices += 1,
                InvoiceStatus::Paid => {
                    summary.paid_revenue = summary.paid_revenue.saturating_add(invoice.total)
                }
            }
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use rust_decimal::Decimal;
    use uuid::Uuid;

    use crate::{
        models::invoice::Invoice,
        store::{Datastore, MemoryDatastore},
    };

    fn invoice(status: InvoiceStatus, total: Decimal) -> Invoice {
        Invoice {
            id: Uuid::new_v4(),
            vehicle_id: Uuid::new_v4(),
            client_id: Uuid::new_v4(),
            invoice_number: "F-1".to_string(),
            date: None,
            items: vec![],
            subtotal: total,
            vat: Decimal::ZERO,
            total,
            status,
            notes: None,
            pdf_path: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn service(store: Arc<dyn Datastore>) -> (DashboardService, InvoiceRepository) {
        let invoices = InvoiceRepository::new(store.clone());
        let service = DashboardService::new(
            ClientRepository::new(store.clone()),
            VehicleRepository::new(store.clone()),
            invoices.clone(),
            MaintenanceRepository::new(store),
        );
        (service, invoices)
    }

    #[tokio::test]
    async fn counts_invoices_by_status_and_sums_paid_revenue() {
        let (service, invoices) = service(Arc::new(MemoryDatastore::new()));
        invoices.create(&invoice(InvoiceStatus::Paid, Decimal::new(6184, 2))).await.unwrap();
        invoices.create(&invoice(InvoiceStatus::Paid, Decimal::new(1000, 2))).await.unwrap();
        invoices.create(&invoice(InvoiceStatus::Pending, Decimal::ONE)).await.unwrap();
        invoices.create(&invoice(InvoiceStatus::Overdue, Decimal::ONE)).await.unwrap();

        let summary = service.get_summary().await.unwrap();
        assert_eq!(summary.paid_revenue, Decimal::new(7184, 2));
        assert_eq!(summary.pending_invoices, 1);
        assert_eq!(summary.overdue_invoices, 1);
    }

    #[tokio::test]
    async fn huge_paid_revenue_saturates_instead_of_panicking() {
        let (service, invoices) = service(Arc::new(MemoryDatastore::new()));
        invoices.create(&invoice(InvoiceStatus::Paid, Decimal::MAX)).await.unwrap();
        invoices.create(&invoice(InvoiceStatus::Paid, Decimal::MAX)).await.unwrap();

        let summary = service.get_summary().await.unwrap();
        assert_eq!(summary.paid_revenue, Decimal::MAX);
    }
}
