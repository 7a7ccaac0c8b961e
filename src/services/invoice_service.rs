// src/services/invoice_service.rs

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        timestamp::{sort_key, Timestamp},
    },
    db::{ClientRepository, InvoiceRepository, VehicleRepository},
    models::{
        client::Client,
        enriched::EnrichedInvoice,
        invoice::{
            CreateInvoicePayload, Invoice, InvoiceStatus, UpdateInvoicePayload,
        },
    },
    services::{
        billing::compute_totals,
        document_service::DocumentService,
        enrichment::{enrich_invoices, load_clients_by_id, load_vehicles_by_id, NOT_AVAILABLE},
        notification::whatsapp_invoice_link,
    },
    storage::{discard_blob, paths::invoice_pdf_path, BlobStore},
};

#[derive(Clone)]
pub struct InvoiceService {
    repo: InvoiceRepository,
    vehicle_repo: VehicleRepository,
    client_repo: ClientRepository,
    documents: DocumentService,
    blobs: Arc<dyn BlobStore>,
}

impl InvoiceService {
    pub fn new(
        repo: InvoiceRepository,
        vehicle_repo: VehicleRepository,
        client_repo: ClientRepository,
        documents: DocumentService,
        blobs: Arc<dyn BlobStore>,
    ) -> Self {
        Self { repo, vehicle_repo, client_repo, documents, blobs }
    }

    /// Calcula os totais e copia o dono atual do veículo para `clientId`.
    pub async fn create_invoice(&self, payload: CreateInvoicePayload) -> Result<Invoice, AppError> {
        let vehicle = self
            .vehicle_repo
            .find_by_id(payload.vehicle_id)
            .await?
            .ok_or_else(|| AppError::field("vehicleId", "not_found", "Veículo não encontrado."))?;

        let totals = compute_totals(&payload.items)?;

        let now = Timestamp::now();
        let invoice = Invoice {
            id: Uuid::new_v4(),
            vehicle_id: vehicle.id,
            client_id: vehicle.owner_id,
            invoice_number: payload.invoice_number.trim().to_string(),
            date: Some(payload.date.unwrap_or_else(Timestamp::now)),
            items: totals.items,
            subtotal: totals.subtotal,
            vat: totals.vat,
            total: totals.total,
            status: payload.status.unwrap_or(InvoiceStatus::Pending),
            notes: payload.notes,
            pdf_path: None,
            created_at: Some(now.clone()),
            updated_at: Some(now),
        };

        self.repo.create(&invoice).await?;
        tracing::info!("Fatura {} emitida (total {})", invoice.invoice_number, invoice.total);
        Ok(invoice)
    }

    pub async fn get_invoice(&self, id: Uuid) -> Result<Invoice, AppError> {
        self.repo.find_by_id(id).await?.ok_or(AppError::NotFound("Fatura"))
    }

    /// Fatura de outro cliente responde como inexistente.
    pub async fn get_for_viewer(&self, id: Uuid, viewer: &Client) -> Result<Invoice, AppError> {
        let invoice = self.get_invoice(id).await?;
        if !viewer.is_manager() && invoice.client_id != viewer.id {
            return Err(AppError::NotFound("Fatura"));
        }
        Ok(invoice)
    }

    /// Itens novos = totais recalculados.
    pub async fn update_invoice(
        &self,
        id: Uuid,
        payload: UpdateInvoicePayload,
    ) -> Result<Invoice, AppError> {
        let mut invoice = self.get_invoice(id).await?;

        if let Some(items) = payload.items {
            let totals = compute_totals(&items)?;
            invoice.items = totals.items;
            invoice.subtotal = totals.subtotal;
            invoice.vat = totals.vat;
            invoice.total = totals.total;
        }
        if let Some(number) = payload.invoice_number {
            invoice.invoice_number = number.trim().to_string();
        }
        if let Some(date) = payload.date {
            invoice.date = Some(date);
        }
        if let Some(status) = payload.status {
            invoice.status = status;
        }
        payload.notes.apply(&mut invoice.notes);

        invoice.updated_at = Some(Timestamp::now());
        self.repo.save(&invoice).await?;
        Ok(invoice)
    }

    pub async fn set_status(&self, id: Uuid, status: InvoiceStatus) -> Result<Invoice, AppError> {
        let mut invoice = self.get_invoice(id).await?;
        invoice.status = status;
        invoice.updated_at = Some(Timestamp::now());
        self.repo.save(&invoice).await?;
        tracing::info!("Fatura {} agora está {}", invoice.invoice_number, status.as_str());
        Ok(invoice)
    }

    /// Primeiro o registro, depois o PDF.
    pub async fn delete_invoice(&self, id: Uuid) -> Result<(), AppError> {
        let invoice = self.get_invoice(id).await?;
        self.repo.delete(id).await?;
        if let Some(path) = &invoice.pdf_path {
            discard_blob(self.blobs.as_ref(), path).await;
        }
        Ok(())
    }

    // --- Listagens (com nome do cliente e descrição do veículo) ---

    pub async fn list_enriched(&self) -> Result<Vec<EnrichedInvoice>, AppError> {
        let invoices = self.repo.list_all().await?;
        self.enrich(invoices).await
    }

    pub async fn list_for_client(&self, client_id: Uuid) -> Result<Vec<EnrichedInvoice>, AppError> {
        let invoices = self.repo.list_by_client(client_id).await?;
        self.enrich(invoices).await
    }

    async fn enrich(&self, mut invoices: Vec<Invoice>) -> Result<Vec<EnrichedInvoice>, AppError> {
        // Mais recentes primeiro; datas inválidas vão para o fim
        invoices.sort_by_key(|i| std::cmp::Reverse(sort_key(i.date.as_ref())));
        let clients =
            load_clients_by_id(&self.client_repo, invoices.iter().map(|i| i.client_id)).await?;
        let vehicles =
            load_vehicles_by_id(&self.vehicle_repo, invoices.iter().map(|i| i.vehicle_id)).await?;
        Ok(enrich_invoices(invoices, &clients, &vehicles))
    }

    // --- PDF ---

    /// Sobe o PDF, grava o registro e só então apaga o anterior.
    pub async fn attach_pdf(
        &self,
        id: Uuid,
        filename: &str,
        data: Vec<u8>,
    ) -> Result<Invoice, AppError> {
        let mut invoice = self.get_invoice(id).await?;

        let path = invoice_pdf_path(
            invoice.vehicle_id,
            &invoice.invoice_number,
            Utc::now().timestamp_millis(),
            filename,
        );
        self.blobs.upload(&path, data).await?;

        let previous = invoice.pdf_path.replace(path.clone());
        invoice.updated_at = Some(Timestamp::now());

        if let Err(e) = self.repo.save(&invoice).await {
            if previous.as_deref() != Some(path.as_str()) {
                discard_blob(self.blobs.as_ref(), &path).await;
            }
            return Err(e);
        }

        if let Some(old) = previous.filter(|old| *old != path) {
            discard_blob(self.blobs.as_ref(), &old).await;
        }
        Ok(invoice)
    }

    /// Renderiza o PDF a partir dos dados atuais e anexa à fatura.
    pub async fn generate_pdf(&self, id: Uuid) -> Result<Invoice, AppError> {
        let invoice = self.get_invoice(id).await?;
        let client = self.client_repo.find_by_id(invoice.client_id).await?;
        let vehicle = self.vehicle_repo.find_by_id(invoice.vehicle_id).await?;

        let pdf = self
            .documents
            .render_invoice_pdf(invoice.clone(), client, vehicle)
            .await?;

        self.attach_pdf(invoice.id, "fatura.pdf", pdf).await
    }

    pub async fn download_pdf(&self, invoice: &Invoice) -> Result<(String, Vec<u8>), AppError> {
        let path = invoice.pdf_path.clone().ok_or(AppError::NotFound("PDF da fatura"))?;
        let data = self.blobs.download(&path).await?;
        Ok((path, data))
    }

    // --- WhatsApp ---

    pub async fn whatsapp_link(&self, id: Uuid) -> Result<String, AppError> {
        let invoice = self.get_invoice(id).await?;
        let client = self
            .client_repo
            .find_by_id(invoice.client_id)
            .await?
            .ok_or(AppError::NotFound("Cliente"))?;

        let phone = client.contact_number().unwrap_or_default();
        let name = Some(client.first_name.trim())
            .filter(|n| !n.is_empty())
            .unwrap_or(NOT_AVAILABLE);

        whatsapp_invoice_link(phone, name, &invoice, &self.documents.shop().name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    use rust_decimal::Decimal;

    use crate::{
        common::patch::Patch,
        config::ShopInfo,
        models::{
            client::Role,
            invoice::LineItemPayload,
            vehicle::Vehicle,
        },
        storage::MemoryBlobStore,
        store::{
            faulty::{FailOn, FaultyDatastore},
            Collection, Datastore, MemoryDatastore,
        },
    };

    struct Fixture {
        service: InvoiceService,
        memory: MemoryDatastore,
        blobs: MemoryBlobStore,
        client: Client,
        vehicle: Vehicle,
    }

    fn service_over(store: Arc<dyn Datastore>, blobs: MemoryBlobStore) -> InvoiceService {
        let documents = DocumentService::new(
            "./fonts",
            "Roboto".to_string(),
            ShopInfo { name: "Taller Martínez".to_string(), ..ShopInfo::default() },
        );
        InvoiceService::new(
            InvoiceRepository::new(store.clone()),
            VehicleRepository::new(store.clone()),
            ClientRepository::new(store),
            documents,
            Arc::new(blobs),
        )
    }

    async fn fixture() -> Fixture {
        let memory = MemoryDatastore::new();
        let store: Arc<dyn Datastore> = Arc::new(memory.clone());
        let blobs = MemoryBlobStore::new();
        let clients = ClientRepository::new(store.clone());
        let vehicles = VehicleRepository::new(store.clone());

        let client = Client {
            id: Uuid::new_v4(),
            first_name: "Lucía".to_string(),
            last_name: "Martínez".to_string(),
            email: "lucia@example.com".to_string(),
            phone: None,
            mobile: Some("+34 600 123 456".to_string()),
            document: None,
            fiscal_address: None,
            postal_address: None,
            role: Role::Client,
            is_active: true,
            profile_image_path: None,
            created_at: None,
            updated_at: None,
        };
        clients.create(&client).await.unwrap();

        let vehicle = Vehicle {
            id: Uuid::new_v4(),
            owner_id: client.id,
            make: "Seat".to_string(),
            model: "León".to_string(),
            year: 2018,
            license_plate: "1234 KLM".to_string(),
            vin: "VSSZZZ5FZJR000001".to_string(),
            engine_code: None,
            mileage: None,
            last_service_date: None,
            image_path: None,
            created_at: None,
            updated_at: None,
        };
        vehicles.create(&vehicle).await.unwrap();

        let service = service_over(store, blobs.clone());
        Fixture { service, memory, blobs, client, vehicle }
    }

    fn item(qty: &str, price: &str) -> LineItemPayload {
        LineItemPayload {
            service_id: None,
            description: "Troca de óleo".to_string(),
            quantity: Decimal::from_str(qty).unwrap(),
            unit_price: Decimal::from_str(price).unwrap(),
        }
    }

    fn create_payload(vehicle_id: Uuid) -> CreateInvoicePayload {
        CreateInvoicePayload {
            vehicle_id,
            invoice_number: "F-2024/001".to_string(),
            date: None,
            items: vec![item("2", "25.555")],
            status: None,
            notes: None,
        }
    }

    #[tokio::test]
    async fn create_computes_totals_and_denormalizes_client() {
        let f = fixture().await;
        let invoice = f.service.create_invoice(create_payload(f.vehicle.id)).await.unwrap();

        assert_eq!(invoice.client_id, f.client.id);
        assert_eq!(invoice.status, InvoiceStatus::Pending);
        assert_eq!(invoice.total, Decimal::from_str("61.84").unwrap());
        assert!(invoice.date.is_some());
    }

    #[tokio::test]
    async fn update_with_new_items_recomputes_totals() {
        let f = fixture().await;
        let invoice = f.service.create_invoice(create_payload(f.vehicle.id)).await.unwrap();

        let updated = f
            .service
            .update_invoice(
                invoice.id,
                UpdateInvoicePayload {
                    items: Some(vec![item("1", "100")]),
                    notes: Patch::Set("Pago em dinheiro".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.subtotal, Decimal::from_str("100").unwrap());
        assert_eq!(updated.vat, Decimal::from_str("21").unwrap());
        assert_eq!(updated.total, Decimal::from_str("121").unwrap());
        assert_eq!(updated.notes.as_deref(), Some("Pago em dinheiro"));
    }

    #[tokio::test]
    async fn other_clients_invoice_looks_missing() {
        let f = fixture().await;
        let invoice = f.service.create_invoice(create_payload(f.vehicle.id)).await.unwrap();

        let mut stranger = f.client.clone();
        stranger.id = Uuid::new_v4();
        assert!(matches!(
            f.service.get_for_viewer(invoice.id, &stranger).await,
            Err(AppError::NotFound("Fatura"))
        ));
        assert!(f.service.get_for_viewer(invoice.id, &f.client).await.is_ok());
    }

    #[tokio::test]
    async fn pdf_path_uses_vehicle_and_sanitized_number() {
        let f = fixture().await;
        let invoice = f.service.create_invoice(create_payload(f.vehicle.id)).await.unwrap();

        let with_pdf = f
            .service
            .attach_pdf(invoice.id, "fatura.pdf", b"%PDF-1.4".to_vec())
            .await
            .unwrap();
        let path = with_pdf.pdf_path.clone().unwrap();
        assert_eq!(path, format!("invoice_pdfs/{}/F-2024_001-fatura.pdf", f.vehicle.id));

        let (_, bytes) = f.service.download_pdf(&with_pdf).await.unwrap();
        assert_eq!(bytes, b"%PDF-1.4".to_vec());

        f.service.delete_invoice(invoice.id).await.unwrap();
        assert!(!f.blobs.contains(&path).await);
    }

    #[tokio::test]
    async fn failed_save_discards_new_pdf_and_keeps_old() {
        let f = fixture().await;
        let invoice = f.service.create_invoice(create_payload(f.vehicle.id)).await.unwrap();
        let old_path = f
            .service
            .attach_pdf(invoice.id, "fatura.pdf", b"%PDF-1.4".to_vec())
            .await
            .unwrap()
            .pdf_path
            .unwrap();

        let broken = service_over(
            Arc::new(FaultyDatastore::new(f.memory.clone(), Collection::Invoices, FailOn::Set)),
            f.blobs.clone(),
        );
        let result = broken
            .attach_pdf(invoice.id, "revisada.pdf", b"%PDF-1.7".to_vec())
            .await;
        assert!(result.is_err());

        assert_eq!(f.blobs.len().await, 1);
        assert!(f.blobs.contains(&old_path).await);
        assert!(!f
            .blobs
            .contains(&format!("invoice_pdfs/{}/F-2024_001-revisada.pdf", f.vehicle.id))
            .await);
        let stored = f.service.get_invoice(invoice.id).await.unwrap();
        assert_eq!(stored.pdf_path, Some(old_path));
    }

    #[tokio::test]
    async fn enriched_list_uses_names() {
        let f = fixture().await;
        f.service.create_invoice(create_payload(f.vehicle.id)).await.unwrap();

        let rows = f.service.list_for_client(f.client.id).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].client_name, "Lucía Martínez");
        assert_eq!(rows[0].vehicle_label, "Seat León (1234 KLM)");
    }

    #[tokio::test]
    async fn whatsapp_link_uses_mobile() {
        let f = fixture().await;
        let invoice = f.service.create_invoice(create_payload(f.vehicle.id)).await.unwrap();
        let url = f.service.whatsapp_link(invoice.id).await.unwrap();
        assert!(url.starts_with("https://wa.me/34600123456?text="));
        assert!(url.contains("Taller%20Mart%C3%ADnez"));
    }
}
