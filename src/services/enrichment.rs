// src/services/enrichment.rs

//! Junta registros em memória para exibição: nome do cliente, descrição do
//! veículo. Referência ausente nunca é erro, vira [`NOT_AVAILABLE`].

use std::collections::HashMap;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ClientRepository, VehicleRepository},
    models::{
        client::Client,
        enriched::{EnrichedInvoice, EnrichedMaintenance, EnrichedVehicle},
        invoice::Invoice,
        maintenance::MaintenanceItem,
        vehicle::Vehicle,
    },
};

pub const NOT_AVAILABLE: &str = "N/A";

pub fn client_name(clients: &HashMap<Uuid, Client>, id: Uuid) -> String {
    clients
        .get(&id)
        .map(Client::full_name)
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

pub fn vehicle_label(vehicles: &HashMap<Uuid, Vehicle>, id: Uuid) -> String {
    vehicles
        .get(&id)
        .map(Vehicle::descriptor)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

pub fn enrich_invoices(
    invoices: Vec<Invoice>,
    clients: &HashMap<Uuid, Client>,
    vehicles: &HashMap<Uuid, Vehicle>,
) -> Vec<EnrichedInvoice> {
    invoices
        .into_iter()
        .map(|invoice| EnrichedInvoice {
            client_name: client_name(clients, invoice.client_id),
            vehicle_label: vehicle_label(vehicles, invoice.vehicle_id),
            invoice,
        })
        .collect()
}

pub fn enrich_vehicles(
    vehicles: Vec<Vehicle>,
    clients: &HashMap<Uuid, Client>,
) -> Vec<EnrichedVehicle> {
    vehicles
        .into_iter()
        .map(|vehicle| EnrichedVehicle {
            owner_name: client_name(clients, vehicle.owner_id),
            vehicle,
        })
        .collect()
}

pub fn enrich_maintenance(
    items: Vec<MaintenanceItem>,
    clients: &HashMap<Uuid, Client>,
    vehicles: &HashMap<Uuid, Vehicle>,
) -> Vec<EnrichedMaintenance> {
    items
        .into_iter()
        .map(|item| EnrichedMaintenance {
            client_name: client_name(clients, item.client_id),
            vehicle_label: vehicle_label(vehicles, item.vehicle_id),
            item,
        })
        .collect()
}

// --- Carga das referências (em lote) ---

pub async fn load_clients_by_id(
    repo: &ClientRepository,
    ids: impl IntoIterator<Item = Uuid>,
) -> Result<HashMap<Uuid, Client>, AppError> {
    let ids: Vec<Uuid> = ids.into_iter().collect();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let clients = repo.find_many(&ids).await?;
    Ok(clients.into_iter().map(|c| (c.id, c)).collect())
}

pub async fn load_vehicles_by_id(
    repo: &VehicleRepository,
    ids: impl IntoIterator<Item = Uuid>,
) -> Result<HashMap<Uuid, Vehicle>, AppError> {
    let ids: Vec<Uuid> = ids.into_iter().collect();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let vehicles = repo.find_many(&ids).await?;
    Ok(vehicles.into_iter().map(|v| (v.id, v)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use std::sync::Arc;

    use rust_decimal::Decimal;

    use crate::{
        models::{client::Role, invoice::InvoiceStatus},
        store::{Datastore, MemoryDatastore},
    };

    fn client(first: &str, last: &str) -> Client {
        Client {
            id: Uuid::new_v4(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: format!("{}@example.com", first.to_lowercase()),
            phone: None,
            mobile: None,
            document: None,
            fiscal_address: None,
            postal_address: None,
            role: Role::Client,
            is_active: true,
            profile_image_path: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn vehicle(owner_id: Uuid) -> Vehicle {
        Vehicle {
            id: Uuid::new_v4(),
            owner_id,
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
        }
    }

    fn invoice(client_id: Uuid, vehicle_id: Uuid) -> Invoice {
        Invoice {
            id: Uuid::new_v4(),
            vehicle_id,
            client_id,
            invoice_number: "F-1".to_string(),
            date: None,
            items: vec![],
            subtotal: Decimal::from_str("10").unwrap(),
            vat: Decimal::from_str("2.1").unwrap(),
            total: Decimal::from_str("12.1").unwrap(),
            status: InvoiceStatus::Pending,
            notes: None,
            pdf_path: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn resolves_names_by_key() {
        let owner = client("Lucía", "Martínez");
        let car = vehicle(owner.id);
        let clients = HashMap::from([(owner.id, owner.clone())]);
        let vehicles = HashMap::from([(car.id, car.clone())]);

        let rows = enrich_invoices(vec![invoice(owner.id, car.id)], &clients, &vehicles);
        assert_eq!(rows[0].client_name, "Lucía Martínez");
        assert_eq!(rows[0].vehicle_label, "Seat León (1234 KLM)");
    }

    #[test]
    fn missing_references_render_sentinel() {
        let rows = enrich_invoices(
            vec![invoice(Uuid::new_v4(), Uuid::new_v4())],
            &HashMap::new(),
            &HashMap::new(),
        );
        assert_eq!(rows[0].client_name, NOT_AVAILABLE);
        assert_eq!(rows[0].vehicle_label, NOT_AVAILABLE);

        let rows = enrich_vehicles(vec![vehicle(Uuid::new_v4())], &HashMap::new());
        assert_eq!(rows[0].owner_name, NOT_AVAILABLE);
    }

    #[test]
    fn blank_names_render_sentinel() {
        let nameless = client(" ", "");
        let clients = HashMap::from([(nameless.id, nameless.clone())]);
        assert_eq!(client_name(&clients, nameless.id), NOT_AVAILABLE);
    }

    #[tokio::test]
    async fn loads_references_in_chunks() {
        let memory = MemoryDatastore::new();
        let store: Arc<dyn Datastore> = Arc::new(memory.clone());
        let repo = ClientRepository::new(store);

        let mut ids = Vec::new();
        for n in 0..45 {
            let c = client(&format!("Cliente{n}"), "Teste");
            repo.create(&c).await.unwrap();
            ids.push(c.id);
        }
        // Um id sem registro no meio não quebra a carga
        ids.push(Uuid::new_v4());

        let before = memory.query_count();
        let map = load_clients_by_id(&repo, ids.clone()).await.unwrap();
        assert_eq!(map.len(), 45);
        assert_eq!(memory.query_count() - before, 2);
    }
}
