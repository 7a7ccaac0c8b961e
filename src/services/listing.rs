// src/services/listing.rs

//! Filtro + paginação em memória para as tabelas dos portais.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::models::{
    catalog::ServiceCatalogItem,
    client::Client,
    enriched::{EnrichedInvoice, EnrichedMaintenance, EnrichedVehicle},
};

pub const PAGE_SIZE: usize = 10;

/// O que um registro expõe para os filtros da tabela.
pub trait Listable {
    fn status(&self) -> Option<&str>;
    fn owner_id(&self) -> Option<Uuid>;
    fn search_fields(&self) -> Vec<&str>;
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListFilter {
    pub status: Option<String>,
    pub owner_id: Option<Uuid>,
    pub search: Option<String>,
}

impl ListFilter {
    pub fn with_status(mut self, status: &str) -> Self {
        self.status = Some(status.to_string());
        self
    }

    pub fn with_owner(mut self, owner_id: Uuid) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    pub fn with_search(mut self, text: &str) -> Self {
        self.search = Some(text.to_string());
        self
    }

    /// Predicados independentes (E lógico), então a ordem de aplicação não importa.
    pub fn matches<T: Listable>(&self, item: &T) -> bool {
        if let Some(status) = &self.status {
            if item.status() != Some(status.as_str()) {
                return false;
            }
        }
        if let Some(owner_id) = self.owner_id {
            if item.owner_id() != Some(owner_id) {
                return false;
            }
        }
        if let Some(needle) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let needle = needle.to_lowercase();
            return item
                .search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&needle));
        }
        true
    }
}

/// Parâmetros de query aceitos pelas rotas de listagem.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Igualdade de status (ex: `pending`, `active`)
    pub status: Option<String>,
    /// Dono do registro
    pub owner_id: Option<Uuid>,
    /// Busca por texto, sem diferenciar maiúsculas
    pub q: Option<String>,
    /// Página (começa em 1)
    pub page: Option<usize>,
}

impl ListQuery {
    pub fn filter(&self) -> ListFilter {
        ListFilter {
            status: self.status.clone().filter(|s| !s.trim().is_empty()),
            owner_id: self.owner_id,
            search: self.q.clone(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

/// Estado de uma tabela: lista completa, filtro ativo e página atual.
pub struct ListView<T> {
    items: Vec<T>,
    filter: ListFilter,
    filtered: Vec<usize>, // índices em `items`
    page: usize,
    page_size: usize,
}

impl<T: Listable> ListView<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self::with_page_size(items, PAGE_SIZE)
    }

    pub fn with_page_size(items: Vec<T>, page_size: usize) -> Self {
        let mut view = Self {
            items,
            filter: ListFilter::default(),
            filtered: Vec::new(),
            page: 1,
            page_size: page_size.max(1),
        };
        view.recompute();
        view
    }

    /// Troca o filtro e volta para a página 1.
    pub fn set_filter(&mut self, filter: ListFilter) {
        self.filter = filter;
        self.recompute();
    }

    fn recompute(&mut self) {
        self.filtered = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| self.filter.matches(*item))
            .map(|(i, _)| i)
            .collect();
        self.page = 1;
    }

    pub fn filter(&self) -> &ListFilter {
        &self.filter
    }

    pub fn filtered_count(&self) -> usize {
        self.filtered.len()
    }

    /// `ceil(filtrados / tamanho da página)`; zero quando não há nada.
    pub fn total_pages(&self) -> usize {
        self.filtered.len().div_ceil(self.page_size)
    }

    fn last_page(&self) -> usize {
        self.total_pages().max(1)
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// Sem efeito na última página.
    pub fn next_page(&mut self) {
        if self.page < self.last_page() {
            self.page += 1;
        }
    }

    /// Sem efeito na página 1.
    pub fn previous_page(&mut self) {
        if self.page > 1 {
            self.page -= 1;
        }
    }

    pub fn go_to(&mut self, page: usize) {
        self.page = page.clamp(1, self.last_page());
    }

    pub fn page_items(&self) -> Vec<&T> {
        self.filtered
            .iter()
            .skip((self.page - 1) * self.page_size)
            .take(self.page_size)
            .map(|&i| &self.items[i])
            .collect()
    }

    pub fn into_page(self) -> Page<T> {
        let total_items = self.filtered.len();
        let total_pages = self.total_pages();
        let start = (self.page - 1) * self.page_size;
        let wanted: Vec<usize> = self
            .filtered
            .iter()
            .skip(start)
            .take(self.page_size)
            .copied()
            .collect();

        let items = self
            .items
            .into_iter()
            .enumerate()
            .filter(|(i, _)| wanted.binary_search(i).is_ok())
            .map(|(_, item)| item)
            .collect();

        Page {
            items,
            page: self.page,
            page_size: self.page_size,
            total_items,
            total_pages,
        }
    }
}

/// Atalho das rotas: aplica a query e devolve a página pedida.
pub fn paginate<T: Listable>(items: Vec<T>, query: &ListQuery) -> Page<T> {
    let mut view = ListView::new(items);
    view.set_filter(query.filter());
    view.go_to(query.page.unwrap_or(1));
    view.into_page()
}

// --- Implementações ---

impl Listable for EnrichedInvoice {
    fn status(&self) -> Option<&str> {
        Some(self.invoice.status.as_str())
    }

    fn owner_id(&self) -> Option<Uuid> {
        Some(self.invoice.client_id)
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![
            self.invoice.invoice_number.as_str(),
            self.client_name.as_str(),
            self.vehicle_label.as_str(),
        ];
        fields.extend(self.invoice.items.iter().map(|i| i.description.as_str()));
        fields
    }
}

impl Listable for EnrichedVehicle {
    fn status(&self) -> Option<&str> {
        None
    }

    fn owner_id(&self) -> Option<Uuid> {
        Some(self.vehicle.owner_id)
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.vehicle.make.as_str(),
            self.vehicle.model.as_str(),
            self.vehicle.license_plate.as_str(),
            self.vehicle.vin.as_str(),
            self.owner_name.as_str(),
        ]
    }
}

impl Listable for EnrichedMaintenance {
    fn status(&self) -> Option<&str> {
        Some(self.item.status.as_str())
    }

    fn owner_id(&self) -> Option<Uuid> {
        Some(self.item.client_id)
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![
            self.item.description.as_str(),
            self.client_name.as_str(),
            self.vehicle_label.as_str(),
        ];
        fields.extend(self.item.tasks.iter().map(String::as_str));
        fields
    }
}

impl Listable for Client {
    fn status(&self) -> Option<&str> {
        Some(if self.is_active { "active" } else { "inactive" })
    }

    fn owner_id(&self) -> Option<Uuid> {
        None
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![
            self.first_name.as_str(),
            self.last_name.as_str(),
            self.email.as_str(),
        ];
        fields.extend(self.phone.as_deref());
        fields.extend(self.mobile.as_deref());
        fields.extend(self.document.as_ref().map(|d| d.number.as_str()));
        fields
    }
}

impl Listable for ServiceCatalogItem {
    fn status(&self) -> Option<&str> {
        Some(if self.is_active { "active" } else { "inactive" })
    }

    fn owner_id(&self) -> Option<Uuid> {
        None
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.category.as_str()];
        fields.extend(self.description.as_deref());
        fields
    }
}
