// src/services/document_service.rs

use std::path::PathBuf;

use genpdf::{elements, style, Alignment, Element};

use crate::{
    common::{error::AppError, timestamp::Timestamp},
    config::ShopInfo,
    models::{client::Client, invoice::Invoice, vehicle::Vehicle},
    services::{billing::VAT_RATE, enrichment::NOT_AVAILABLE},
};

#[derive(Clone)]
pub struct DocumentService {
    fonts_dir: PathBuf,
    font_family: String,
    shop: ShopInfo,
}

impl DocumentService {
    pub fn new(fonts_dir: impl Into<PathBuf>, font_family: String, shop: ShopInfo) -> Self {
        Self { fonts_dir: fonts_dir.into(), font_family, shop }
    }

    pub fn shop(&self) -> &ShopInfo {
        &self.shop
    }

    /// Gera o PDF da fatura em memória. A renderização é síncrona, então
    /// roda numa thread de bloqueio.
    pub async fn render_invoice_pdf(
        &self,
        invoice: Invoice,
        client: Option<Client>,
        vehicle: Option<Vehicle>,
    ) -> Result<Vec<u8>, AppError> {
        let this = self.clone();
        tokio::task::spawn_blocking(move || this.render(&invoice, client.as_ref(), vehicle.as_ref()))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de geração do PDF: {}", e))?
    }

    fn render(
        &self,
        invoice: &Invoice,
        client: Option<&Client>,
        vehicle: Option<&Vehicle>,
    ) -> Result<Vec<u8>, AppError> {
        // 1. Fonte (pasta configurável, ex: ./fonts/Roboto-Regular.ttf)
        let font_family = genpdf::fonts::from_files(&self.fonts_dir, &self.font_family, None)
            .map_err(|_| {
                AppError::FontNotFound(format!(
                    "Fonte '{}' não encontrada na pasta {}",
                    self.font_family,
                    self.fonts_dir.display()
                ))
            })?;

        let mut doc = genpdf::Document::new(font_family);
        doc.set_title(format!("Fatura {}", invoice.invoice_number));
        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(10);
        doc.set_page_decorator(decorator);

        // --- CABEÇALHO DA OFICINA ---
        doc.push(
            elements::Paragraph::new(self.shop.name.clone())
                .styled(style::Style::new().bold().with_font_size(18)),
        );
        if let Some(tax_id) = &self.shop.tax_id {
            doc.push(
                elements::Paragraph::new(format!("CIF: {}", tax_id))
                    .styled(style::Style::new().with_font_size(10)),
            );
        }
        if let Some(phone) = &self.shop.phone {
            doc.push(
                elements::Paragraph::new(format!("Tel: {}", phone))
                    .styled(style::Style::new().with_font_size(10)),
            );
        }

        doc.push(elements::Break::new(1.5));

        doc.push(
            elements::Paragraph::new(format!("FATURA {}", invoice.invoice_number))
                .styled(style::Style::new().bold().with_font_size(14)),
        );
        doc.push(elements::Paragraph::new(format!("Data: {}", format_date(invoice.date.as_ref()))));
        doc.push(elements::Paragraph::new(format!("Estado: {}", invoice.status.as_str())));

        // --- CLIENTE E VEÍCULO ---
        doc.push(elements::Break::new(1));
        let client_name = client
            .map(Client::full_name)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());
        doc.push(elements::Paragraph::new(format!("Cliente: {}", client_name)));
        if let Some(document) = client.and_then(|c| c.document.as_ref()) {
            doc.push(elements::Paragraph::new(format!("Documento: {}", document.number)));
        }
        if let Some(address) = client.and_then(|c| c.fiscal_address.as_ref()) {
            doc.push(elements::Paragraph::new(format!(
                "Endereço: {}, {} {}",
                address.street, address.postal_code, address.city
            )));
        }
        let vehicle_label = vehicle
            .map(Vehicle::descriptor)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());
        doc.push(elements::Paragraph::new(format!("Veículo: {}", vehicle_label)));
        if let Some(v) = vehicle {
            doc.push(elements::Paragraph::new(format!("VIN: {}", v.vin)));
        }

        doc.push(elements::Break::new(2));

        // --- TABELA DE ITENS ---
        // Pesos das colunas: Descrição (4), Qtd (1), Preço (2), Total (2)
        let mut table = elements::TableLayout::new(vec![4, 1, 2, 2]);
        table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

        let style_bold = style::Style::new().bold();
        table
            .row()
            .element(elements::Paragraph::new("Serviço").styled(style_bold))
            .element(elements::Paragraph::new("Qtd").styled(style_bold))
            .element(elements::Paragraph::new("Unitário").styled(style_bold))
            .element(elements::Paragraph::new("Total").styled(style_bold))
            .push()
            .map_err(pdf_error)?;

        for item in &invoice.items {
            table
                .row()
                .element(elements::Paragraph::new(item.description.clone()))
                .element(elements::Paragraph::new(format!("{}", item.quantity.normalize())))
                .element(elements::Paragraph::new(format!("{:.2} €", item.unit_price)))
                .element(elements::Paragraph::new(format!("{:.2} €", item.line_total)))
                .push()
                .map_err(pdf_error)?;
        }

        doc.push(table);
        doc.push(elements::Break::new(2));

        // --- TOTAIS ---
        let vat_percent = (VAT_RATE * rust_decimal::Decimal::ONE_HUNDRED).normalize();
        for line in [
            format!("Subtotal: {:.2} €", invoice.subtotal),
            format!("IVA ({}%): {:.2} €", vat_percent, invoice.vat),
        ] {
            let mut paragraph = elements::Paragraph::new(line);
            paragraph.set_alignment(Alignment::Right);
            doc.push(paragraph);
        }
        let mut total_paragraph =
            elements::Paragraph::new(format!("TOTAL: {:.2} €", invoice.total));
        total_paragraph.set_alignment(Alignment::Right);
        doc.push(total_paragraph.styled(style::Style::new().bold().with_font_size(12)));

        if let Some(notes) = invoice.notes.as_deref().filter(|n| !n.trim().is_empty()) {
            doc.push(elements::Break::new(2));
            doc.push(elements::Paragraph::new("Observações").styled(style_bold));
            doc.push(elements::Paragraph::new(notes.to_string()));
        }

        // --- RODAPÉ ---
        if let Some(addr) = &self.shop.address {
            doc.push(elements::Break::new(2));
            doc.push(
                elements::Paragraph::new(addr.clone())
                    .styled(style::Style::new().italic().with_font_size(8)),
            );
        }

        // Renderiza para buffer (memória)
        let mut buffer = Vec::new();
        doc.render(&mut buffer).map_err(pdf_error)?;
        Ok(buffer)
    }
}

fn pdf_error(e: genpdf::error::Error) -> AppError {
    AppError::PdfError(e.to_string())
}

fn format_date(ts: Option<&Timestamp>) -> String {
    match ts {
        Some(Timestamp::Valid(dt)) => dt.format("%d/%m/%Y").to_string(),
        Some(Timestamp::Invalid(raw)) => raw.clone(),
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn dates_are_day_month_year() {
        let ts = Timestamp::Valid(Utc.with_ymd_and_hms(2024, 3, 7, 10, 0, 0).unwrap());
        assert_eq!(format_date(Some(&ts)), "07/03/2024");
        assert_eq!(format_date(None), "-");
        assert_eq!(format_date(Some(&Timestamp::Invalid("ontem".into()))), "ontem");
    }

    #[tokio::test]
    async fn missing_fonts_are_reported() {
        let service = DocumentService::new(
            "/caminho/que/nao/existe",
            "Roboto".to_string(),
            ShopInfo::default(),
        );
        let invoice = Invoice {
            id: uuid::Uuid::new_v4(),
            vehicle_id: uuid::Uuid::new_v4(),
            client_id: uuid::Uuid::new_v4(),
            invoice_number: "F-1".to_string(),
            date: None,
            items: vec![],
            subtotal: rust_decimal::Decimal::ZERO,
            vat: rust_decimal::Decimal::ZERO,
            total: rust_decimal::Decimal::ZERO,
            status: crate::models::invoice::InvoiceStatus::Pending,
            notes: None,
            pdf_path: None,
            created_at: None,
            updated_at: None,
        };
        let err = service.render_invoice_pdf(invoice, None, None).await.unwrap_err();
        assert!(matches!(err, AppError::FontNotFound(_)));
    }
}
