// src/services/notification.rs

//! Aviso de fatura por WhatsApp: só monta o link `wa.me`, não envia nada.

use crate::{common::error::AppError, models::invoice::Invoice};

const WHATSAPP_BASE: &str = "https://wa.me";

/// Reduz o telefone aos dígitos. O prefixo internacional `00` vira nada
/// (`0034...` e `+34...` dão o mesmo resultado).
pub fn phone_digits(phone: &str) -> Option<String> {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    let digits = digits.strip_prefix("00").map(str::to_string).unwrap_or(digits);
    if digits.is_empty() {
        None
    } else {
        Some(digits)
    }
}

pub fn invoice_message(client_name: &str, invoice: &Invoice, shop_name: &str) -> String {
    format!(
        "Olá {}, a sua fatura {} de {} no valor de {:.2} € está disponível. Estado: {}.",
        client_name,
        invoice.invoice_number,
        shop_name,
        invoice.total,
        invoice.status.as_str()
    )
}

pub fn whatsapp_invoice_link(
    phone: &str,
    client_name: &str,
    invoice: &Invoice,
    shop_name: &str,
) -> Result<String, AppError> {
    let digits = phone_digits(phone).ok_or_else(|| {
        AppError::field("phone", "invalid_phone", "O cliente não tem um telefone válido.")
    })?;

    let message = invoice_message(client_name, invoice, shop_name);
    Ok(format!(
        "{}/{}?text={}",
        WHATSAPP_BASE,
        digits,
        urlencoding::encode(&message)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    use rust_decimal::Decimal;
    use uuid::Uuid;

    use crate::models::invoice::InvoiceStatus;

    fn invoice() -> Invoice {
        Invoice {
            id: Uuid::new_v4(),
            vehicle_id: Uuid::new_v4(),
            client_id: Uuid::new_v4(),
            invoice_number: "F-2024-0001".to_string(),
            date: None,
            items: vec![],
            subtotal: Decimal::from_str("51.11").unwrap(),
            vat: Decimal::from_str("10.73").unwrap(),
            total: Decimal::from_str("61.84").unwrap(),
            status: InvoiceStatus::Pending,
            notes: None,
            pdf_path: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn phone_is_reduced_to_digits() {
        assert_eq!(phone_digits("+34 600 123 456").as_deref(), Some("34600123456"));
        assert_eq!(phone_digits("0034-600-123-456").as_deref(), Some("34600123456"));
        assert_eq!(phone_digits(" - "), None);
    }

    #[test]
    fn link_carries_encoded_message() {
        let url = whatsapp_invoice_link("+34 600 123 456", "Lucía", &invoice(), "Oficina").unwrap();
        assert!(url.starts_with("https://wa.me/34600123456?text="));
        assert!(url.contains("F-2024-0001"));
        assert!(url.contains("61.84"));
        assert!(!url.contains(' '));
        assert!(url.contains("Luc%C3%ADa"));
    }

    #[test]
    fn missing_phone_is_a_validation_error() {
        let err = whatsapp_invoice_link("", "Lucía", &invoice(), "Oficina").unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }
}
