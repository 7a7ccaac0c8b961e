// src/services/billing.rs

//! Cálculo dos totais de uma fatura.
//!
//! Cada etapa é arredondada a 2 casas (meio para longe do zero) antes da
//! seguinte: linha, subtotal, IVA e total.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::{
    common::error::AppError,
    models::invoice::{InvoiceServiceItem, LineItemPayload},
};

/// IVA geral: 21%.
pub const VAT_RATE: Decimal = Decimal::from_parts(21, 0, 0, false, 2);

#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceTotals {
    pub items: Vec<InvoiceServiceItem>,
    pub subtotal: Decimal,
    pub vat: Decimal,
    pub total: Decimal,
}

pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Função pura: valida os itens e devolve itens com `lineTotal` + totais.
pub fn compute_totals(items: &[LineItemPayload]) -> Result<InvoiceTotals, AppError> {
    let mut priced = Vec::with_capacity(items.len());
    let mut sum = Decimal::ZERO;

    for (index, item) in items.iter().enumerate() {
        if item.quantity <= Decimal::ZERO {
            return Err(AppError::InvalidLineItem {
                index,
                field: "quantity",
                message: "A quantidade deve ser maior que zero.".to_string(),
            });
        }
        if item.unit_price < Decimal::ZERO {
            return Err(AppError::InvalidLineItem {
                index,
                field: "unitPrice",
                message: "O preço unitário não pode ser negativo.".to_string(),
            });
        }

        let line_total = item
            .quantity
            .checked_mul(item.unit_price)
            .map(round2)
            .ok_or_else(|| AppError::InvalidLineItem {
                index,
                field: "quantity",
                message: "O valor do item excede o limite suportado.".to_string(),
            })?;
        sum = sum.checked_add(line_total).ok_or_else(|| AppError::InvalidLineItem {
            index,
            field: "quantity",
            message: "O total da fatura excede o limite suportado.".to_string(),
        })?;
        priced.push(InvoiceServiceItem {
            service_id: item.service_id,
            description: item.description.trim().to_string(),
            quantity: item.quantity,
            unit_price: item.unit_price,
            line_total,
        });
    }

    let subtotal = round2(sum);
    let vat = round2(subtotal * VAT_RATE);
    let total = subtotal
        .checked_add(vat)
        .map(round2)
        .ok_or_else(|| AppError::field("items", "total_overflow", "O total da fatura excede o limite suportado."))?;

    Ok(InvoiceTotals { items: priced, subtotal, vat, total })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn line(qty: &str, price: &str) -> LineItemPayload {
        LineItemPayload {
            service_id: None,
            description: "Serviço".to_string(),
            quantity: dec(qty),
            unit_price: dec(price),
        }
    }

    #[test]
    fn chained_rounding_matches_the_reference_invoice() {
        let totals = compute_totals(&[line("2", "25.555")]).unwrap();
        assert_eq!(totals.items[0].line_total, dec("51.11"));
        assert_eq!(totals.subtotal, dec("51.11"));
        assert_eq!(totals.vat, dec("10.73"));
        assert_eq!(totals.total, dec("61.84"));
    }

    #[test]
    fn subtotal_sums_rounded_line_totals() {
        // 3 × 0.335 = 1.005 → 1.01 por linha; duas linhas = 2.02 (e não round2(2.010))
        let totals = compute_totals(&[line("3", "0.335"), line("3", "0.335")]).unwrap();
        assert_eq!(totals.subtotal, dec("2.02"));
        assert_eq!(totals.vat, dec("0.42"));
        assert_eq!(totals.total, dec("2.44"));
    }

    #[test]
    fn midpoint_rounds_away_from_zero() {
        assert_eq!(round2(dec("0.125")), dec("0.13"));
        assert_eq!(round2(dec("-0.125")), dec("-0.13"));
    }

    #[test]
    fn free_items_are_allowed() {
        let totals = compute_totals(&[line("1", "0")]).unwrap();
        assert_eq!(totals.total, Decimal::ZERO);
    }

    #[test]
    fn rejects_non_positive_quantity() {
        let err = compute_totals(&[line("1", "10"), line("0", "10")]).unwrap_err();
        match err {
            AppError::InvalidLineItem { index, field, .. } => {
                assert_eq!(index, 1);
                assert_eq!(field, "quantity");
            }
            other => panic!("erro inesperado: {other:?}"),
        }
    }

    #[test]
    fn oversized_line_is_rejected_instead_of_overflowing() {
        let huge = Decimal::from_scientific("1e28").unwrap();
        let oversized = LineItemPayload { quantity: huge, unit_price: huge, ..line("1", "1") };
        let err = compute_totals(&[line("1", "1"), oversized]).unwrap_err();
        match err {
            AppError::InvalidLineItem { index, field, .. } => {
                assert_eq!(index, 1);
                assert_eq!(field, "quantity");
            }
            other => panic!("erro inesperado: {other:?}"),
        }
    }

    #[test]
    fn overflowing_sum_is_rejected() {
        let big = Decimal::MAX.to_string();
        let err = compute_totals(&[line("1", &big), line("1", &big)]).unwrap_err();
        assert!(matches!(err, AppError::InvalidLineItem { index: 1, .. }));
    }

    #[test]
    fn overflowing_total_with_vat_is_rejected() {
        let big = Decimal::MAX.to_string();
        let err = compute_totals(&[line("1", &big)]).unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[test]
    fn rejects_negative_unit_price() {
        let err = compute_totals(&[line("1", "-0.01")]).unwrap_err();
        assert!(matches!(err, AppError::InvalidLineItem { field: "unitPrice", .. }));
    }
}
