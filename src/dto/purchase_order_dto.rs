use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use crate::utils::validation::{validate_non_negative_decimal, validate_positive_decimal};

/// IVA aplicado a toda orden de compra
pub const TAX_RATE: Decimal = Decimal::from_parts(16, 0, 0, false, 2);

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PurchaseOrderItemRequest {
    pub material_id: i32,
    #[validate(custom = "validate_positive_decimal")]
    pub quantity: Decimal,
    #[validate(custom = "validate_non_negative_decimal")]
    pub unit_price: Decimal,
}

impl PurchaseOrderItemRequest {
    pub fn subtotal(&self) -> Decimal {
        (self.quantity * self.unit_price).round_dp(2)
    }
}

/// (subtotal, impuesto, total) de un conjunto de partidas
pub fn compute_totals(items: &[PurchaseOrderItemRequest]) -> (Decimal, Decimal, Decimal) {
    let subtotal: Decimal = items.iter().map(PurchaseOrderItemRequest::subtotal).sum();
    let tax = (subtotal * TAX_RATE).round_dp(2);
    (subtotal, tax, subtotal + tax)
}

#[derive(Debug, Deserialize)]
pub struct CreatePurchaseOrderRequest {
    pub supplier_id: Option<i32>,
    pub project_id: Option<i32>,
    pub order_date: Option<NaiveDate>,
    pub expected_delivery_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub items: Option<Vec<PurchaseOrderItemRequest>>,
}

/// Con `items` se reemplazan las partidas y se recalculan los totales
#[derive(Debug, Default, Deserialize)]
pub struct UpdatePurchaseOrderRequest {
    pub supplier_id: Option<i32>,
    pub project_id: Option<i32>,
    pub order_date: Option<NaiveDate>,
    pub expected_delivery_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub items: Option<Vec<PurchaseOrderItemRequest>>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status_id: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReceiveItemRequest {
    pub item_id: i32,
    pub received_quantity: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct ReceiveMaterialsRequest {
    #[serde(default)]
    pub items: Vec<ReceiveItemRequest>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PurchaseOrderFilter {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    pub status_id: Option<i32>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(quantity: i64, unit_price: i64) -> PurchaseOrderItemRequest {
        PurchaseOrderItemRequest {
            material_id: 1,
            quantity: Decimal::new(quantity, 0),
            unit_price: Decimal::new(unit_price, 2),
        }
    }

    #[test]
    fn test_totals_apply_sixteen_percent_tax() {
        // 10 × 12.50 + 4 × 25.00 = 225.00
        let (subtotal, tax, total) = compute_totals(&[item(10, 1250), item(4, 2500)]);
        assert_eq!(subtotal, Decimal::new(22500, 2));
        assert_eq!(tax, Decimal::new(3600, 2));
        assert_eq!(total, Decimal::new(26100, 2));
    }

    #[test]
    fn test_tax_is_rounded_to_cents() {
        let (_, tax, total) = compute_totals(&[item(1, 333)]);
        assert_eq!(tax, Decimal::new(53, 2));
        assert_eq!(total, Decimal::new(386, 2));
    }

    #[test]
    fn test_item_quantity_must_be_positive() {
        let request: CreatePurchaseOrderRequest = serde_json::from_str(
            r#"{"supplier_id": 1, "items": [{"material_id": 1, "quantity": 0, "unit_price": 10}]}"#,
        )
        .unwrap();
        let items = request.items.unwrap();
        assert!(items[0].validate().is_err());
        assert!(item(1, 100).validate().is_ok());
    }
}
