//! Modelos de órdenes de compra

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

/// Estados del catálogo `cat_purchase_order_statuses`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PoStatus {
    Draft = 1,
    PendingApproval = 2,
    Approved = 3,
    PartiallyReceived = 4,
    Received = 5,
    Cancelled = 6,
}

impl PoStatus {
    pub fn from_id(id: i32) -> Option<Self> {
        match id {
            1 => Some(PoStatus::Draft),
            2 => Some(PoStatus::PendingApproval),
            3 => Some(PoStatus::Approved),
            4 => Some(PoStatus::PartiallyReceived),
            5 => Some(PoStatus::Received),
            6 => Some(PoStatus::Cancelled),
            _ => None,
        }
    }

    pub fn id(self) -> i32 {
        self as i32
    }

    /// Solo borrador y pendiente de aprobación admiten edición
    pub fn is_editable(self) -> bool {
        self <= PoStatus::PendingApproval
    }

    pub fn can_receive(self) -> bool {
        self >= PoStatus::Approved && self != PoStatus::Cancelled
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PurchaseOrder {
    pub id: i32,
    pub po_number: String,
    pub supplier_id: i32,
    pub project_id: Option<i32>,
    pub po_status_id: i32,
    pub order_date: NaiveDate,
    pub expected_delivery_date: Option<NaiveDate>,
    pub actual_delivery_date: Option<NaiveDate>,
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub total_amount: Decimal,
    pub notes: Option<String>,
    pub created_by: Option<i32>,
    pub modified_by: Option<i32>,
    pub created_date: DateTime<Utc>,
    pub modified_date: DateTime<Utc>,
    pub is_active: bool,
}

/// Fila del listado con proveedor, estado y número de partidas
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PurchaseOrderSummary {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub order: PurchaseOrder,
    pub supplier_name: Option<String>,
    pub supplier_contact: Option<String>,
    pub supplier_phone: Option<String>,
    pub supplier_email: Option<String>,
    pub status_name: Option<String>,
    pub status_alias: Option<String>,
    pub created_by_name: Option<String>,
    pub items_count: i64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PurchaseOrderDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub order: PurchaseOrder,
    pub supplier_name: Option<String>,
    pub supplier_contact: Option<String>,
    pub supplier_phone: Option<String>,
    pub supplier_email: Option<String>,
    pub status_name: Option<String>,
    pub status_alias: Option<String>,
    pub created_by_name: Option<String>,
    pub modified_by_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PurchaseOrderItem {
    pub id: i32,
    pub purchase_order_id: i32,
    pub material_id: i32,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
    pub received_quantity: Decimal,
    pub created_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PurchaseOrderItemDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub item: PurchaseOrderItem,
    pub material_code: Option<String>,
    pub material_name: Option<String>,
    pub unit_of_measure: Option<String>,
    pub category_name: Option<String>,
}

/// Cabecera más partidas
#[derive(Debug, Serialize)]
pub struct PurchaseOrderWithItems {
    #[serde(flatten)]
    pub order: PurchaseOrderDetail,
    pub items: Vec<PurchaseOrderItemDetail>,
}

#[derive(Debug, Serialize, FromRow)]
pub struct PurchaseOrderStats {
    pub total_orders: i64,
    pub draft: i64,
    pub pending_approval: i64,
    pub approved: i64,
    pub partially_received: i64,
    pub received: i64,
    pub cancelled: i64,
    pub total_amount: Decimal,
    pub approved_amount: Decimal,
}

#[derive(Debug, Serialize)]
pub struct CreatedPurchaseOrder {
    pub id: i32,
    pub po_number: String,
}

#[derive(Debug, Serialize)]
pub struct ReceiveResult {
    pub new_status_id: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_rules() {
        assert!(PoStatus::Draft.is_editable());
        assert!(PoStatus::PendingApproval.is_editable());
        assert!(!PoStatus::Approved.is_editable());

        assert!(!PoStatus::PendingApproval.can_receive());
        assert!(PoStatus::Approved.can_receive());
        assert!(PoStatus::PartiallyReceived.can_receive());
        assert!(!PoStatus::Cancelled.can_receive());
    }

    #[test]
    fn test_status_ids() {
        assert_eq!(PoStatus::from_id(5), Some(PoStatus::Received));
        assert_eq!(PoStatus::from_id(0), None);
        assert_eq!(PoStatus::from_id(7), None);
        assert_eq!(PoStatus::Cancelled.id(), 6);
    }
}
