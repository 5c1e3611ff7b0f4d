//! Modelo de Supplier

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Supplier {
    pub id: i32,
    pub supplier_name: String,
    pub supplier_category_id: i32,
    pub contact_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub payment_terms: Option<String>,
    pub created_by: Option<i32>,
    pub modified_by: Option<i32>,
    pub created_date: DateTime<Utc>,
    pub modified_date: DateTime<Utc>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SupplierSummary {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub supplier: Supplier,
    pub category_name: Option<String>,
    pub created_by_name: Option<String>,
    pub purchase_orders_count: i64,
}

/// Proveedor con número de órdenes y monto total comprado
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SupplierDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub supplier: Supplier,
    pub category_name: Option<String>,
    pub created_by_name: Option<String>,
    pub modified_by_name: Option<String>,
    pub purchase_orders_count: i64,
    pub total_purchases: Decimal,
}

#[derive(Debug, Serialize, FromRow)]
pub struct SuppliersByCategory {
    pub category_name: Option<String>,
    pub count: i64,
}

#[derive(Debug, Serialize, FromRow)]
pub struct TopSupplier {
    pub id: i32,
    pub supplier_name: String,
    pub total_orders: i64,
    pub total_amount: Decimal,
}

#[derive(Debug, Serialize)]
pub struct SupplierStats {
    pub total_suppliers: i64,
    pub suppliers_by_category: Vec<SuppliersByCategory>,
    pub top_suppliers: Vec<TopSupplier>,
}

#[derive(Debug, Serialize, FromRow)]
pub struct SupplierCategory {
    pub id: i32,
    pub name: String,
    pub alias: Option<String>,
    pub description: Option<String>,
}
