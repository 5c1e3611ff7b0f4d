//! Modelos del almacén: kardex, transferencias y reportes de stock

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

/// Fila de `inventory_transactions`; `quantity` lleva signo
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct InventoryTransaction {
    pub id: i32,
    pub transaction_number: String,
    pub material_id: i32,
    pub transaction_type_id: i32,
    pub warehouse_location_id: i32,
    pub quantity: Decimal,
    pub unit_cost: Option<Decimal>,
    pub total_value: Option<Decimal>,
    pub project_id: Option<i32>,
    pub purchase_order_id: Option<i32>,
    pub reference_number: Option<String>,
    pub notes: Option<String>,
    pub transaction_date: DateTime<Utc>,
    pub created_by: Option<i32>,
    pub created_date: DateTime<Utc>,
}

/// Movimiento con material, tipo, ubicación y usuario resueltos
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TransactionDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub transaction: InventoryTransaction,
    pub material_code: String,
    pub material_name: String,
    pub transaction_type: String,
    pub transaction_type_alias: Option<String>,
    pub location_name: String,
    pub created_by_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TransferDetail {
    pub id: i32,
    pub material_id: i32,
    pub material_code: String,
    pub material_name: String,
    pub from_location_id: i32,
    pub from_location_name: String,
    pub to_location_id: i32,
    pub to_location_name: String,
    pub quantity: Decimal,
    pub reorganization_date: DateTime<Utc>,
    pub reason: Option<String>,
    pub performed_by: Option<i32>,
    pub performed_by_name: Option<String>,
    pub created_date: DateTime<Utc>,
}

#[derive(Debug, Serialize, FromRow)]
pub struct LocationSummary {
    pub id: i32,
    pub name: String,
    pub alias: Option<String>,
    pub address: Option<String>,
    pub materials_count: i64,
    pub total_quantity: Decimal,
}

/// Material con existencias en una ubicación
#[derive(Debug, Serialize, FromRow)]
pub struct LocationStock {
    pub id: i32,
    pub material_code: String,
    pub material_name: String,
    pub category_name: Option<String>,
    pub unit_name: Option<String>,
    pub unit_alias: Option<String>,
    pub location_stock: Decimal,
    pub total_stock: Decimal,
    pub minimum_stock: Decimal,
    pub unit_cost: Decimal,
}

#[derive(Debug, Serialize, FromRow)]
pub struct WarehouseTotals {
    pub total_locations: i64,
    pub total_materials_in_stock: i64,
    pub total_transactions: i64,
    pub total_entries: i64,
    pub total_exits: i64,
    pub total_transfers: i64,
    pub total_adjustments: i64,
    pub total_entries_value: Decimal,
    pub total_exits_value: Decimal,
}

#[derive(Debug, Serialize, FromRow)]
pub struct LocationStockValue {
    pub id: i32,
    pub location_name: String,
    pub materials_count: i64,
    pub total_quantity: Decimal,
    pub stock_value: Decimal,
}

#[derive(Debug, Serialize)]
pub struct WarehouseStats {
    #[serde(flatten)]
    pub totals: WarehouseTotals,
    pub stock_by_location: Vec<LocationStockValue>,
}

/// Una fila por material × ubicación con existencias
#[derive(Debug, Serialize, FromRow)]
pub struct StockReportRow {
    pub id: i32,
    pub material_code: String,
    pub material_name: String,
    pub category_name: Option<String>,
    pub unit_name: Option<String>,
    pub location_id: i32,
    pub location_name: String,
    pub location_stock: Decimal,
    pub total_stock: Decimal,
    pub minimum_stock: Decimal,
    pub reorder_point: Decimal,
    pub unit_cost: Decimal,
    pub stock_value: Decimal,
}

#[derive(Debug, Serialize)]
pub struct TransferResult {
    pub exit_transaction: String,
    pub entry_transaction: String,
}

#[derive(Debug, Serialize)]
pub struct AdjustmentResult {
    pub transaction_number: String,
    pub new_stock: Decimal,
}
