//! Modelo de Material
//!
//! `current_stock` es el total global; el stock por ubicación se deriva del
//! kardex (`inventory_transactions`).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Material {
    pub id: i32,
    pub material_code: String,
    pub material_name: String,
    pub category_id: Option<i32>,
    pub unit_of_measure_id: Option<i32>,
    pub unit_cost: Decimal,
    pub minimum_stock: Decimal,
    pub current_stock: Decimal,
    pub reorder_point: Decimal,
    pub description: Option<String>,
    pub created_by: Option<i32>,
    pub modified_by: Option<i32>,
    pub created_date: DateTime<Utc>,
    pub modified_date: DateTime<Utc>,
    pub is_active: bool,
}

/// Material con categoría, unidad y usuarios resueltos
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MaterialDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub material: Material,
    pub category_name: Option<String>,
    pub unit_name: Option<String>,
    pub unit_alias: Option<String>,
    pub created_by_name: Option<String>,
    pub modified_by_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct LowStockMaterial {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub material: Material,
    pub category_name: Option<String>,
    pub unit_name: Option<String>,
    pub stock_deficit: Decimal,
}

#[derive(Debug, Serialize, FromRow)]
pub struct MaterialTotals {
    pub total_materials: i64,
    pub total_inventory_value: Decimal,
    pub low_stock_count: i64,
    pub out_of_stock_count: i64,
    pub average_stock_level: Decimal,
}

#[derive(Debug, Serialize, FromRow)]
pub struct MaterialsByCategory {
    pub category_name: Option<String>,
    pub count: i64,
    pub category_value: Decimal,
}

#[derive(Debug, Serialize)]
pub struct MaterialStats {
    #[serde(flatten)]
    pub totals: MaterialTotals,
    pub materials_by_category: Vec<MaterialsByCategory>,
}
