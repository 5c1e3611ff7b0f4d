//! Repositorios: acceso a PostgreSQL con sqlx

use chrono::NaiveDate;
use sqlx::{Postgres, QueryBuilder};

pub mod catalog_repository;
pub mod chatter_repository;
pub mod customer_repository;
pub mod file_repository;
pub mod fuel_requisition_repository;
pub mod inventory_repository;
pub mod invoice_repository;
pub mod labor_repository;
pub mod material_repository;
pub mod note_repository;
pub mod pre_inventory_repository;
pub mod project_repository;
pub mod purchase_order_repository;
pub mod supplier_repository;
pub mod user_repository;
pub mod warehouse_repository;

/// Rango de fechas inclusivo sobre una columna DATE o TIMESTAMPTZ
pub(crate) fn push_date_range(
    builder: &mut QueryBuilder<'_, Postgres>,
    column: &str,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) {
    if let Some(start) = start {
        builder.push(format!(" AND {} >= ", column)).push_bind(start);
    }
    if let Some(end) = end {
        builder
            .push(format!(" AND {} < ", column))
            .push_bind(end)
            .push(" + 1");
    }
}
