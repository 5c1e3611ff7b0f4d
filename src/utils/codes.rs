//! Códigos secuenciales `PREFIX-NNNNNN`
//!
//! El siguiente valor es el sufijo del último código + 1, leído dentro de la
//! transacción que inserta. Dos transacciones concurrentes pueden leer el mismo máximo; la
//! restricción UNIQUE de cada columna de código convierte ese caso en un error
//! de duplicado.

use lazy_static::lazy_static;
use regex::Regex;
use sqlx::{PgConnection, Postgres, QueryBuilder};

use crate::utils::errors::AppResult;

/// Entidades con código secuencial: (prefijo, tabla, columna)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeKind {
    FuelRequisition,
    Timesheet,
    Material,
    Invoice,
    Project,
    PurchaseOrder,
    InventoryTransaction,
    PreInventory,
}

impl CodeKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            CodeKind::FuelRequisition => "FR-",
            CodeKind::Timesheet => "TS-",
            CodeKind::Material => "MAT-",
            CodeKind::Invoice => "INV-",
            CodeKind::Project => "PRJ-",
            CodeKind::PurchaseOrder => "PO-",
            CodeKind::InventoryTransaction => "TRX-",
            CodeKind::PreInventory => "PINV-",
        }
    }

    fn table(&self) -> &'static str {
        match self {
            CodeKind::FuelRequisition => "fuel_requisitions",
            CodeKind::Timesheet => "labor_timesheets",
            CodeKind::Material => "materials",
            CodeKind::Invoice => "invoices",
            CodeKind::Project => "projects",
            CodeKind::PurchaseOrder => "purchase_orders",
            CodeKind::InventoryTransaction => "inventory_transactions",
            CodeKind::PreInventory => "pre_inventory",
        }
    }

    fn column(&self) -> &'static str {
        match self {
            CodeKind::FuelRequisition => "requisition_code",
            CodeKind::Timesheet => "timesheet_code",
            CodeKind::Material => "material_code",
            CodeKind::Invoice => "invoice_number",
            CodeKind::Project => "project_number",
            CodeKind::PurchaseOrder => "po_number",
            CodeKind::InventoryTransaction => "transaction_number",
            CodeKind::PreInventory => "pre_inventory_number",
        }
    }
}

lazy_static! {
    static ref CODE_RE: Regex = Regex::new(r"^([A-Z]+-)(\d+)$").unwrap();
}

/// `FR-` + 1 → `FR-000001`
pub fn format_code(prefix: &str, number: i64) -> String {
    format!("{}{:06}", prefix, number)
}

/// Sufijo numérico de un código con el prefijo dado
pub fn parse_code(prefix: &str, code: &str) -> Option<i64> {
    let caps = CODE_RE.captures(code)?;
    if &caps[1] != prefix {
        return None;
    }
    caps[2].parse().ok()
}

/// Siguiente número libre para `kind`, leído con la conexión de la transacción
///
/// El último código se elige por longitud y luego por texto, así
/// `TRX-1000000` queda por encima de `TRX-999999`.
pub async fn next_number(conn: &mut PgConnection, kind: CodeKind) -> AppResult<i64> {
    let prefix = kind.prefix();
    let mut query: QueryBuilder<Postgres> = QueryBuilder::new("SELECT ");
    query
        .push(kind.column())
        .push(" FROM ")
        .push(kind.table())
        .push(" WHERE ")
        .push(kind.column())
        .push(" ~ ")
        .push_bind(format!("^{}[0-9]+$", prefix))
        .push(" ORDER BY LENGTH(")
        .push(kind.column())
        .push(") DESC, ")
        .push(kind.column())
        .push(" DESC LIMIT 1");

    let last: Option<String> = query.build_query_scalar().fetch_optional(&mut *conn).await?;
    Ok(last.as_deref().and_then(|code| parse_code(prefix, code)).unwrap_or(0) + 1)
}

/// Siguiente código formateado para `kind`
pub async fn next_code(conn: &mut PgConnection, kind: CodeKind) -> AppResult<String> {
    let number = next_number(conn, kind).await?;
    Ok(format_code(kind.prefix(), number))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_code() {
        assert_eq!(format_code("FR-", 1), "FR-000001");
        assert_eq!(format_code("PINV-", 42), "PINV-000042");
        assert_eq!(format_code("TRX-", 1234567), "TRX-1234567");
    }

    #[test]
    fn test_parse_code() {
        assert_eq!(parse_code("FR-", "FR-000017"), Some(17));
        assert_eq!(parse_code("FR-", "TS-000017"), None);
        assert_eq!(parse_code("PO-", "PO-ABC"), None);
        assert_eq!(parse_code("MAT-", "MAT-"), None);
    }

    #[test]
    fn test_prefixes_are_distinct() {
        let kinds = [
            CodeKind::FuelRequisition,
            CodeKind::Timesheet,
            CodeKind::Material,
            CodeKind::Invoice,
            CodeKind::Project,
            CodeKind::PurchaseOrder,
            CodeKind::InventoryTransaction,
            CodeKind::PreInventory,
        ];
        let mut prefixes: Vec<&str> = kinds.iter().map(|k| k.prefix()).collect();
        prefixes.sort_unstable();
        prefixes.dedup();
        assert_eq!(prefixes.len(), kinds.len());
    }

    #[test]
    fn test_format_then_parse_next() {
        let last = format_code(CodeKind::Invoice.prefix(), 9);
        let next = parse_code("INV-", &last).map(|n| n + 1).unwrap();
        assert_eq!(format_code("INV-", next), "INV-000010");
    }
}
