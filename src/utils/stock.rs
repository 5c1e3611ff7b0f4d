//! Reglas de signo del kardex
//!
//! Las cantidades se guardan con signo. Las entradas suman, las salidas
//! restan, ajustes y tramos de transferencia llevan su propio signo.

use rust_decimal::Decimal;
use sqlx::PgConnection;

use crate::utils::errors::{AppError, AppResult};

pub const TYPE_ENTRY: i32 = 1;
pub const TYPE_EXIT: i32 = 2;
pub const TYPE_ADJUSTMENT: i32 = 3;
pub const TYPE_TRANSFER: i32 = 4;

/// Expresión SQL del efecto de una fila `it` (con `tt` = tipo) sobre el stock
pub const SIGNED_QUANTITY_SQL: &str = "CASE tt.alias \
     WHEN 'entry' THEN ABS(it.quantity) \
     WHEN 'exit' THEN -ABS(it.quantity) \
     ELSE it.quantity END";

/// Tipos de movimiento aceptados en un ajuste manual
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementType {
    Entry,
    Exit,
    Adjustment,
}

impl MovementType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "entry" => Some(MovementType::Entry),
            "exit" => Some(MovementType::Exit),
            "adjustment" => Some(MovementType::Adjustment),
            _ => None,
        }
    }

    pub fn type_id(&self) -> i32 {
        match self {
            MovementType::Entry => TYPE_ENTRY,
            MovementType::Exit => TYPE_EXIT,
            MovementType::Adjustment => TYPE_ADJUSTMENT,
        }
    }

    /// Cantidad como se guarda en el kardex
    pub fn signed(&self, quantity: Decimal) -> Decimal {
        match self {
            MovementType::Entry => quantity.abs(),
            MovementType::Exit => -quantity.abs(),
            MovementType::Adjustment => quantity,
        }
    }
}

/// Stock de un material en una ubicación
///
/// Dentro de una transacción el llamador toma antes el bloqueo del material;
/// todo movimiento de stock pasa por ese bloqueo, así que la lectura sigue
/// siendo válida hasta el commit.
pub async fn location_stock(conn: &mut PgConnection, material_id: i32, location_id: i32) -> AppResult<Decimal> {
    let sql = format!(
        "SELECT COALESCE(SUM({}), 0) FROM inventory_transactions it \
         JOIN cat_transaction_types tt ON tt.id = it.transaction_type_id \
         WHERE it.material_id = $1 AND it.warehouse_location_id = $2",
        SIGNED_QUANTITY_SQL
    );

    let stock: Decimal = sqlx::query_scalar(&sql)
        .bind(material_id)
        .bind(location_id)
        .fetch_one(&mut *conn)
        .await?;
    Ok(stock)
}

/// Error 400 de existencias insuficientes
pub fn insufficient_stock(available: Decimal) -> AppError {
    AppError::BadRequest(format!("Insufficient stock. Available: {}", available.normalize()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_quantities() {
        let five = Decimal::new(5, 0);
        assert_eq!(MovementType::Entry.signed(-five), five);
        assert_eq!(MovementType::Exit.signed(five), -five);
        assert_eq!(MovementType::Exit.signed(-five), -five);
        assert_eq!(MovementType::Adjustment.signed(-five), -five);
    }

    #[test]
    fn test_parse_movement_type() {
        assert_eq!(MovementType::parse("entry"), Some(MovementType::Entry));
        assert_eq!(MovementType::parse("exit").map(|t| t.type_id()), Some(TYPE_EXIT));
        assert_eq!(MovementType::parse("transfer"), None);
        assert_eq!(MovementType::parse("EXIT"), None);
    }

    #[test]
    fn test_insufficient_stock_message() {
        match insufficient_stock(Decimal::new(1250, 2)) {
            AppError::BadRequest(msg) => assert_eq!(msg, "Insufficient stock. Available: 12.5"),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
