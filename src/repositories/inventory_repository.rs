//! Escrituras del kardex compartidas por almacén, pre-inventario y compras
//!
//! Todas las funciones reciben la conexión de una transacción abierta. El
//! llamador toma el bloqueo del material con [`lock_material_stock`] antes de
//! leer existencias o escribir movimientos.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{FromRow, PgConnection};

use crate::models::warehouse::InventoryTransaction;
use crate::utils::errors::AppResult;

/// Costo y stock global de un material bloqueado
#[derive(Debug, Clone, Copy, FromRow)]
pub struct MaterialStock {
    pub unit_cost: Decimal,
    pub current_stock: Decimal,
}

/// Movimiento a insertar; `quantity` ya lleva su signo
#[derive(Debug, Clone)]
pub struct NewTransaction<'a> {
    pub transaction_number: String,
    pub material_id: i32,
    pub transaction_type_id: i32,
    pub warehouse_location_id: i32,
    pub quantity: Decimal,
    pub unit_cost: Decimal,
    pub project_id: Option<i32>,
    pub purchase_order_id: Option<i32>,
    pub reference_number: Option<&'a str>,
    pub notes: Option<String>,
    pub transaction_date: Option<NaiveDate>,
    pub created_by: i32,
}

/// `SELECT ... FOR UPDATE` sobre el material activo
pub async fn lock_material_stock(conn: &mut PgConnection, material_id: i32) -> AppResult<Option<MaterialStock>> {
    let stock = sqlx::query_as::<_, MaterialStock>(
        "SELECT unit_cost, current_stock FROM materials WHERE id = $1 AND is_active = TRUE FOR UPDATE",
    )
    .bind(material_id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(stock)
}

pub async fn insert_transaction(
    conn: &mut PgConnection,
    movement: &NewTransaction<'_>,
) -> AppResult<InventoryTransaction> {
    let transaction = sqlx::query_as::<_, InventoryTransaction>(
        r#"
        INSERT INTO inventory_transactions (transaction_number, material_id, transaction_type_id,
                                            warehouse_location_id, quantity, unit_cost, total_value,
                                            project_id, purchase_order_id, reference_number, notes,
                                            transaction_date, created_by)
        VALUES ($1, $2, $3, $4, $5, $6, $5 * $6, $7, $8, $9, $10,
                COALESCE($11::timestamptz, NOW()), $12)
        RETURNING *
        "#,
    )
    .bind(&movement.transaction_number)
    .bind(movement.material_id)
    .bind(movement.transaction_type_id)
    .bind(movement.warehouse_location_id)
    .bind(movement.quantity)
    .bind(movement.unit_cost)
    .bind(movement.project_id)
    .bind(movement.purchase_order_id)
    .bind(movement.reference_number)
    .bind(movement.notes.as_deref())
    .bind(movement.transaction_date)
    .bind(movement.created_by)
    .fetch_one(&mut *conn)
    .await?;
    Ok(transaction)
}

/// Suma `delta` a `materials.current_stock` y devuelve el nuevo total
pub async fn apply_stock_delta(
    conn: &mut PgConnection,
    material_id: i32,
    delta: Decimal,
    user_id: i32,
) -> AppResult<Decimal> {
    let new_stock: Decimal = sqlx::query_scalar(
        r#"
        UPDATE materials
        SET current_stock = current_stock + $2, modified_by = $3, modified_date = NOW()
        WHERE id = $1
        RETURNING current_stock
        "#,
    )
    .bind(material_id)
    .bind(delta)
    .bind(user_id)
    .fetch_one(&mut *conn)
    .await?;
    Ok(new_stock)
}
