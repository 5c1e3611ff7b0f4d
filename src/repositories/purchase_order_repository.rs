use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};

use crate::dto::purchase_order_dto::{
    compute_totals, CreatePurchaseOrderRequest, PurchaseOrderItemRequest, ReceiveItemRequest,
    UpdatePurchaseOrderRequest,
};
use crate::models::purchase_order::{
    CreatedPurchaseOrder, PoStatus, PurchaseOrder, PurchaseOrderDetail, PurchaseOrderItem,
    PurchaseOrderItemDetail, PurchaseOrderStats, PurchaseOrderSummary, PurchaseOrderWithItems,
};
use crate::repositories::inventory_repository::{apply_stock_delta, lock_material_stock};
use crate::repositories::push_date_range;
use crate::utils::codes::{next_code, CodeKind};
use crate::utils::errors::{not_found_error, AppError};
use crate::utils::pagination::PageParams;

pub const SUMMARY_SELECT: &str = r#"
    SELECT
        po.*,
        s.supplier_name,
        s.contact_name AS supplier_contact,
        s.phone AS supplier_phone,
        s.email AS supplier_email,
        pos.name AS status_name,
        pos.alias AS status_alias,
        u.username AS created_by_name,
        (SELECT COUNT(*) FROM purchase_order_items WHERE purchase_order_id = po.id) AS items_count
    FROM purchase_orders po
    LEFT JOIN suppliers s ON po.supplier_id = s.id
    LEFT JOIN cat_purchase_order_statuses pos ON po.po_status_id = pos.id
    LEFT JOIN users u ON po.created_by = u.id
"#;

#[derive(Debug, Default)]
pub struct PurchaseOrderCriteria {
    pub search: Option<String>,
    pub status_id: Option<i32>,
    pub supplier_id: Option<i32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

pub struct PurchaseOrderRepository {
    pool: PgPool,
}

impl PurchaseOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn push_where(builder: &mut QueryBuilder<'_, Postgres>, criteria: &PurchaseOrderCriteria) {
        builder.push(" WHERE po.is_active = TRUE");
        if let Some(pattern) = &criteria.search {
            builder
                .push(" AND (po.po_number ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR s.supplier_name ILIKE ")
                .push_bind(pattern.clone())
                .push(")");
        }
        if let Some(status_id) = criteria.status_id {
            builder.push(" AND po.po_status_id = ").push_bind(status_id);
        }
        if let Some(supplier_id) = criteria.supplier_id {
            builder.push(" AND po.supplier_id = ").push_bind(supplier_id);
        }
        push_date_range(builder, "po.order_date", criteria.start_date, criteria.end_date);
    }

    pub async fn list(
        &self,
        params: &PageParams,
        criteria: &PurchaseOrderCriteria,
    ) -> Result<(Vec<PurchaseOrderSummary>, i64), AppError> {
        let mut query = QueryBuilder::new(SUMMARY_SELECT);
        Self::push_where(&mut query, criteria);
        query
            .push(" ORDER BY po.order_date DESC, po.po_number DESC LIMIT ")
            .push_bind(params.limit)
            .push(" OFFSET ")
            .push_bind(params.offset());
        let orders = query.build_query_as::<PurchaseOrderSummary>().fetch_all(&self.pool).await?;

        let mut count =
            QueryBuilder::new("SELECT COUNT(*) FROM purchase_orders po LEFT JOIN suppliers s ON po.supplier_id = s.id");
        Self::push_where(&mut count, criteria);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        Ok((orders, total))
    }

    pub async fn find_with_items(&self, id: i32) -> Result<Option<PurchaseOrderWithItems>, AppError> {
        let order = sqlx::query_as::<_, PurchaseOrderDetail>(
            r#"
            SELECT
                po.*,
                s.supplier_name,
                s.contact_name AS supplier_contact,
                s.phone AS supplier_phone,
                s.email AS supplier_email,
                pos.name AS status_name,
                pos.alias AS status_alias,
                uc.username AS created_by_name,
                um.username AS modified_by_name
            FROM purchase_orders po
            LEFT JOIN suppliers s ON po.supplier_id = s.id
            LEFT JOIN cat_purchase_order_statuses pos ON po.po_status_id = pos.id
            LEFT JOIN users uc ON po.created_by = uc.id
            LEFT JOIN users um ON po.modified_by = um.id
            WHERE po.id = $1 AND po.is_active = TRUE
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        let Some(order) = order else {
            return Ok(None);
        };

        let items = sqlx::query_as::<_, PurchaseOrderItemDetail>(
            r#"
            SELECT
                poi.*,
                m.material_code,
                m.material_name,
                uom.name AS unit_of_measure,
                mc.name AS category_name
            FROM purchase_order_items poi
            LEFT JOIN materials m ON poi.material_id = m.id
            LEFT JOIN cat_unit_of_measure uom ON m.unit_of_measure_id = uom.id
            LEFT JOIN cat_material_categories mc ON m.category_id = mc.id
            WHERE poi.purchase_order_id = $1
            ORDER BY poi.id ASC
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(PurchaseOrderWithItems { order, items }))
    }

    pub async fn stats(&self) -> Result<PurchaseOrderStats, AppError> {
        let stats = sqlx::query_as::<_, PurchaseOrderStats>(
            r#"
            SELECT
                COUNT(*) AS total_orders,
                COUNT(*) FILTER (WHERE po_status_id = 1) AS draft,
                COUNT(*) FILTER (WHERE po_status_id = 2) AS pending_approval,
                COUNT(*) FILTER (WHERE po_status_id = 3) AS approved,
                COUNT(*) FILTER (WHERE po_status_id = 4) AS partially_received,
                COUNT(*) FILTER (WHERE po_status_id = 5) AS received,
                COUNT(*) FILTER (WHERE po_status_id = 6) AS cancelled,
                COALESCE(SUM(total_amount), 0) AS total_amount,
                COALESCE(SUM(total_amount) FILTER (WHERE po_status_id IN (3, 4, 5)), 0) AS approved_amount
            FROM purchase_orders
            WHERE is_active = TRUE
            "#,
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(stats)
    }

    async fn insert_items(
        conn: &mut PgConnection,
        order_id: i32,
        items: &[PurchaseOrderItemRequest],
    ) -> Result<(), AppError> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO purchase_order_items (purchase_order_id, material_id, quantity, unit_price, subtotal) ",
        );
        builder.push_values(items, |mut row, item| {
            row.push_bind(order_id)
                .push_bind(item.material_id)
                .push_bind(item.quantity)
                .push_bind(item.unit_price)
                .push_bind(item.subtotal());
        });
        builder.build().execute(&mut *conn).await?;
        Ok(())
    }

    /// Cabecera en borrador y partidas en una sola transacción
    pub async fn create(
        &self,
        request: &CreatePurchaseOrderRequest,
        items: &[PurchaseOrderItemRequest],
        user_id: i32,
    ) -> Result<CreatedPurchaseOrder, AppError> {
        let mut tx = self.pool.begin().await?;

        let po_number = next_code(&mut tx, CodeKind::PurchaseOrder).await?;
        let (subtotal, tax_amount, total_amount) = compute_totals(items);

        let order = sqlx::query_as::<_, PurchaseOrder>(
            r#"
            INSERT INTO purchase_orders (po_number, supplier_id, project_id, po_status_id, order_date,
                                         expected_delivery_date, subtotal, tax_amount, total_amount,
                                         notes, created_by, modified_by)
            VALUES ($1, $2, $3, $4, COALESCE($5, CURRENT_DATE), $6, $7, $8, $9, $10, $11, $11)
            RETURNING *
            "#,
        )
        .bind(&po_number)
        .bind(request.supplier_id)
        .bind(request.project_id)
        .bind(PoStatus::Draft.id())
        .bind(request.order_date)
        .bind(request.expected_delivery_date)
        .bind(subtotal)
        .bind(tax_amount)
        .bind(total_amount)
        .bind(request.notes.as_deref())
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        Self::insert_items(&mut tx, order.id, items).await?;

        tx.commit().await?;
        Ok(CreatedPurchaseOrder {
            id: order.id,
            po_number,
        })
    }

    pub async fn lock(conn: &mut PgConnection, id: i32) -> Result<Option<PurchaseOrder>, AppError> {
        let order = sqlx::query_as::<_, PurchaseOrder>(
            "SELECT * FROM purchase_orders WHERE id = $1 AND is_active = TRUE FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
        Ok(order)
    }

    /// Actualiza la cabecera; `check` decide con la fila bloqueada si procede
    pub async fn update<F>(
        &self,
        id: i32,
        request: &UpdatePurchaseOrderRequest,
        user_id: i32,
        check: F,
    ) -> Result<PurchaseOrder, AppError>
    where
        F: FnOnce(&PurchaseOrder) -> Result<(), AppError>,
    {
        let mut tx = self.pool.begin().await?;

        let current = Self::lock(&mut tx, id)
            .await?
            .ok_or_else(|| not_found_error("Purchase order"))?;
        check(&current)?;

        let (subtotal, tax_amount, total_amount) = match request.items.as_deref() {
            Some(items) if !items.is_empty() => {
                sqlx::query("DELETE FROM purchase_order_items WHERE purchase_order_id = $1")
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;
                Self::insert_items(&mut tx, id, items).await?;
                compute_totals(items)
            }
            _ => (current.subtotal, current.tax_amount, current.total_amount),
        };

        let order = sqlx::query_as::<_, PurchaseOrder>(
            r#"
            UPDATE purchase_orders SET
                supplier_id = COALESCE($2, supplier_id),
                project_id = COALESCE($3, project_id),
                order_date = COALESCE($4, order_date),
                expected_delivery_date = COALESCE($5, expected_delivery_date),
                notes = COALESCE($6, notes),
                subtotal = $7,
                tax_amount = $8,
                total_amount = $9,
                modified_by = $10,
                modified_date = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(request.supplier_id)
        .bind(request.project_id)
        .bind(request.order_date)
        .bind(request.expected_delivery_date)
        .bind(request.notes.as_deref())
        .bind(subtotal)
        .bind(tax_amount)
        .bind(total_amount)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(order)
    }

    pub async fn set_status(&self, id: i32, status: PoStatus, user_id: i32) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE purchase_orders SET po_status_id = $2, modified_by = $3, modified_date = NOW() WHERE id = $1 AND is_active = TRUE",
        )
        .bind(id)
        .bind(status.id())
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn soft_delete(&self, id: i32, user_id: i32) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE purchase_orders SET is_active = FALSE, modified_by = $2, modified_date = NOW() WHERE id = $1 AND is_active = TRUE",
        )
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Registra cantidades recibidas y suma al stock global de cada material.
    ///
    /// La orden, cada partida y cada material se bloquean antes de escribir.
    /// `check` valida el estado de la orden bloqueada; cualquier error deshace
    /// la transacción completa.
    pub async fn receive<F>(
        &self,
        id: i32,
        items: &[ReceiveItemRequest],
        user_id: i32,
        check: F,
    ) -> Result<PoStatus, AppError>
    where
        F: FnOnce(&PurchaseOrder) -> Result<(), AppError>,
    {
        let mut tx = self.pool.begin().await?;

        let order = Self::lock(&mut tx, id)
            .await?
            .ok_or_else(|| not_found_error("Purchase order"))?;
        check(&order)?;

        for received in items {
            let item = sqlx::query_as::<_, PurchaseOrderItem>(
                "SELECT * FROM purchase_order_items WHERE id = $1 AND purchase_order_id = $2 FOR UPDATE",
            )
            .bind(received.item_id)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
            let Some(item) = item else {
                return Err(AppError::BadRequest(format!(
                    "Item {} does not belong to this purchase order",
                    received.item_id
                )));
            };
            if item.received_quantity + received.received_quantity > item.quantity {
                return Err(AppError::BadRequest(format!(
                    "Cannot receive more than the outstanding quantity for item {}",
                    item.id
                )));
            }

            sqlx::query("UPDATE purchase_order_items SET received_quantity = received_quantity + $2 WHERE id = $1")
                .bind(item.id)
                .bind(received.received_quantity)
                .execute(&mut *tx)
                .await?;

            lock_material_stock(&mut tx, item.material_id).await?;
            apply_stock_delta(&mut tx, item.material_id, received.received_quantity, user_id).await?;
        }

        let lines: Vec<(Decimal, Decimal)> = sqlx::query_as(
            "SELECT quantity, received_quantity FROM purchase_order_items WHERE purchase_order_id = $1",
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;
        let status = status_after_receipt(&lines);

        sqlx::query(
            r#"
            UPDATE purchase_orders SET
                po_status_id = $2,
                actual_delivery_date = CASE WHEN $2 = 5 THEN CURRENT_DATE ELSE actual_delivery_date END,
                modified_by = $3,
                modified_date = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(status.id())
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(status)
    }
}

/// Recibida cuando toda partida está completa, parcial en otro caso
pub fn status_after_receipt(lines: &[(Decimal, Decimal)]) -> PoStatus {
    let complete = lines.iter().all(|(quantity, received)| received >= quantity);
    if complete {
        PoStatus::Received
    } else {
        PoStatus::PartiallyReceived
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_after_receipt() {
        let ten = Decimal::new(10, 0);
        assert_eq!(status_after_receipt(&[(ten, ten), (ten, ten)]), PoStatus::Received);
        assert_eq!(
            status_after_receipt(&[(ten, ten), (ten, Decimal::new(4, 0))]),
            PoStatus::PartiallyReceived
        );
        assert_eq!(status_after_receipt(&[(ten, Decimal::ZERO)]), PoStatus::PartiallyReceived);
    }
}
