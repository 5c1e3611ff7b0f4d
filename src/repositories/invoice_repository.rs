use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::dto::invoice_dto::{CreateInvoiceRequest, UpdateInvoiceRequest};
use crate::models::invoice::{Invoice, InvoiceDetail, InvoiceStats};
use crate::utils::audit::{self, ChangeLog, ChangeLogEntry};
use crate::utils::codes::{next_code, CodeKind};
use crate::utils::errors::AppError;
use crate::utils::pagination::PageParams;

const DETAIL_SELECT: &str = r#"
    SELECT
        i.*,
        c.company_name,
        c.rfc AS customer_rfc,
        c.contact_email AS customer_email,
        c.contact_phone AS customer_phone,
        it.name AS invoice_type_name,
        ist.name AS status_name,
        ist.alias AS status_alias,
        p.project_name,
        p.project_number,
        u.username AS created_by_name,
        um.username AS modified_by_name
    FROM invoices i
    LEFT JOIN customers c ON i.customer_id = c.id
    LEFT JOIN cat_invoice_types it ON i.invoice_type_id = it.id
    LEFT JOIN cat_invoice_statuses ist ON i.invoice_status_id = ist.id
    LEFT JOIN projects p ON i.project_id = p.id
    LEFT JOIN users u ON i.created_by = u.id
    LEFT JOIN users um ON i.modified_by = um.id
"#;

pub struct InvoiceRepository {
    pool: PgPool,
}

impl InvoiceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn push_where(builder: &mut QueryBuilder<'_, Postgres>, search: &Option<String>) {
        builder.push(" WHERE i.is_active = TRUE");
        if let Some(pattern) = search {
            builder
                .push(" AND (i.invoice_number ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR c.company_name ILIKE ")
                .push_bind(pattern.clone())
                .push(")");
        }
    }

    pub async fn list(
        &self,
        params: &PageParams,
        search: Option<String>,
    ) -> Result<(Vec<InvoiceDetail>, i64), AppError> {
        let mut query = QueryBuilder::new(DETAIL_SELECT);
        Self::push_where(&mut query, &search);
        query
            .push(" ORDER BY i.created_date DESC LIMIT ")
            .push_bind(params.limit)
            .push(" OFFSET ")
            .push_bind(params.offset());
        let invoices = query.build_query_as::<InvoiceDetail>().fetch_all(&self.pool).await?;

        let mut count =
            QueryBuilder::new("SELECT COUNT(*) FROM invoices i LEFT JOIN customers c ON i.customer_id = c.id");
        Self::push_where(&mut count, &search);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        Ok((invoices, total))
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<InvoiceDetail>, AppError> {
        let sql = format!("{} WHERE i.id = $1 AND i.is_active = TRUE", DETAIL_SELECT);
        let invoice = sqlx::query_as::<_, InvoiceDetail>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(invoice)
    }

    pub async fn stats(&self) -> Result<InvoiceStats, AppError> {
        let stats = sqlx::query_as::<_, InvoiceStats>(
            r#"
            SELECT
                COUNT(*) AS total_invoices,
                COUNT(*) FILTER (WHERE ist.alias = 'paid') AS paid_invoices,
                COUNT(*) FILTER (WHERE ist.alias = 'pending') AS pending_invoices,
                COUNT(*) FILTER (WHERE ist.alias = 'overdue') AS overdue_invoices,
                COUNT(*) FILTER (WHERE ist.alias = 'cancelled') AS cancelled_invoices,
                COALESCE(SUM(i.total_amount), 0) AS total_amount,
                COALESCE(SUM(i.total_amount) FILTER (WHERE ist.alias = 'paid'), 0) AS paid_amount,
                COALESCE(SUM(i.total_amount) FILTER (WHERE ist.alias = 'pending'), 0) AS pending_amount,
                COALESCE(SUM(i.total_amount) FILTER (WHERE ist.alias = 'overdue'), 0) AS overdue_amount,
                COALESCE(ROUND(AVG(i.total_amount), 2), 0) AS average_invoice_amount
            FROM invoices i
            LEFT JOIN cat_invoice_statuses ist ON i.invoice_status_id = ist.id
            WHERE i.is_active = TRUE
            "#,
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(stats)
    }

    /// Inserta la factura; el número se calcula en la misma transacción
    pub async fn create(&self, request: &CreateInvoiceRequest, user_id: i32) -> Result<Invoice, AppError> {
        let mut tx = self.pool.begin().await?;

        let invoice_number = match request.invoice_number.as_deref() {
            Some(number) => number.to_string(),
            None => next_code(&mut tx, CodeKind::Invoice).await?,
        };
        let (subtotal, tax_amount, total_amount) = request.amounts();

        let invoice = sqlx::query_as::<_, Invoice>(
            r#"
            INSERT INTO invoices (invoice_number, invoice_type_id, invoice_status_id, customer_id,
                                  project_id, invoice_date, due_date, subtotal, tax_amount,
                                  total_amount, notes, created_by, modified_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $12)
            RETURNING *
            "#,
        )
        .bind(invoice_number)
        .bind(request.invoice_type_id)
        .bind(request.invoice_status_id)
        .bind(request.customer_id)
        .bind(request.project_id)
        .bind(request.invoice_date)
        .bind(request.due_date)
        .bind(subtotal)
        .bind(tax_amount)
        .bind(total_amount)
        .bind(request.notes.as_deref())
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(invoice)
    }

    /// Merge parcial con bitácora de campos cambiados en `invoices_log`
    pub async fn update(
        &self,
        id: i32,
        request: &UpdateInvoiceRequest,
        user_id: i32,
    ) -> Result<Option<Invoice>, AppError> {
        let mut tx = self.pool.begin().await?;

        let before = sqlx::query_as::<_, Invoice>(
            "SELECT * FROM invoices WHERE id = $1 AND is_active = TRUE FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some(before) = before else {
            return Ok(None);
        };

        let after = sqlx::query_as::<_, Invoice>(
            r#"
            UPDATE invoices SET
                invoice_number = COALESCE($2, invoice_number),
                invoice_type_id = COALESCE($3, invoice_type_id),
                invoice_status_id = COALESCE($4, invoice_status_id),
                customer_id = COALESCE($5, customer_id),
                project_id = COALESCE($6, project_id),
                invoice_date = COALESCE($7, invoice_date),
                due_date = COALESCE($8, due_date),
                subtotal = COALESCE($9, subtotal),
                tax_amount = COALESCE($10, tax_amount),
                total_amount = COALESCE($11, total_amount),
                notes = COALESCE($12, notes),
                modified_by = $13,
                modified_date = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(request.invoice_number.as_deref())
        .bind(request.invoice_type_id)
        .bind(request.invoice_status_id)
        .bind(request.customer_id)
        .bind(request.project_id)
        .bind(request.invoice_date)
        .bind(request.due_date)
        .bind(request.subtotal)
        .bind(request.tax_amount)
        .bind(request.total_amount)
        .bind(request.notes.as_deref())
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        let changes = audit::diff(&before, &after);
        audit::insert_changes(&mut tx, ChangeLog::Invoices, id, user_id, &changes).await?;

        tx.commit().await?;
        Ok(Some(after))
    }

    pub async fn soft_delete(&self, id: i32, user_id: i32) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE invoices SET is_active = FALSE, modified_by = $2, modified_date = NOW() WHERE id = $1 AND is_active = TRUE",
        )
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn history(&self, id: i32) -> Result<Vec<ChangeLogEntry>, AppError> {
        let mut conn = self.pool.acquire().await?;
        audit::list_changes(&mut conn, ChangeLog::Invoices, id).await
    }
}
