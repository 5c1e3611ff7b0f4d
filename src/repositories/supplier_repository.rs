use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::dto::supplier_dto::{CreateSupplierRequest, UpdateSupplierRequest};
use crate::models::supplier::{
    Supplier, SupplierCategory, SupplierDetail, SupplierStats, SupplierSummary, SuppliersByCategory,
    TopSupplier,
};
use crate::utils::errors::AppError;
use crate::utils::pagination::PageParams;

pub struct SupplierRepository {
    pool: PgPool,
}

impl SupplierRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn push_where(builder: &mut QueryBuilder<'_, Postgres>, search: &Option<String>, category_id: Option<i32>) {
        builder.push(" WHERE s.is_active = TRUE");
        if let Some(pattern) = search {
            builder
                .push(" AND (s.supplier_name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR s.contact_name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR s.email ILIKE ")
                .push_bind(pattern.clone())
                .push(")");
        }
        if let Some(category_id) = category_id {
            builder.push(" AND s.supplier_category_id = ").push_bind(category_id);
        }
    }

    pub async fn list(
        &self,
        params: &PageParams,
        search: Option<String>,
        category_id: Option<i32>,
    ) -> Result<(Vec<SupplierSummary>, i64), AppError> {
        let mut query = QueryBuilder::new(
            r#"
            SELECT
                s.*,
                sc.name AS category_name,
                u.username AS created_by_name,
                (SELECT COUNT(*) FROM purchase_orders po
                 WHERE po.supplier_id = s.id AND po.is_active = TRUE) AS purchase_orders_count
            FROM suppliers s
            LEFT JOIN cat_supplier_categories sc ON s.supplier_category_id = sc.id
            LEFT JOIN users u ON s.created_by = u.id
            "#,
        );
        Self::push_where(&mut query, &search, category_id);
        query
            .push(" ORDER BY s.supplier_name ASC LIMIT ")
            .push_bind(params.limit)
            .push(" OFFSET ")
            .push_bind(params.offset());
        let suppliers = query.build_query_as::<SupplierSummary>().fetch_all(&self.pool).await?;

        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM suppliers s");
        Self::push_where(&mut count, &search, category_id);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        Ok((suppliers, total))
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<SupplierDetail>, AppError> {
        let supplier = sqlx::query_as::<_, SupplierDetail>(
            r#"
            SELECT
                s.*,
                sc.name AS category_name,
                uc.username AS created_by_name,
                um.username AS modified_by_name,
                (SELECT COUNT(*) FROM purchase_orders po
                 WHERE po.supplier_id = s.id AND po.is_active = TRUE) AS purchase_orders_count,
                (SELECT COALESCE(SUM(po.total_amount), 0) FROM purchase_orders po
                 WHERE po.supplier_id = s.id AND po.is_active = TRUE) AS total_purchases
            FROM suppliers s
            LEFT JOIN cat_supplier_categories sc ON s.supplier_category_id = sc.id
            LEFT JOIN users uc ON s.created_by = uc.id
            LEFT JOIN users um ON s.modified_by = um.id
            WHERE s.id = $1 AND s.is_active = TRUE
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(supplier)
    }

    pub async fn exists(&self, id: i32) -> Result<bool, AppError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM suppliers WHERE id = $1 AND is_active = TRUE)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    pub async fn stats(&self) -> Result<SupplierStats, AppError> {
        let total_suppliers: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM suppliers WHERE is_active = TRUE")
            .fetch_one(&self.pool)
            .await?;

        let suppliers_by_category = sqlx::query_as::<_, SuppliersByCategory>(
            r#"
            SELECT sc.name AS category_name, COUNT(*) AS count
            FROM suppliers s
            LEFT JOIN cat_supplier_categories sc ON s.supplier_category_id = sc.id
            WHERE s.is_active = TRUE
            GROUP BY sc.id, sc.name
            ORDER BY count DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let top_suppliers = sqlx::query_as::<_, TopSupplier>(
            r#"
            SELECT
                s.id,
                s.supplier_name,
                COUNT(po.id) AS total_orders,
                COALESCE(SUM(po.total_amount), 0) AS total_amount
            FROM suppliers s
            LEFT JOIN purchase_orders po ON s.id = po.supplier_id AND po.is_active = TRUE
            WHERE s.is_active = TRUE
            GROUP BY s.id, s.supplier_name
            ORDER BY total_amount DESC
            LIMIT 5
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(SupplierStats {
            total_suppliers,
            suppliers_by_category,
            top_suppliers,
        })
    }

    pub async fn categories(&self) -> Result<Vec<SupplierCategory>, AppError> {
        let categories = sqlx::query_as::<_, SupplierCategory>(
            "SELECT id, name, alias, description FROM cat_supplier_categories ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(categories)
    }

    pub async fn create(&self, request: &CreateSupplierRequest, user_id: i32) -> Result<Supplier, AppError> {
        let supplier = sqlx::query_as::<_, Supplier>(
            r#"
            INSERT INTO suppliers (supplier_name, supplier_category_id, contact_name, phone, email,
                                   address, payment_terms, created_by, modified_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            RETURNING *
            "#,
        )
        .bind(request.supplier_name.as_deref().map(str::trim))
        .bind(request.supplier_category_id)
        .bind(request.contact_name.as_deref())
        .bind(request.phone.as_deref())
        .bind(request.email.as_deref())
        .bind(request.address.as_deref())
        .bind(request.payment_terms.as_deref())
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(supplier)
    }

    pub async fn update(
        &self,
        id: i32,
        request: &UpdateSupplierRequest,
        user_id: i32,
    ) -> Result<Option<Supplier>, AppError> {
        let supplier = sqlx::query_as::<_, Supplier>(
            r#"
            UPDATE suppliers SET
                supplier_name = COALESCE($2, supplier_name),
                supplier_category_id = COALESCE($3, supplier_category_id),
                contact_name = COALESCE($4, contact_name),
                phone = COALESCE($5, phone),
                email = COALESCE($6, email),
                address = COALESCE($7, address),
                payment_terms = COALESCE($8, payment_terms),
                modified_by = $9,
                modified_date = NOW()
            WHERE id = $1 AND is_active = TRUE
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(request.supplier_name.as_deref())
        .bind(request.supplier_category_id)
        .bind(request.contact_name.as_deref())
        .bind(request.phone.as_deref())
        .bind(request.email.as_deref())
        .bind(request.address.as_deref())
        .bind(request.payment_terms.as_deref())
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(supplier)
    }

    /// Órdenes activas que no están recibidas (5) ni canceladas (6)
    pub async fn open_purchase_orders(&self, id: i32) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM purchase_orders WHERE supplier_id = $1 AND is_active = TRUE AND po_status_id NOT IN (5, 6)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    pub async fn soft_delete(&self, id: i32, user_id: i32) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE suppliers SET is_active = FALSE, modified_by = $2, modified_date = NOW() WHERE id = $1 AND is_active = TRUE",
        )
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
