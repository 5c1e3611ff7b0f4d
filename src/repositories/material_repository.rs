use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::dto::material_dto::{CreateMaterialRequest, UpdateMaterialRequest};
use crate::models::material::{
    LowStockMaterial, Material, MaterialDetail, MaterialStats, MaterialTotals, MaterialsByCategory,
};
use crate::utils::codes::{next_code, CodeKind};
use crate::utils::errors::AppError;
use crate::utils::pagination::PageParams;

const DETAIL_SELECT: &str = r#"
    SELECT
        m.*,
        mc.name AS category_name,
        uom.name AS unit_name,
        uom.alias AS unit_alias,
        uc.username AS created_by_name,
        um.username AS modified_by_name
    FROM materials m
    LEFT JOIN cat_material_categories mc ON m.category_id = mc.id
    LEFT JOIN cat_unit_of_measure uom ON m.unit_of_measure_id = uom.id
    LEFT JOIN users uc ON m.created_by = uc.id
    LEFT JOIN users um ON m.modified_by = um.id
"#;

pub struct MaterialRepository {
    pool: PgPool,
}

impl MaterialRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn push_where(builder: &mut QueryBuilder<'_, Postgres>, search: &Option<String>) {
        builder.push(" WHERE m.is_active = TRUE");
        if let Some(pattern) = search {
            builder
                .push(" AND (m.material_name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR m.material_code ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR m.description ILIKE ")
                .push_bind(pattern.clone())
                .push(")");
        }
    }

    pub async fn list(
        &self,
        params: &PageParams,
        search: Option<String>,
    ) -> Result<(Vec<MaterialDetail>, i64), AppError> {
        let mut query = QueryBuilder::new(DETAIL_SELECT);
        Self::push_where(&mut query, &search);
        query
            .push(" ORDER BY m.material_name ASC LIMIT ")
            .push_bind(params.limit)
            .push(" OFFSET ")
            .push_bind(params.offset());
        let materials = query.build_query_as::<MaterialDetail>().fetch_all(&self.pool).await?;

        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM materials m");
        Self::push_where(&mut count, &search);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        Ok((materials, total))
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<MaterialDetail>, AppError> {
        let sql = format!("{} WHERE m.id = $1 AND m.is_active = TRUE", DETAIL_SELECT);
        let material = sqlx::query_as::<_, MaterialDetail>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(material)
    }

    pub async fn low_stock(&self) -> Result<Vec<LowStockMaterial>, AppError> {
        let materials = sqlx::query_as::<_, LowStockMaterial>(
            r#"
            SELECT
                m.*,
                mc.name AS category_name,
                uom.name AS unit_name,
                (m.minimum_stock - m.current_stock) AS stock_deficit
            FROM materials m
            LEFT JOIN cat_material_categories mc ON m.category_id = mc.id
            LEFT JOIN cat_unit_of_measure uom ON m.unit_of_measure_id = uom.id
            WHERE m.is_active = TRUE AND m.current_stock < m.minimum_stock
            ORDER BY stock_deficit DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(materials)
    }

    pub async fn stats(&self) -> Result<MaterialStats, AppError> {
        let totals = sqlx::query_as::<_, MaterialTotals>(
            r#"
            SELECT
                COUNT(*) AS total_materials,
                COALESCE(SUM(current_stock * unit_cost), 0) AS total_inventory_value,
                COUNT(*) FILTER (WHERE current_stock < minimum_stock) AS low_stock_count,
                COUNT(*) FILTER (WHERE current_stock = 0) AS out_of_stock_count,
                COALESCE(ROUND(AVG(current_stock), 2), 0) AS average_stock_level
            FROM materials
            WHERE is_active = TRUE
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        let materials_by_category = sqlx::query_as::<_, MaterialsByCategory>(
            r#"
            SELECT
                mc.name AS category_name,
                COUNT(*) AS count,
                COALESCE(SUM(m.current_stock * m.unit_cost), 0) AS category_value
            FROM materials m
            LEFT JOIN cat_material_categories mc ON m.category_id = mc.id
            WHERE m.is_active = TRUE
            GROUP BY mc.id, mc.name
            ORDER BY category_value DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(MaterialStats {
            totals,
            materials_by_category,
        })
    }

    pub async fn create(&self, request: &CreateMaterialRequest, user_id: i32) -> Result<Material, AppError> {
        let mut tx = self.pool.begin().await?;

        let material_code = match request.material_code.as_deref() {
            Some(code) => code.to_string(),
            None => next_code(&mut tx, CodeKind::Material).await?,
        };

        let material = sqlx::query_as::<_, Material>(
            r#"
            INSERT INTO materials (material_code, material_name, category_id, unit_of_measure_id,
                                   unit_cost, minimum_stock, current_stock, reorder_point,
                                   description, created_by, modified_by)
            VALUES ($1, $2, $3, $4, COALESCE($5, 0), COALESCE($6, 0), COALESCE($7, 0),
                    COALESCE($8, 0), $9, $10, $10)
            RETURNING *
            "#,
        )
        .bind(material_code)
        .bind(request.material_name.as_deref().map(str::trim))
        .bind(request.category_id)
        .bind(request.unit_of_measure_id)
        .bind(request.unit_cost)
        .bind(request.minimum_stock)
        .bind(request.current_stock)
        .bind(request.reorder_point)
        .bind(request.description.as_deref())
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(material)
    }

    pub async fn update(
        &self,
        id: i32,
        request: &UpdateMaterialRequest,
        user_id: i32,
    ) -> Result<Option<Material>, AppError> {
        let material = sqlx::query_as::<_, Material>(
            r#"
            UPDATE materials SET
                material_code = COALESCE($2, material_code),
                material_name = COALESCE($3, material_name),
                category_id = COALESCE($4, category_id),
                unit_of_measure_id = COALESCE($5, unit_of_measure_id),
                unit_cost = COALESCE($6, unit_cost),
                minimum_stock = COALESCE($7, minimum_stock),
                reorder_point = COALESCE($8, reorder_point),
                description = COALESCE($9, description),
                modified_by = $10,
                modified_date = NOW()
            WHERE id = $1 AND is_active = TRUE
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(request.material_code.as_deref())
        .bind(request.material_name.as_deref())
        .bind(request.category_id)
        .bind(request.unit_of_measure_id)
        .bind(request.unit_cost)
        .bind(request.minimum_stock)
        .bind(request.reorder_point)
        .bind(request.description.as_deref())
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(material)
    }

    pub async fn soft_delete(&self, id: i32, user_id: i32) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE materials SET is_active = FALSE, modified_by = $2, modified_date = NOW() WHERE id = $1 AND is_active = TRUE",
        )
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
