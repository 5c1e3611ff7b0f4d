use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::dto::customer_dto::{CreateCustomerRequest, UpdateCustomerRequest};
use crate::models::customer::{Customer, CustomerDetail};
use crate::utils::errors::AppError;
use crate::utils::pagination::PageParams;

const DETAIL_SELECT: &str = r#"
    SELECT c.*, s.state_name, u.username AS created_by_name
    FROM customers c
    LEFT JOIN cat_states s ON c.state_id = s.id
    LEFT JOIN users u ON c.created_by = u.id
"#;

pub struct CustomerRepository {
    pool: PgPool,
}

impl CustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn push_where(builder: &mut QueryBuilder<'_, Postgres>, search: &Option<String>) {
        builder.push(" WHERE c.is_active = TRUE");
        if let Some(pattern) = search {
            builder
                .push(" AND (c.company_name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR c.rfc ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR c.contact_name ILIKE ")
                .push_bind(pattern.clone())
                .push(")");
        }
    }

    pub async fn list(
        &self,
        params: &PageParams,
        search: Option<String>,
    ) -> Result<(Vec<CustomerDetail>, i64), AppError> {
        let mut query = QueryBuilder::new(DETAIL_SELECT);
        Self::push_where(&mut query, &search);
        query
            .push(" ORDER BY c.created_date DESC LIMIT ")
            .push_bind(params.limit)
            .push(" OFFSET ")
            .push_bind(params.offset());
        let customers = query.build_query_as::<CustomerDetail>().fetch_all(&self.pool).await?;

        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM customers c");
        Self::push_where(&mut count, &search);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        Ok((customers, total))
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<CustomerDetail>, AppError> {
        let sql = format!("{} WHERE c.id = $1 AND c.is_active = TRUE", DETAIL_SELECT);
        let customer = sqlx::query_as::<_, CustomerDetail>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(customer)
    }

    pub async fn create(&self, request: &CreateCustomerRequest, user_id: i32) -> Result<Customer, AppError> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers (company_name, rfc, contact_name, contact_phone, contact_email,
                                   address, city, state_id, postal_code, created_by, modified_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
            RETURNING *
            "#,
        )
        .bind(request.company_name.as_deref().map(str::trim))
        .bind(request.rfc.as_deref())
        .bind(request.contact_name.as_deref())
        .bind(request.contact_phone.as_deref())
        .bind(request.contact_email.as_deref())
        .bind(request.address.as_deref())
        .bind(request.city.as_deref())
        .bind(request.state_id)
        .bind(request.postal_code.as_deref())
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(customer)
    }

    pub async fn update(
        &self,
        id: i32,
        request: &UpdateCustomerRequest,
        user_id: i32,
    ) -> Result<Option<Customer>, AppError> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            UPDATE customers SET
                company_name = COALESCE($2, company_name),
                rfc = COALESCE($3, rfc),
                contact_name = COALESCE($4, contact_name),
                contact_phone = COALESCE($5, contact_phone),
                contact_email = COALESCE($6, contact_email),
                address = COALESCE($7, address),
                city = COALESCE($8, city),
                state_id = COALESCE($9, state_id),
                postal_code = COALESCE($10, postal_code),
                modified_by = $11,
                modified_date = NOW()
            WHERE id = $1 AND is_active = TRUE
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(request.company_name.as_deref())
        .bind(request.rfc.as_deref())
        .bind(request.contact_name.as_deref())
        .bind(request.contact_phone.as_deref())
        .bind(request.contact_email.as_deref())
        .bind(request.address.as_deref())
        .bind(request.city.as_deref())
        .bind(request.state_id)
        .bind(request.postal_code.as_deref())
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(customer)
    }

    pub async fn soft_delete(&self, id: i32, user_id: i32) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE customers SET is_active = FALSE, modified_by = $2, modified_date = NOW() WHERE id = $1 AND is_active = TRUE",
        )
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
