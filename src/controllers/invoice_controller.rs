use sqlx::PgPool;
use tracing::info;
use validator::Validate;

use crate::dto::common_dto::{ListQuery, PaginatedResponse};
use crate::dto::invoice_dto::{CreateInvoiceRequest, UpdateInvoiceRequest};
use crate::models::invoice::{Invoice, InvoiceDetail, InvoiceStats};
use crate::repositories::invoice_repository::InvoiceRepository;
use crate::utils::audit::ChangeLogEntry;
use crate::utils::errors::{bad_request_error, not_found_error, not_found_or_deleted, AppError};
use crate::utils::pagination::DEFAULT_LIMIT;

pub struct InvoiceController {
    repository: InvoiceRepository,
}

impl InvoiceController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: InvoiceRepository::new(pool),
        }
    }

    pub async fn list(&self, query: ListQuery) -> Result<PaginatedResponse<InvoiceDetail>, AppError> {
        let params = query.page_params(DEFAULT_LIMIT);
        let (invoices, total) = self.repository.list(&params, query.search_pattern()).await?;
        Ok(PaginatedResponse::new(invoices, &params, total))
    }

    pub async fn get_by_id(&self, id: i32) -> Result<InvoiceDetail, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Invoice"))
    }

    pub async fn stats(&self) -> Result<InvoiceStats, AppError> {
        self.repository.stats().await
    }

    pub async fn create(&self, request: CreateInvoiceRequest, user_id: i32) -> Result<Invoice, AppError> {
        if request.customer_id.is_none() || request.invoice_date.is_none() {
            return Err(bad_request_error("Customer and invoice date are required"));
        }
        request.validate()?;

        let invoice = self.repository.create(&request, user_id).await?;
        info!("🧾 Factura creada: {} (id {})", invoice.invoice_number, invoice.id);
        Ok(invoice)
    }

    pub async fn update(&self, id: i32, request: UpdateInvoiceRequest, user_id: i32) -> Result<Invoice, AppError> {
        request.validate()?;
        self.repository
            .update(id, &request, user_id)
            .await?
            .ok_or_else(|| not_found_or_deleted("Invoice"))
    }

    pub async fn delete(&self, id: i32, user_id: i32) -> Result<(), AppError> {
        if !self.repository.soft_delete(id, user_id).await? {
            return Err(not_found_or_deleted("Invoice"));
        }
        Ok(())
    }

    pub async fn history(&self, id: i32) -> Result<Vec<ChangeLogEntry>, AppError> {
        self.repository.history(id).await
    }
}
