use sqlx::PgPool;
use tracing::info;
use validator::Validate;

use crate::dto::common_dto::{search_pattern, ListQuery, PaginatedResponse};
use crate::dto::supplier_dto::{CreateSupplierRequest, SupplierFilter, UpdateSupplierRequest};
use crate::models::purchase_order::PurchaseOrderSummary;
use crate::models::supplier::{Supplier, SupplierCategory, SupplierDetail, SupplierStats, SupplierSummary};
use crate::repositories::purchase_order_repository::{PurchaseOrderCriteria, PurchaseOrderRepository};
use crate::repositories::supplier_repository::SupplierRepository;
use crate::utils::errors::{bad_request_error, not_found_error, not_found_or_deleted, AppError};
use crate::utils::pagination::{PageParams, DEFAULT_LIMIT};
use crate::utils::validation::require_text;

pub struct SupplierController {
    repository: SupplierRepository,
    purchase_orders: PurchaseOrderRepository,
}

impl SupplierController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: SupplierRepository::new(pool.clone()),
            purchase_orders: PurchaseOrderRepository::new(pool),
        }
    }

    pub async fn list(&self, filter: SupplierFilter) -> Result<PaginatedResponse<SupplierSummary>, AppError> {
        let params = PageParams::new(filter.page, filter.limit, DEFAULT_LIMIT);
        let (suppliers, total) = self
            .repository
            .list(&params, search_pattern(filter.search.as_deref()), filter.category_id)
            .await?;
        Ok(PaginatedResponse::new(suppliers, &params, total))
    }

    pub async fn get_by_id(&self, id: i32) -> Result<SupplierDetail, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Supplier"))
    }

    pub async fn stats(&self) -> Result<SupplierStats, AppError> {
        self.repository.stats().await
    }

    pub async fn categories(&self) -> Result<Vec<SupplierCategory>, AppError> {
        self.repository.categories().await
    }

    /// Órdenes de compra del proveedor, más recientes primero
    pub async fn purchase_orders(
        &self,
        id: i32,
        query: ListQuery,
    ) -> Result<PaginatedResponse<PurchaseOrderSummary>, AppError> {
        if !self.repository.exists(id).await? {
            return Err(not_found_error("Supplier"));
        }

        let params = query.page_params(DEFAULT_LIMIT);
        let criteria = PurchaseOrderCriteria {
            search: None,
            status_id: None,
            supplier_id: Some(id),
            start_date: None,
            end_date: None,
        };
        let (orders, total) = self.purchase_orders.list(&params, &criteria).await?;
        Ok(PaginatedResponse::new(orders, &params, total))
    }

    pub async fn create(&self, request: CreateSupplierRequest, user_id: i32) -> Result<Supplier, AppError> {
        if require_text(request.supplier_name.as_deref()).is_none() || request.supplier_category_id.is_none() {
            return Err(bad_request_error("Supplier name and category are required"));
        }
        request.validate()?;

        let supplier = self.repository.create(&request, user_id).await?;
        info!("🚚 Proveedor creado: {} (id {})", supplier.supplier_name, supplier.id);
        Ok(supplier)
    }

    pub async fn update(
        &self,
        id: i32,
        request: UpdateSupplierRequest,
        user_id: i32,
    ) -> Result<Supplier, AppError> {
        request.validate()?;
        self.repository
            .update(id, &request, user_id)
            .await?
            .ok_or_else(|| not_found_or_deleted("Supplier"))
    }

    pub async fn delete(&self, id: i32, user_id: i32) -> Result<(), AppError> {
        if self.repository.open_purchase_orders(id).await? > 0 {
            return Err(bad_request_error("Cannot delete supplier with active purchase orders"));
        }
        if !self.repository.soft_delete(id, user_id).await? {
            return Err(not_found_or_deleted("Supplier"));
        }
        info!("🗑️ Proveedor {} desactivado", id);
        Ok(())
    }
}
