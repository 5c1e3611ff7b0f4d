use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::info;
use validator::Validate;

use crate::dto::common_dto::{search_pattern, PaginatedResponse};
use crate::dto::purchase_order_dto::{
    CreatePurchaseOrderRequest, PurchaseOrderFilter, PurchaseOrderItemRequest, ReceiveMaterialsRequest,
    UpdatePurchaseOrderRequest, UpdateStatusRequest,
};
use crate::models::purchase_order::{
    CreatedPurchaseOrder, PoStatus, PurchaseOrder, PurchaseOrderStats, PurchaseOrderSummary,
    PurchaseOrderWithItems, ReceiveResult,
};
use crate::repositories::purchase_order_repository::{PurchaseOrderCriteria, PurchaseOrderRepository};
use crate::utils::errors::{bad_request_error, not_found_error, AppError};
use crate::utils::pagination::{PageParams, DEFAULT_LIMIT};
use crate::utils::validation::parse_date_filter;

pub struct PurchaseOrderController {
    repository: PurchaseOrderRepository,
}

impl PurchaseOrderController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PurchaseOrderRepository::new(pool),
        }
    }

    pub async fn list(&self, filter: PurchaseOrderFilter) -> Result<PaginatedResponse<PurchaseOrderSummary>, AppError> {
        let params = PageParams::new(filter.page, filter.limit, DEFAULT_LIMIT);
        let criteria = PurchaseOrderCriteria {
            search: search_pattern(filter.search.as_deref()),
            status_id: filter.status_id,
            supplier_id: None,
            start_date: parse_date_filter("start_date", filter.start_date.as_deref())?,
            end_date: parse_date_filter("end_date", filter.end_date.as_deref())?,
        };
        let (orders, total) = self.repository.list(&params, &criteria).await?;
        Ok(PaginatedResponse::new(orders, &params, total))
    }

    pub async fn get_by_id(&self, id: i32) -> Result<PurchaseOrderWithItems, AppError> {
        self.repository
            .find_with_items(id)
            .await?
            .ok_or_else(|| not_found_error("Purchase order"))
    }

    pub async fn stats(&self) -> Result<PurchaseOrderStats, AppError> {
        self.repository.stats().await
    }

    pub async fn create(
        &self,
        request: CreatePurchaseOrderRequest,
        user_id: i32,
    ) -> Result<CreatedPurchaseOrder, AppError> {
        let items = match request.items.as_deref() {
            Some(items) if !items.is_empty() => items,
            _ => return Err(bad_request_error("At least one item is required")),
        };
        if request.supplier_id.is_none() {
            return Err(bad_request_error("Supplier is required"));
        }
        validate_items(items)?;

        let created = self.repository.create(&request, items, user_id).await?;
        info!("🛒 Orden de compra creada: {} ({} partidas)", created.po_number, items.len());
        Ok(created)
    }

    pub async fn update(
        &self,
        id: i32,
        request: UpdatePurchaseOrderRequest,
        user_id: i32,
    ) -> Result<PurchaseOrder, AppError> {
        if let Some(items) = request.items.as_deref() {
            validate_items(items)?;
        }

        self.repository
            .update(id, &request, user_id, |current| {
                match PoStatus::from_id(current.po_status_id) {
                    Some(status) if status.is_editable() => Ok(()),
                    _ => Err(bad_request_error("Cannot edit purchase order in current status")),
                }
            })
            .await
    }

    pub async fn delete(&self, id: i32, user_id: i32) -> Result<(), AppError> {
        if !self.repository.soft_delete(id, user_id).await? {
            return Err(not_found_error("Purchase order"));
        }
        Ok(())
    }

    pub async fn update_status(&self, id: i32, request: UpdateStatusRequest, user_id: i32) -> Result<(), AppError> {
        let status = request
            .status_id
            .and_then(PoStatus::from_id)
            .ok_or_else(|| bad_request_error("Invalid status"))?;

        if !self.repository.set_status(id, status, user_id).await? {
            return Err(not_found_error("Purchase order"));
        }
        info!("🛒 Orden de compra {} pasa a estado {:?}", id, status);
        Ok(())
    }

    pub async fn receive(
        &self,
        id: i32,
        request: ReceiveMaterialsRequest,
        user_id: i32,
    ) -> Result<ReceiveResult, AppError> {
        if request.items.is_empty() {
            return Err(bad_request_error("At least one item is required"));
        }
        if request.items.iter().any(|item| item.received_quantity <= Decimal::ZERO) {
            return Err(bad_request_error("Received quantity must be greater than 0"));
        }

        let status = self
            .repository
            .receive(id, &request.items, user_id, |order| {
                match PoStatus::from_id(order.po_status_id) {
                    Some(status) if status.can_receive() => Ok(()),
                    _ => Err(bad_request_error(
                        "Purchase order must be approved before receiving materials",
                    )),
                }
            })
            .await?;

        info!("📥 Recepción registrada en orden {}: estado {:?}", id, status);
        Ok(ReceiveResult {
            new_status_id: status.id(),
        })
    }
}

fn validate_items(items: &[PurchaseOrderItemRequest]) -> Result<(), AppError> {
    for item in items {
        item.validate()?;
    }
    Ok(())
}
