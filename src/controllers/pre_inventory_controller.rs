use sqlx::PgPool;
use tracing::info;
use validator::Validate;

use crate::dto::common_dto::PaginatedResponse;
use crate::dto::pre_inventory_dto::{
    CreatePreInventoryRequest, DiscrepancyQuery, PreInventoryFilter, UpdateCountRequest,
};
use crate::models::pre_inventory::{
    CountResult, DiscrepancyReport, PreInventory, PreInventoryAdjustment, PreInventoryDetail, PreInventoryStats,
};
use crate::repositories::pre_inventory_repository::{
    DiscrepancyCriteria, PreInventoryCriteria, PreInventoryRepository,
};
use crate::utils::errors::{bad_request_error, not_found_error, AppError};
use crate::utils::pagination::{PageParams, LEDGER_LIMIT};
use crate::utils::validation::parse_date_filter;

pub struct PreInventoryController {
    repository: PreInventoryRepository,
}

impl PreInventoryController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PreInventoryRepository::new(pool),
        }
    }

    pub async fn create(&self, request: CreatePreInventoryRequest, user_id: i32) -> Result<PreInventory, AppError> {
        let (material_id, location_id) = match (request.material_id, request.warehouse_location_id) {
            (Some(material_id), Some(location_id)) => (material_id, location_id),
            _ => return Err(bad_request_error("Material and warehouse location are required")),
        };

        let record = self
            .repository
            .create(material_id, location_id, &request, user_id)
            .await?;
        info!(
            "📋 Pre-inventario {} creado: material {} en ubicación {}, esperado {}",
            record.pre_inventory_number, material_id, location_id, record.expected_quantity
        );
        Ok(record)
    }

    pub async fn list(&self, filter: PreInventoryFilter) -> Result<PaginatedResponse<PreInventoryDetail>, AppError> {
        let params = PageParams::new(filter.page, filter.limit, LEDGER_LIMIT);
        let criteria = PreInventoryCriteria {
            material_id: filter.material_id,
            location_id: filter.location_id,
            status_id: filter.status_id,
            adjusted: filter.adjusted,
            start_date: parse_date_filter("startDate", filter.start_date.as_deref())?,
            end_date: parse_date_filter("endDate", filter.end_date.as_deref())?,
        };
        let (records, total) = self.repository.list(&params, &criteria).await?;
        Ok(PaginatedResponse::new(records, &params, total))
    }

    pub async fn get_by_id(&self, id: i32) -> Result<PreInventoryDetail, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Pre-inventory record"))
    }

    pub async fn update_count(&self, id: i32, request: UpdateCountRequest, user_id: i32) -> Result<CountResult, AppError> {
        request.validate()?;
        let result = self.repository.update_count(id, &request, user_id).await?;
        info!("📋 Conteo registrado en pre-inventario {}: diferencia {}", id, result.discrepancy);
        Ok(result)
    }

    pub async fn adjust(&self, id: i32, user_id: i32) -> Result<PreInventoryAdjustment, AppError> {
        let adjustment = self.repository.adjust(id, user_id).await?;
        info!(
            "📋 Ajuste {} aplicado desde pre-inventario {}: {} (stock {})",
            adjustment.transaction_number, id, adjustment.adjustment_quantity, adjustment.new_stock
        );
        Ok(adjustment)
    }

    pub async fn cancel(&self, id: i32, user_id: i32) -> Result<(), AppError> {
        self.repository.cancel(id, user_id).await
    }

    pub async fn discrepancy_report(&self, query: DiscrepancyQuery) -> Result<DiscrepancyReport, AppError> {
        let criteria = DiscrepancyCriteria {
            location_id: query.location_id,
            start_date: parse_date_filter("startDate", query.start_date.as_deref())?,
            end_date: parse_date_filter("endDate", query.end_date.as_deref())?,
            only_discrepancies: query.only_discrepancies.unwrap_or(false),
        };
        self.repository.discrepancy_report(&criteria).await
    }

    pub async fn stats(&self) -> Result<PreInventoryStats, AppError> {
        self.repository.stats().await
    }
}
