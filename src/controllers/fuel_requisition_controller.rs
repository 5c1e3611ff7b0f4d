use sqlx::PgPool;
use tracing::info;
use validator::Validate;

use crate::dto::common_dto::{search_pattern, PaginatedResponse, PeriodResponse, ReportPeriod};
use crate::dto::fuel_requisition_dto::{
    ConsumptionQuery, CreateFuelRequisitionRequest, FuelRequisitionFilter, UpdateFuelRequisitionRequest,
    UpdateRequisitionStatusRequest,
};
use crate::models::fuel_requisition::{
    ConsumptionRow, FuelRequisition, FuelRequisitionDetail, FuelStats, FuelType, RequisitionStatus,
};
use crate::repositories::fuel_requisition_repository::{FuelRequisitionRepository, RequisitionCriteria};
use crate::utils::errors::{bad_request_error, not_found_error, not_found_or_deleted, AppError};
use crate::utils::pagination::{PageParams, DEFAULT_LIMIT};
use crate::utils::validation::{parse_date_filter, require_text};

pub struct FuelRequisitionController {
    repository: FuelRequisitionRepository,
}

impl FuelRequisitionController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: FuelRequisitionRepository::new(pool),
        }
    }

    pub async fn list(
        &self,
        filter: FuelRequisitionFilter,
    ) -> Result<PaginatedResponse<FuelRequisitionDetail>, AppError> {
        let params = PageParams::new(filter.page, filter.limit, DEFAULT_LIMIT);
        let criteria = RequisitionCriteria {
            search: search_pattern(filter.search.as_deref()),
            project_id: filter.project_id,
            status: optional_status(filter.requisition_status.as_deref())?,
            fuel_type: optional_fuel_type(filter.fuel_type.as_deref())?,
            start_date: parse_date_filter("start_date", filter.start_date.as_deref())?,
            end_date: parse_date_filter("end_date", filter.end_date.as_deref())?,
        };
        let (requisitions, total) = self.repository.list(&params, &criteria).await?;
        Ok(PaginatedResponse::new(requisitions, &params, total))
    }

    pub async fn get_by_id(&self, id: i32) -> Result<FuelRequisitionDetail, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Fuel requisition"))
    }

    pub async fn stats(&self) -> Result<FuelStats, AppError> {
        self.repository.stats().await
    }

    pub async fn consumption_report(
        &self,
        query: ConsumptionQuery,
    ) -> Result<PeriodResponse<ConsumptionRow>, AppError> {
        let period = ReportPeriod::required(query.start_date.as_deref(), query.end_date.as_deref())?;
        let fuel_type = optional_fuel_type(query.fuel_type.as_deref())?;
        let rows = self.repository.consumption(&period, fuel_type, query.project_id).await?;
        Ok(PeriodResponse::new(rows, period))
    }

    pub async fn create(
        &self,
        request: CreateFuelRequisitionRequest,
        user_id: i32,
    ) -> Result<FuelRequisition, AppError> {
        if require_text(request.vehicle_equipment_name.as_deref()).is_none()
            || request.quantity_liters.is_none()
            || request.unit_price.is_none()
        {
            return Err(bad_request_error(
                "Vehicle/equipment name, quantity and unit price are required",
            ));
        }
        let fuel_type = optional_fuel_type(request.fuel_type.as_deref())?
            .ok_or_else(|| bad_request_error("Invalid fuel type"))?;
        request.validate()?;

        let requisition = self.repository.create(&request, fuel_type, user_id).await?;
        info!(
            "⛽ Requisición creada: {} ({} L de {})",
            requisition.requisition_code, requisition.quantity_liters, requisition.fuel_type
        );
        Ok(requisition)
    }

    pub async fn update(
        &self,
        id: i32,
        request: UpdateFuelRequisitionRequest,
        user_id: i32,
    ) -> Result<FuelRequisition, AppError> {
        let fuel_type = optional_fuel_type(request.fuel_type.as_deref())?;
        request.validate()?;
        self.repository
            .update(id, &request, fuel_type, user_id)
            .await?
            .ok_or_else(|| not_found_or_deleted("Fuel requisition"))
    }

    pub async fn update_status(
        &self,
        id: i32,
        request: UpdateRequisitionStatusRequest,
        user_id: i32,
    ) -> Result<FuelRequisition, AppError> {
        let status = request
            .requisition_status
            .as_deref()
            .and_then(RequisitionStatus::parse)
            .ok_or_else(|| bad_request_error("Invalid requisition status"))?;

        let requisition = self.repository.set_status(id, status, user_id).await?;
        info!("⛽ Requisición {} pasa a {}", requisition.requisition_code, status.as_str());
        Ok(requisition)
    }

    pub async fn delete(&self, id: i32, user_id: i32) -> Result<(), AppError> {
        if !self.repository.soft_delete(id, user_id).await? {
            return Err(not_found_or_deleted("Fuel requisition"));
        }
        Ok(())
    }
}

fn optional_status(value: Option<&str>) -> Result<Option<RequisitionStatus>, AppError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => RequisitionStatus::parse(raw)
            .map(Some)
            .ok_or_else(|| bad_request_error("Invalid requisition status")),
    }
}

fn optional_fuel_type(value: Option<&str>) -> Result<Option<FuelType>, AppError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => FuelType::parse(raw)
            .map(Some)
            .ok_or_else(|| bad_request_error("Invalid fuel type")),
    }
}
