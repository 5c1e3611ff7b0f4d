use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::info;
use validator::Validate;

use crate::dto::common_dto::{search_pattern, PaginatedResponse};
use crate::dto::warehouse_dto::{
    AdjustInventoryRequest, StockReportQuery, TransactionFilter, TransferFilter, TransferRequest,
};
use crate::models::warehouse::{
    AdjustmentResult, LocationStock, LocationSummary, StockReportRow, TransactionDetail,
    TransferDetail, TransferResult, WarehouseStats,
};
use crate::repositories::warehouse_repository::{
    Adjustment, Transfer, TransactionCriteria, TransferCriteria, WarehouseRepository,
};
use crate::utils::errors::{bad_request_error, AppError};
use crate::utils::pagination::{PageParams, LEDGER_LIMIT};
use crate::utils::stock::MovementType;
use crate::utils::validation::parse_date_filter;

pub struct WarehouseController {
    repository: WarehouseRepository,
}

impl WarehouseController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: WarehouseRepository::new(pool),
        }
    }

    pub async fn locations(&self) -> Result<Vec<LocationSummary>, AppError> {
        self.repository.locations().await
    }

    pub async fn stock_by_location(
        &self,
        location_id: i32,
        search: Option<&str>,
    ) -> Result<Vec<LocationStock>, AppError> {
        self.repository
            .stock_by_location(location_id, search_pattern(search))
            .await
    }

    pub async fn transfer(&self, request: TransferRequest, user_id: i32) -> Result<TransferResult, AppError> {
        request.validate()?;
        let transfer = validate_transfer(request)?;

        let result = self.repository.transfer(&transfer, user_id).await?;
        info!(
            "🔁 Transferencia de material {}: {} unidades de ubicación {} a {} ({} / {})",
            transfer.material_id,
            transfer.quantity,
            transfer.from_location_id,
            transfer.to_location_id,
            result.exit_transaction,
            result.entry_transaction
        );
        Ok(result)
    }

    pub async fn adjust(&self, request: AdjustInventoryRequest, user_id: i32) -> Result<AdjustmentResult, AppError> {
        request.validate()?;
        let adjustment = validate_adjustment(request)?;

        let result = self.repository.adjust(&adjustment, user_id).await?;
        info!(
            "📦 Ajuste {} de material {}: nuevo stock {}",
            result.transaction_number, adjustment.material_id, result.new_stock
        );
        Ok(result)
    }

    pub async fn transactions(
        &self,
        filter: TransactionFilter,
    ) -> Result<PaginatedResponse<TransactionDetail>, AppError> {
        let params = PageParams::new(filter.page, filter.limit, LEDGER_LIMIT);
        let criteria = TransactionCriteria {
            material_id: filter.material_id,
            location_id: filter.location_id,
            transaction_type: filter.transaction_type.filter(|t| !t.is_empty()),
            start_date: parse_date_filter("startDate", filter.start_date.as_deref())?,
            end_date: parse_date_filter("endDate", filter.end_date.as_deref())?,
        };
        let (transactions, total) = self.repository.transactions(&params, &criteria).await?;
        Ok(PaginatedResponse::new(transactions, &params, total))
    }

    pub async fn transfers(&self, filter: TransferFilter) -> Result<PaginatedResponse<TransferDetail>, AppError> {
        let params = PageParams::new(filter.page, filter.limit, LEDGER_LIMIT);
        let criteria = TransferCriteria {
            material_id: filter.material_id,
            start_date: parse_date_filter("startDate", filter.start_date.as_deref())?,
            end_date: parse_date_filter("endDate", filter.end_date.as_deref())?,
        };
        let (transfers, total) = self.repository.transfers(&params, &criteria).await?;
        Ok(PaginatedResponse::new(transfers, &params, total))
    }

    pub async fn stats(&self) -> Result<WarehouseStats, AppError> {
        self.repository.stats().await
    }

    pub async fn stock_report(&self, query: StockReportQuery) -> Result<Vec<StockReportRow>, AppError> {
        self.repository
            .stock_report(query.location_id, query.category_id, query.low_stock.unwrap_or(false))
            .await
    }
}

fn validate_transfer(request: TransferRequest) -> Result<Transfer, AppError> {
    let (Some(material_id), Some(from_location_id), Some(to_location_id), Some(quantity)) = (
        request.material_id,
        request.from_location_id,
        request.to_location_id,
        request.quantity,
    ) else {
        return Err(bad_request_error(
            "material_id, from_location_id, to_location_id and quantity are required",
        ));
    };

    if from_location_id == to_location_id {
        return Err(bad_request_error("Cannot transfer to the same location"));
    }
    if quantity <= Decimal::ZERO {
        return Err(bad_request_error("Quantity must be greater than 0"));
    }

    Ok(Transfer {
        material_id,
        from_location_id,
        to_location_id,
        quantity,
        reason: request.reason.filter(|r| !r.trim().is_empty()),
        transfer_date: request.transfer_date,
    })
}

fn validate_adjustment(request: AdjustInventoryRequest) -> Result<Adjustment, AppError> {
    let (Some(material_id), Some(warehouse_location_id), Some(quantity)) =
        (request.material_id, request.warehouse_location_id, request.quantity)
    else {
        return Err(bad_request_error(
            "material_id, warehouse_location_id, quantity and transaction_type are required",
        ));
    };

    if quantity.is_zero() {
        return Err(bad_request_error("Quantity cannot be zero"));
    }
    let movement = request
        .transaction_type
        .as_deref()
        .and_then(MovementType::parse)
        .ok_or_else(|| bad_request_error("Invalid transaction type"))?;

    Ok(Adjustment {
        material_id,
        warehouse_location_id,
        quantity,
        movement,
        reference_number: request.reference_number,
        notes: request.notes,
        transaction_date: request.transaction_date,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transfer(body: &str) -> Result<Transfer, AppError> {
        validate_transfer(serde_json::from_str(body).unwrap())
    }

    fn adjustment(body: &str) -> Result<Adjustment, AppError> {
        validate_adjustment(serde_json::from_str(body).unwrap())
    }

    #[test]
    fn test_transfer_to_same_location_is_rejected() {
        let err = transfer(r#"{"material_id": 1, "from_location_id": 2, "to_location_id": 2, "quantity": 5}"#)
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg) if msg == "Cannot transfer to the same location"));
    }

    #[test]
    fn test_transfer_quantity_must_be_positive() {
        let err = transfer(r#"{"material_id": 1, "from_location_id": 1, "to_location_id": 2, "quantity": 0}"#)
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg) if msg == "Quantity must be greater than 0"));
    }

    #[test]
    fn test_transfer_requires_fields() {
        assert!(matches!(transfer(r#"{"material_id": 1}"#), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_valid_transfer() {
        let t = transfer(
            r#"{"material_id": 1, "from_location_id": 1, "to_location_id": 2, "quantity": "2.5", "reason": " "}"#,
        )
        .unwrap();
        assert_eq!(t.quantity, Decimal::new(25, 1));
        assert!(t.reason.is_none());
    }

    #[test]
    fn test_adjustment_rejects_zero_and_unknown_type() {
        let zero = adjustment(
            r#"{"material_id": 1, "warehouse_location_id": 1, "quantity": 0, "transaction_type": "entry"}"#,
        );
        assert!(matches!(zero, Err(AppError::BadRequest(msg)) if msg == "Quantity cannot be zero"));

        let unknown = adjustment(
            r#"{"material_id": 1, "warehouse_location_id": 1, "quantity": 3, "transaction_type": "transfer"}"#,
        );
        assert!(matches!(unknown, Err(AppError::BadRequest(msg)) if msg == "Invalid transaction type"));
    }

    #[test]
    fn test_exit_adjustment_is_stored_negative() {
        let a = adjustment(
            r#"{"material_id": 1, "warehouse_location_id": 1, "quantity": 4, "transaction_type": "exit"}"#,
        )
        .unwrap();
        assert_eq!(a.movement, MovementType::Exit);
        assert_eq!(a.movement.signed(a.quantity), Decimal::new(-4, 0));
    }
}
