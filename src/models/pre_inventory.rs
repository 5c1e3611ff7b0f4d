//! Modelo de pre-inventario (conteo físico contra stock esperado)

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

use crate::utils::errors::{bad_request_error, AppError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreInventoryStatus {
    Pending,
    Counted,
    Adjusted,
    Cancelled,
}

impl PreInventoryStatus {
    pub fn from_id(id: i32) -> Option<Self> {
        match id {
            1 => Some(PreInventoryStatus::Pending),
            2 => Some(PreInventoryStatus::Counted),
            3 => Some(PreInventoryStatus::Adjusted),
            4 => Some(PreInventoryStatus::Cancelled),
            _ => None,
        }
    }

    pub fn id(&self) -> i32 {
        match self {
            PreInventoryStatus::Pending => 1,
            PreInventoryStatus::Counted => 2,
            PreInventoryStatus::Adjusted => 3,
            PreInventoryStatus::Cancelled => 4,
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PreInventory {
    pub id: i32,
    pub pre_inventory_number: String,
    pub material_id: i32,
    pub warehouse_location_id: i32,
    pub expected_quantity: Decimal,
    pub counted_quantity: Option<Decimal>,
    pub discrepancy: Option<Decimal>,
    pub unit_cost: Decimal,
    pub discrepancy_value: Option<Decimal>,
    pub status_id: i32,
    pub notes: Option<String>,
    pub count_date: Option<DateTime<Utc>>,
    pub counted_by: Option<i32>,
    pub adjusted: bool,
    pub adjustment_transaction_id: Option<i32>,
    pub created_by: Option<i32>,
    pub created_date: DateTime<Utc>,
    pub updated_by: Option<i32>,
    pub updated_date: Option<DateTime<Utc>>,
}

impl PreInventory {
    fn status(&self) -> Option<PreInventoryStatus> {
        PreInventoryStatus::from_id(self.status_id)
    }

    /// Un conteo se puede registrar o corregir mientras no esté ajustado ni cancelado
    pub fn ensure_countable(&self) -> Result<(), AppError> {
        if self.adjusted {
            return Err(bad_request_error("Cannot update count - already adjusted"));
        }
        if self.status() == Some(PreInventoryStatus::Cancelled) {
            return Err(bad_request_error("Cannot update count - record cancelled"));
        }
        Ok(())
    }

    /// Diferencia a ajustar; el ajuste es irreversible
    pub fn adjustable_discrepancy(&self) -> Result<Decimal, AppError> {
        if self.adjusted {
            return Err(bad_request_error("Adjustment already processed"));
        }
        if self.status() != Some(PreInventoryStatus::Counted) {
            return Err(bad_request_error(
                "Physical count must be completed before processing adjustment",
            ));
        }
        match self.discrepancy {
            Some(discrepancy) if !discrepancy.is_zero() => Ok(discrepancy),
            _ => Err(bad_request_error("No discrepancy to adjust")),
        }
    }
}

/// Diferencia (contado − esperado) y su valor al costo unitario
pub fn discrepancy(counted: Decimal, expected: Decimal, unit_cost: Decimal) -> (Decimal, Decimal) {
    let difference = counted - expected;
    (difference, (difference * unit_cost).round_dp(2))
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PreInventoryDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub record: PreInventory,
    pub material_code: Option<String>,
    pub material_name: Option<String>,
    pub category_name: Option<String>,
    pub unit_name: Option<String>,
    pub location_name: Option<String>,
    pub status_name: Option<String>,
    pub counted_by_name: Option<String>,
    pub created_by_name: Option<String>,
    pub updated_by_name: Option<String>,
    pub adjustment_transaction_number: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CountResult {
    pub counted_quantity: Decimal,
    pub discrepancy: Decimal,
    pub discrepancy_value: Decimal,
}

#[derive(Debug, Serialize)]
pub struct PreInventoryAdjustment {
    pub transaction_number: String,
    pub adjustment_quantity: Decimal,
    pub adjustment_value: Decimal,
    pub new_stock: Decimal,
}

#[derive(Debug, Serialize, FromRow)]
pub struct DiscrepancyRow {
    pub id: i32,
    pub pre_inventory_number: String,
    pub material_id: i32,
    pub material_code: Option<String>,
    pub material_name: Option<String>,
    pub category_name: Option<String>,
    pub location_name: Option<String>,
    pub expected_quantity: Decimal,
    pub counted_quantity: Option<Decimal>,
    pub discrepancy: Option<Decimal>,
    pub unit_cost: Decimal,
    pub discrepancy_value: Option<Decimal>,
    pub adjusted: bool,
    pub adjustment_transaction_id: Option<i32>,
    pub count_date: Option<DateTime<Utc>>,
    pub counted_by_name: Option<String>,
}

#[derive(Debug, Serialize, FromRow)]
pub struct DiscrepancySummary {
    pub total_counts: i64,
    pub discrepancies_count: i64,
    pub overages: i64,
    pub shortages: i64,
    pub adjustments_processed: i64,
    pub total_discrepancy_value: Decimal,
}

#[derive(Debug, Serialize)]
pub struct DiscrepancyReport {
    pub summary: DiscrepancySummary,
    pub details: Vec<DiscrepancyRow>,
}

#[derive(Debug, Serialize, FromRow)]
pub struct PreInventoryTotals {
    pub total_counts: i64,
    pub pending_counts: i64,
    pub completed_counts: i64,
    pub adjusted_counts: i64,
    pub cancelled_counts: i64,
    pub with_discrepancies: i64,
    pub overages: i64,
    pub shortages: i64,
    pub total_overage_value: Decimal,
    pub total_shortage_value: Decimal,
    pub total_discrepancy_value: Decimal,
}

#[derive(Debug, Serialize, FromRow)]
pub struct RecentCount {
    pub id: i32,
    pub pre_inventory_number: String,
    pub material_name: Option<String>,
    pub location_name: Option<String>,
    pub discrepancy: Option<Decimal>,
    pub discrepancy_value: Option<Decimal>,
    pub count_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct PreInventoryStats {
    #[serde(flatten)]
    pub totals: PreInventoryTotals,
    pub recent_counts: Vec<RecentCount>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(status_id: i32, adjusted: bool, discrepancy: Option<Decimal>) -> PreInventory {
        PreInventory {
            id: 1,
            pre_inventory_number: "PINV-000001".to_string(),
            material_id: 7,
            warehouse_location_id: 1,
            expected_quantity: Decimal::new(100, 0),
            counted_quantity: discrepancy.map(|d| Decimal::new(100, 0) + d),
            discrepancy,
            unit_cost: Decimal::new(2550, 2),
            discrepancy_value: None,
            status_id,
            notes: None,
            count_date: None,
            counted_by: None,
            adjusted,
            adjustment_transaction_id: None,
            created_by: Some(1),
            created_date: Utc::now(),
            updated_by: None,
            updated_date: None,
        }
    }

    #[test]
    fn test_discrepancy_math() {
        let (difference, value) = discrepancy(Decimal::new(95, 0), Decimal::new(100, 0), Decimal::new(2550, 2));
        assert_eq!(difference, Decimal::new(-5, 0));
        assert_eq!(value, Decimal::new(-12750, 2));

        let (difference, value) = discrepancy(Decimal::new(1025, 1), Decimal::new(100, 0), Decimal::new(10, 0));
        assert_eq!(difference, Decimal::new(25, 1));
        assert_eq!(value, Decimal::new(2500, 2));
    }

    #[test]
    fn test_adjusted_record_cannot_be_adjusted_again() {
        let adjusted = record(3, true, Some(Decimal::new(-5, 0)));
        let err = adjusted.adjustable_discrepancy().unwrap_err();
        assert!(matches!(err, AppError::BadRequest(message) if message == "Adjustment already processed"));
    }

    #[test]
    fn test_adjustment_requires_completed_count() {
        let pending = record(1, false, None);
        assert!(matches!(
            pending.adjustable_discrepancy(),
            Err(AppError::BadRequest(message)) if message.starts_with("Physical count must be completed")
        ));
    }

    #[test]
    fn test_zero_discrepancy_is_not_adjustable() {
        let counted = record(2, false, Some(Decimal::ZERO));
        assert!(matches!(
            counted.adjustable_discrepancy(),
            Err(AppError::BadRequest(message)) if message == "No discrepancy to adjust"
        ));
        let counted = record(2, false, Some(Decimal::new(3, 0)));
        assert_eq!(counted.adjustable_discrepancy().unwrap(), Decimal::new(3, 0));
    }

    #[test]
    fn test_countable_states() {
        assert!(record(1, false, None).ensure_countable().is_ok());
        assert!(record(2, false, Some(Decimal::ONE)).ensure_countable().is_ok());
        assert!(record(3, true, Some(Decimal::ONE)).ensure_countable().is_err());
        assert!(record(4, false, None).ensure_countable().is_err());
    }
}
