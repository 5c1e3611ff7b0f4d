//! Modelo de requisiciones de combustible

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FuelType {
    Gasoline,
    Diesel,
    Other,
}

impl FuelType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "gasoline" => Some(FuelType::Gasoline),
            "diesel" => Some(FuelType::Diesel),
            "other" => Some(FuelType::Other),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FuelType::Gasoline => "gasoline",
            FuelType::Diesel => "diesel",
            FuelType::Other => "other",
        }
    }
}

/// Ciclo de vida: pending → approved → delivered, y pending|approved → cancelled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequisitionStatus {
    Pending,
    Approved,
    Delivered,
    Cancelled,
}

impl RequisitionStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(RequisitionStatus::Pending),
            "approved" => Some(RequisitionStatus::Approved),
            "delivered" => Some(RequisitionStatus::Delivered),
            "cancelled" => Some(RequisitionStatus::Cancelled),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RequisitionStatus::Pending => "pending",
            RequisitionStatus::Approved => "approved",
            RequisitionStatus::Delivered => "delivered",
            RequisitionStatus::Cancelled => "cancelled",
        }
    }

    pub fn can_transition_to(&self, next: RequisitionStatus) -> bool {
        matches!(
            (self, next),
            (RequisitionStatus::Pending, RequisitionStatus::Approved)
                | (RequisitionStatus::Approved, RequisitionStatus::Delivered)
                | (RequisitionStatus::Pending, RequisitionStatus::Cancelled)
                | (RequisitionStatus::Approved, RequisitionStatus::Cancelled)
        )
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct FuelRequisition {
    pub id: i32,
    pub requisition_code: String,
    pub vehicle_equipment_name: String,
    pub project_id: Option<i32>,
    pub requisition_date: NaiveDate,
    pub fuel_type: String,
    pub quantity_liters: Decimal,
    pub unit_price: Decimal,
    pub total_amount: Decimal,
    pub odometer_reading: Option<Decimal>,
    pub requisition_status: String,
    pub approved_by: Option<i32>,
    pub approved_date: Option<DateTime<Utc>>,
    pub delivered_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_by: Option<i32>,
    pub modified_by: Option<i32>,
    pub created_date: DateTime<Utc>,
    pub modified_date: DateTime<Utc>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct FuelRequisitionDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub requisition: FuelRequisition,
    pub project_name: Option<String>,
    pub project_number: Option<String>,
    pub created_by_name: Option<String>,
    pub modified_by_name: Option<String>,
    pub approved_by_name: Option<String>,
}

#[derive(Debug, Serialize, FromRow)]
pub struct FuelTotals {
    pub total_requisitions: i64,
    pub total_vehicles: i64,
    pub total_liters: Decimal,
    pub total_cost: Decimal,
    pub avg_liters_per_requisition: Option<Decimal>,
    pub avg_unit_price: Option<Decimal>,
    pub pending_amount: Decimal,
    pub approved_amount: Decimal,
    pub delivered_amount: Decimal,
    pub gasoline_liters: Decimal,
    pub diesel_liters: Decimal,
    pub other_liters: Decimal,
}

#[derive(Debug, Serialize, FromRow)]
pub struct VehicleConsumption {
    pub vehicle_equipment_name: String,
    pub fuel_type: String,
    pub requisition_count: i64,
    pub total_liters: Decimal,
    pub total_cost: Decimal,
    pub avg_liters: Option<Decimal>,
}

#[derive(Debug, Serialize, FromRow)]
pub struct ProjectFuel {
    pub project_name: Option<String>,
    pub project_number: Option<String>,
    pub requisition_count: i64,
    pub total_liters: Decimal,
    pub fuel_cost: Decimal,
}

#[derive(Debug, Serialize)]
pub struct FuelStats {
    #[serde(flatten)]
    pub totals: FuelTotals,
    pub top_vehicles: Vec<VehicleConsumption>,
    pub fuel_by_project: Vec<ProjectFuel>,
}

#[derive(Debug, Serialize, FromRow)]
pub struct ConsumptionRow {
    pub vehicle_equipment_name: String,
    pub fuel_type: String,
    pub requisitions_count: i64,
    pub total_liters: Decimal,
    pub avg_unit_price: Option<Decimal>,
    pub total_cost: Decimal,
    pub project_name: Option<String>,
    pub project_number: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use RequisitionStatus::*;

    #[test]
    fn test_forward_transitions() {
        assert!(Pending.can_transition_to(Approved));
        assert!(Approved.can_transition_to(Delivered));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Approved.can_transition_to(Cancelled));
    }

    #[test]
    fn test_rejected_transitions() {
        assert!(!Pending.can_transition_to(Delivered));
        assert!(!Pending.can_transition_to(Pending));
        assert!(!Approved.can_transition_to(Pending));
        for next in [Pending, Approved, Delivered, Cancelled] {
            assert!(!Delivered.can_transition_to(next));
            assert!(!Cancelled.can_transition_to(next));
        }
    }

    #[test]
    fn test_parse_values() {
        assert_eq!(RequisitionStatus::parse("delivered"), Some(Delivered));
        assert_eq!(RequisitionStatus::parse("shipped"), None);
        assert_eq!(FuelType::parse("diesel").map(|f| f.as_str()), Some("diesel"));
        assert_eq!(FuelType::parse("electric"), None);
    }
}
