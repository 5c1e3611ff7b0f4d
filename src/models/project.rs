//! Modelo de Project

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

use crate::utils::audit::{text, AuditFields};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Project {
    pub id: i32,
    pub project_number: String,
    pub project_name: String,
    pub customer_id: Option<i32>,
    pub project_type_id: Option<i32>,
    pub project_area_id: Option<i32>,
    pub project_status_id: Option<i32>,
    pub start_date: Option<NaiveDate>,
    pub estimated_end_date: Option<NaiveDate>,
    pub actual_end_date: Option<NaiveDate>,
    pub total_budget: Decimal,
    pub location_address: Option<String>,
    pub location_city: Option<String>,
    pub location_state_id: Option<i32>,
    pub project_manager_id: Option<i32>,
    pub description: Option<String>,
    pub created_by: Option<i32>,
    pub modified_by: Option<i32>,
    pub created_date: DateTime<Utc>,
    pub modified_date: DateTime<Utc>,
    pub is_active: bool,
}

impl AuditFields for Project {
    fn audit_fields(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("project_number", Some(self.project_number.clone())),
            ("project_name", Some(self.project_name.clone())),
            ("customer_id", text(&self.customer_id)),
            ("project_type_id", text(&self.project_type_id)),
            ("project_area_id", text(&self.project_area_id)),
            ("project_status_id", text(&self.project_status_id)),
            ("start_date", text(&self.start_date)),
            ("estimated_end_date", text(&self.estimated_end_date)),
            ("actual_end_date", text(&self.actual_end_date)),
            ("total_budget", Some(self.total_budget.to_string())),
            ("location_address", self.location_address.clone()),
            ("location_city", self.location_city.clone()),
            ("location_state_id", text(&self.location_state_id)),
            ("project_manager_id", text(&self.project_manager_id)),
            ("description", self.description.clone()),
        ]
    }
}

/// Project con cliente, catálogos y responsables resueltos
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ProjectDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub project: Project,
    pub company_name: Option<String>,
    pub project_type_name: Option<String>,
    pub status_name: Option<String>,
    pub status_alias: Option<String>,
    pub area_name: Option<String>,
    pub state_name: Option<String>,
    pub manager_name: Option<String>,
    pub created_by_name: Option<String>,
}

#[derive(Debug, Serialize, FromRow)]
pub struct ProjectTotals {
    pub total_projects: i64,
    pub active_projects: i64,
    pub completed_projects: i64,
    pub cancelled_projects: i64,
    pub on_hold_projects: i64,
    pub total_estimated_budget: Decimal,
    pub average_budget: Decimal,
    pub average_duration_days: Option<Decimal>,
    pub total_actual_cost: Decimal,
}

#[derive(Debug, Serialize, FromRow)]
pub struct ProjectsByType {
    pub project_type: Option<String>,
    pub count: i64,
    pub total_budget: Decimal,
}

#[derive(Debug, Serialize)]
pub struct ProjectStats {
    #[serde(flatten)]
    pub totals: ProjectTotals,
    pub projects_by_type: Vec<ProjectsByType>,
}
