//! Endpoints que consultan el pool directamente, sin controlador
//!
//! Health, dashboard, historial de entidades y análisis predictivo.

pub mod dashboard;
pub mod health;
pub mod history;
pub mod ml_analysis;
