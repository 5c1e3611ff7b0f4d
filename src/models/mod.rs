//! Modelos del sistema
//!
//! Este módulo contiene las filas (`sqlx::FromRow`) que mapean al schema
//! PostgreSQL del ERP y los agregados que devuelven las consultas de estadísticas.

pub mod catalog;
pub mod chatter;
pub mod customer;
pub mod file;
pub mod fuel_requisition;
pub mod invoice;
pub mod labor;
pub mod material;
pub mod note;
pub mod pre_inventory;
pub mod project;
pub mod purchase_order;
pub mod supplier;
pub mod user;
pub mod warehouse;
