//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores, validación,
//! JWT, paginación, códigos secuenciales y reglas del kardex.

pub mod audit;
pub mod codes;
pub mod errors;
pub mod jwt;
pub mod pagination;
pub mod stock;
pub mod validation;
