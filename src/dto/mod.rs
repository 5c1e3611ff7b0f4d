//! DTOs de requests, queries y respuestas

pub mod auth_dto;
pub mod chatter_dto;
pub mod common_dto;
pub mod customer_dto;
pub mod file_dto;
pub mod fuel_requisition_dto;
pub mod invoice_dto;
pub mod labor_dto;
pub mod material_dto;
pub mod note_dto;
pub mod pre_inventory_dto;
pub mod project_dto;
pub mod purchase_order_dto;
pub mod supplier_dto;
pub mod user_dto;
pub mod warehouse_dto;
