//! Controladores: reglas de negocio entre las rutas y los repositorios

pub mod auth_controller;
pub mod catalog_controller;
pub mod chatter_controller;
pub mod customer_controller;
pub mod file_controller;
pub mod fuel_requisition_controller;
pub mod invoice_controller;
pub mod labor_controller;
pub mod material_controller;
pub mod note_controller;
pub mod pre_inventory_controller;
pub mod project_controller;
pub mod purchase_order_controller;
pub mod supplier_controller;
pub mod user_controller;
pub mod warehouse_controller;
