//! Catálogos genéricos expuestos por `/api/catalogs`

use serde::Serialize;

/// Nombre público del catálogo y su tabla
pub const CATALOGS: [(&str, &str); 28] = [
    ("roles", "cat_roles"),
    ("genders", "cat_genders"),
    ("marital-statuses", "cat_marital_statuses"),
    ("person-titles", "cat_person_titles"),
    ("nationalities", "cat_nationalities"),
    ("states", "cat_states"),
    ("invoice-types", "cat_invoice_types"),
    ("invoice-statuses", "cat_invoice_statuses"),
    ("payment-methods", "cat_payment_methods"),
    ("payment-statuses", "cat_payment_statuses"),
    ("expense-categories", "cat_expense_categories"),
    ("expense-statuses", "cat_expense_statuses"),
    ("project-statuses", "cat_project_statuses"),
    ("project-types", "cat_project_types"),
    ("project-areas", "cat_project_areas"),
    ("contract-types", "cat_contract_types"),
    ("contract-statuses", "cat_contract_statuses"),
    ("work-order-types", "cat_work_order_types"),
    ("work-order-statuses", "cat_work_order_statuses"),
    ("labor-types", "cat_labor_types"),
    ("units-of-measure", "cat_unit_of_measure"),
    ("material-categories", "cat_material_categories"),
    ("warehouse-locations", "cat_warehouse_locations"),
    ("transaction-types", "cat_transaction_types"),
    ("supplier-categories", "cat_supplier_categories"),
    ("purchase-order-statuses", "cat_purchase_order_statuses"),
    ("fuel-types", "cat_fuel_types"),
    ("ml-models", "cat_ml_models"),
];

#[derive(Debug, Clone, Copy, Serialize)]
pub struct CatalogInfo {
    pub name: &'static str,
    pub table: &'static str,
}

pub fn all_catalogs() -> Vec<CatalogInfo> {
    CATALOGS
        .iter()
        .map(|&(name, table)| CatalogInfo { name, table })
        .collect()
}

/// Tabla de un catálogo conocido; los nombres de tabla solo salen de esta lista
pub fn catalog_table(name: &str) -> Option<&'static str> {
    CATALOGS
        .iter()
        .find(|(catalog, _)| *catalog == name)
        .map(|&(_, table)| table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_lookup() {
        assert_eq!(catalog_table("units-of-measure"), Some("cat_unit_of_measure"));
        assert_eq!(catalog_table("warehouse-locations"), Some("cat_warehouse_locations"));
        assert_eq!(catalog_table("users"), None);
        assert_eq!(catalog_table("cat_roles"), None);
    }

    #[test]
    fn test_catalog_names_are_unique() {
        let mut names: Vec<_> = CATALOGS.iter().map(|(name, _)| *name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 28);
        assert_eq!(all_catalogs().len(), 28);
    }
}
