//! Escenarios contra PostgreSQL real
//!
//! Requieren `DATABASE_URL`; se ejecutan con `cargo test -- --ignored`.

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;

use erp_backend::config::environment::EnvironmentConfig;
use erp_backend::config::DatabaseConfig;
use erp_backend::controllers::customer_controller::CustomerController;
use erp_backend::controllers::fuel_requisition_controller::FuelRequisitionController;
use erp_backend::controllers::material_controller::MaterialController;
use erp_backend::controllers::pre_inventory_controller::PreInventoryController;
use erp_backend::controllers::warehouse_controller::WarehouseController;
use erp_backend::create_app;
use erp_backend::database::DatabaseConnection;
use erp_backend::dto::common_dto::ListQuery;
use erp_backend::dto::pre_inventory_dto::DiscrepancyQuery;
use erp_backend::state::AppState;
use erp_backend::utils::codes::parse_code;
use erp_backend::utils::errors::AppError;
use erp_backend::utils::jwt::{generate_token, JwtConfig};
use erp_backend::utils::stock::location_stock;

const SECRET: &str = "scenario-secret";

async fn setup() -> (PgPool, i32) {
    let config = DatabaseConfig::from_env().unwrap();
    let db = DatabaseConnection::new(&config).await.unwrap();
    db.run_migrations().await.unwrap();
    let pool = db.pool().clone();

    let person_id: i32 = sqlx::query_scalar("INSERT INTO people (person_names) VALUES ('Scenario') RETURNING id")
        .fetch_one(&pool)
        .await
        .unwrap();
    let email = format!("scenario-{}@erp.test", uuid::Uuid::new_v4());
    let user_id: i32 = sqlx::query_scalar(
        r#"
        INSERT INTO users (person_id, role_id, email, usr_password, username, lastname)
        VALUES ($1, 1, $2, 'x', 'scenario', 'tester')
        RETURNING id
        "#,
    )
    .bind(person_id)
    .bind(email)
    .fetch_one(&pool)
    .await
    .unwrap();

    (pool, user_id)
}

fn request<T: DeserializeOwned>(value: Value) -> T {
    serde_json::from_value(value).unwrap()
}

async fn new_material(pool: &PgPool, user_id: i32) -> i32 {
    let controller = MaterialController::new(pool.clone());
    let material = controller
        .create(
            request(json!({
                "material_name": "Cemento gris",
                "category_id": 1,
                "unit_of_measure_id": 2,
                "unit_cost": "150.00",
                "minimum_stock": "10"
            })),
            user_id,
        )
        .await
        .unwrap();
    material.id
}

#[tokio::test]
#[ignore]
async fn test_fuel_requisition_codes_are_sequential() {
    let (pool, user_id) = setup().await;
    let controller = FuelRequisitionController::new(pool.clone());

    let body = json!({
        "vehicle_equipment_name": "Retroexcavadora 3",
        "fuel_type": "diesel",
        "quantity_liters": "40",
        "unit_price": "24.50"
    });
    let first = controller.create(request(body.clone()), user_id).await.unwrap();
    let second = controller.create(request(body), user_id).await.unwrap();

    assert!(first.requisition_code.starts_with("FR-"));
    assert_eq!(first.requisition_code.len(), "FR-000001".len());
    let a = parse_code("FR-", &first.requisition_code).unwrap();
    let b = parse_code("FR-", &second.requisition_code).unwrap();
    assert_eq!(b, a + 1);
    assert_eq!(first.total_amount, Decimal::new(98000, 2));
}

#[tokio::test]
#[ignore]
async fn test_transfer_exceeding_stock_writes_nothing() {
    let (pool, user_id) = setup().await;
    let material_id = new_material(&pool, user_id).await;
    let warehouse = WarehouseController::new(pool.clone());

    warehouse
        .adjust(
            request(json!({
                "material_id": material_id,
                "warehouse_location_id": 1,
                "quantity": "5",
                "transaction_type": "entry"
            })),
            user_id,
        )
        .await
        .unwrap();

    let before: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM inventory_transactions WHERE material_id = $1")
        .bind(material_id)
        .fetch_one(&pool)
        .await
        .unwrap();

    let result = warehouse
        .transfer(
            request(json!({
                "material_id": material_id,
                "from_location_id": 1,
                "to_location_id": 2,
                "quantity": "8"
            })),
            user_id,
        )
        .await;

    match result {
        Err(AppError::BadRequest(msg)) => assert_eq!(msg, "Insufficient stock. Available: 5"),
        other => panic!("unexpected result: {:?}", other.map(|r| r.exit_transaction)),
    }

    let after: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM inventory_transactions WHERE material_id = $1")
        .bind(material_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
#[ignore]
async fn test_pre_inventory_cannot_be_adjusted_twice() {
    let (pool, user_id) = setup().await;
    let material_id = new_material(&pool, user_id).await;
    let controller = PreInventoryController::new(pool.clone());

    let record = controller
        .create(
            request(json!({ "material_id": material_id, "warehouse_location_id": 3 })),
            user_id,
        )
        .await
        .unwrap();
    controller
        .update_count(record.id, request(json!({ "counted_quantity": "12" })), user_id)
        .await
        .unwrap();

    let adjustment = controller.adjust(record.id, user_id).await.unwrap();
    assert_eq!(adjustment.adjustment_quantity, Decimal::from(12));
    assert_eq!(adjustment.adjustment_value, Decimal::new(180000, 2));

    match controller.adjust(record.id, user_id).await {
        Err(AppError::BadRequest(msg)) => assert_eq!(msg, "Adjustment already processed"),
        other => panic!("unexpected result: {:?}", other.map(|a| a.transaction_number)),
    }
}

#[tokio::test]
#[ignore]
async fn test_customer_soft_delete_keeps_row() {
    let (pool, user_id) = setup().await;
    let controller = CustomerController::new(pool.clone());

    let customer = controller
        .create(request(json!({ "company_name": "Constructora Norte" })), user_id)
        .await
        .unwrap();
    controller.delete(customer.id, user_id).await.unwrap();

    let is_active: bool = sqlx::query_scalar("SELECT is_active FROM customers WHERE id = $1")
        .bind(customer.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert!(!is_active);

    assert!(matches!(controller.get_by_id(customer.id).await, Err(AppError::NotFound(_))));
    match controller.delete(customer.id, user_id).await {
        Err(AppError::NotFound(msg)) => assert_eq!(msg, "Customer not found or already deleted"),
        other => panic!("unexpected result: {:?}", other),
    }
}

fn scenario_config() -> EnvironmentConfig {
    EnvironmentConfig {
        environment: "test".to_string(),
        port: 0,
        host: "127.0.0.1".to_string(),
        jwt_secret: SECRET.to_string(),
        jwt_expiration: 3600,
        cors_origins: vec!["http://localhost:4200".to_string()],
        upload_dir: std::env::temp_dir().join("erp-scenario-uploads").to_string_lossy().into_owned(),
        max_upload_size: 1024 * 1024,
    }
}

async fn get_customers(pool: &PgPool, token: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .uri("/api/customers")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let response = create_app(AppState::new(pool.clone(), scenario_config()))
        .oneshot(request)
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
#[ignore]
async fn test_inactive_user_token_is_rejected_by_middleware() {
    let (pool, user_id) = setup().await;
    let jwt = JwtConfig {
        secret: SECRET.to_string(),
        expiration: 3600,
    };
    let token = generate_token(user_id, "scenario@erp.test", 1, None, &jwt).unwrap();

    let (status, _) = get_customers(&pool, &token).await;
    assert_eq!(status, StatusCode::OK);

    sqlx::query("UPDATE users SET usr_active = FALSE WHERE id = $1")
        .bind(user_id)
        .execute(&pool)
        .await
        .unwrap();

    let (status, body) = get_customers(&pool, &token).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "User account is inactive.");
}

#[tokio::test]
#[ignore]
async fn test_expired_user_token_is_rejected_by_middleware() {
    let (pool, user_id) = setup().await;
    let jwt = JwtConfig {
        secret: SECRET.to_string(),
        expiration: 3600,
    };
    let token = generate_token(user_id, "scenario@erp.test", 1, None, &jwt).unwrap();

    sqlx::query("UPDATE users SET expiration_date = NOW() - INTERVAL '1 day' WHERE id = $1")
        .bind(user_id)
        .execute(&pool)
        .await
        .unwrap();

    let (status, body) = get_customers(&pool, &token).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "User account has expired.");
}

#[tokio::test]
#[ignore]
async fn test_empty_codes_are_generated() {
    let (pool, user_id) = setup().await;

    let requisition = FuelRequisitionController::new(pool.clone())
        .create(
            request(json!({
                "requisition_code": "",
                "vehicle_equipment_name": "Camión volteo 7",
                "fuel_type": "gasoline",
                "quantity_liters": "30",
                "unit_price": "22.00"
            })),
            user_id,
        )
        .await
        .unwrap();
    assert!(parse_code("FR-", &requisition.requisition_code).is_some());

    let material = MaterialController::new(pool.clone())
        .create(
            request(json!({
                "material_code": "  ",
                "material_name": "Varilla 3/8",
                "category_id": 1,
                "unit_of_measure_id": 2,
                "unit_cost": "95.00"
            })),
            user_id,
        )
        .await
        .unwrap();
    assert!(parse_code("MAT-", &material.material_code).is_some());
}

#[tokio::test]
#[ignore]
async fn test_location_stock_follows_ledger_signs() {
    let (pool, user_id) = setup().await;
    let material_id = new_material(&pool, user_id).await;
    let warehouse = WarehouseController::new(pool.clone());

    warehouse
        .adjust(
            request(json!({
                "material_id": material_id,
                "warehouse_location_id": 1,
                "quantity": "10",
                "transaction_type": "entry"
            })),
            user_id,
        )
        .await
        .unwrap();

    // salida guardada con cantidad positiva: el alias decide el signo
    sqlx::query(
        r#"
        INSERT INTO inventory_transactions (transaction_number, material_id, transaction_type_id,
                                            warehouse_location_id, quantity, created_by)
        VALUES ($1, $2, 2, 1, 3, $3)
        "#,
    )
    .bind(format!("LEGACY-{}", &uuid::Uuid::new_v4().simple().to_string()[..12]))
    .bind(material_id)
    .bind(user_id)
    .execute(&pool)
    .await
    .unwrap();

    warehouse
        .transfer(
            request(json!({
                "material_id": material_id,
                "from_location_id": 1,
                "to_location_id": 2,
                "quantity": "4"
            })),
            user_id,
        )
        .await
        .unwrap();
    warehouse
        .adjust(
            request(json!({
                "material_id": material_id,
                "warehouse_location_id": 2,
                "quantity": "1",
                "transaction_type": "adjustment"
            })),
            user_id,
        )
        .await
        .unwrap();

    let mut conn = pool.acquire().await.unwrap();
    assert_eq!(location_stock(&mut *conn, material_id, 1).await.unwrap(), Decimal::from(3));
    assert_eq!(location_stock(&mut *conn, material_id, 2).await.unwrap(), Decimal::from(5));
}

#[tokio::test]
#[ignore]
async fn test_discrepancy_report_keeps_cancelled_counts() {
    let (pool, user_id) = setup().await;
    let material_id = new_material(&pool, user_id).await;
    let controller = PreInventoryController::new(pool.clone());

    let record = controller
        .create(
            request(json!({ "material_id": material_id, "warehouse_location_id": 2 })),
            user_id,
        )
        .await
        .unwrap();
    controller
        .update_count(record.id, request(json!({ "counted_quantity": "4" })), user_id)
        .await
        .unwrap();
    controller.cancel(record.id, user_id).await.unwrap();

    let report = controller
        .discrepancy_report(DiscrepancyQuery {
            location_id: Some(2),
            start_date: None,
            end_date: None,
            only_discrepancies: None,
        })
        .await
        .unwrap();
    assert!(report.details.iter().any(|row| row.id == record.id));
}

#[tokio::test]
#[ignore]
async fn test_total_pages_is_ceiling() {
    let (pool, user_id) = setup().await;
    let controller = CustomerController::new(pool.clone());
    for i in 0..3 {
        controller
            .create(request(json!({ "company_name": format!("Paginación {}", i) })), user_id)
            .await
            .unwrap();
    }

    let page = controller
        .list(ListQuery {
            page: Some(1),
            limit: Some(2),
            search: None,
        })
        .await
        .unwrap();
    let total = page.pagination.total_items;
    assert!(total >= 3);
    assert_eq!(page.pagination.total_pages, (total + 1) / 2);
    assert_eq!(page.pagination.items_per_page, 2);
}
