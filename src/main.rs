use axum::{
    routing::{get, post},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use expense_tracker::handlers::category_handlers::{
    create_category_handler, delete_category_handler, get_category_handler,
    list_categories_handler, update_category_handler,
};
use expense_tracker::handlers::expense_handlers::{
    create_expense_handler, delete_expense_handler, get_expense_handler, list_expenses_handler,
    update_expense_handler,
};
use expense_tracker::handlers::ErrorResponse;
use expense_tracker::models::category::{
    Category, CategoryType, CreateCategoryRequest, UpdateCategoryRequest,
};
use expense_tracker::models::expense::{CreateExpenseRequest, Expense, UpdateExpenseRequest};
use expense_tracker::repositories::category_repository::PostgresCategoryRepository;
use expense_tracker::repositories::expense_repository::PostgresExpenseRepository;
use expense_tracker::services::category_service::{CategoryService, CategoryServiceImpl};
use expense_tracker::services::expense_service::{ExpenseService, ExpenseServiceImpl};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        expense_tracker::handlers::category_handlers::create_category_handler,
        expense_tracker::handlers::category_handlers::list_categories_handler,
        expense_tracker::handlers::category_handlers::get_category_handler,
        expense_tracker::handlers::category_handlers::update_category_handler,
        expense_tracker::handlers::category_handlers::delete_category_handler,
        expense_tracker::handlers::expense_handlers::create_expense_handler,
        expense_tracker::handlers::expense_handlers::list_expenses_handler,
        expense_tracker::handlers::expense_handlers::get_expense_handler,
        expense_tracker::handlers::expense_handlers::update_expense_handler,
        expense_tracker::handlers::expense_handlers::delete_expense_handler,
    ),
    components(
        schemas(
            Category,
            CategoryType,
            CreateCategoryRequest,
            UpdateCategoryRequest,
            Expense,
            CreateExpenseRequest,
            UpdateExpenseRequest,
            ErrorResponse,
        )
    ),
    tags(
        (name = "category", description = "Income/expense category endpoints"),
        (name = "expense", description = "Expense endpoints")
    ),
    info(
        title = "Expense Tracker API",
        version = "0.1.0",
        description = "REST API for bookkeeping income/expense categories and expenses",
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::fmt().init();

    // Get configuration from environment
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "8080".to_string());

    // Create database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    info!("connected to database");

    // Run migrations
    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("migrations completed");

    // Initialize repositories
    let category_repository = Arc::new(PostgresCategoryRepository::new(pool.clone()));
    let expense_repository = Arc::new(PostgresExpenseRepository::new(pool.clone()));

    // Initialize services
    let category_service: Arc<dyn CategoryService> =
        Arc::new(CategoryServiceImpl::new(category_repository));
    let expense_service: Arc<dyn ExpenseService> = Arc::new(ExpenseServiceImpl::new(
        expense_repository,
        category_service.clone(),
    ));

    // Build router with routes
    let category_routes = Router::new()
        .route(
            "/category",
            post(create_category_handler).get(list_categories_handler),
        )
        .route(
            "/category/:id",
            get(get_category_handler)
                .patch(update_category_handler)
                .delete(delete_category_handler),
        )
        .with_state(category_service);

    let expense_routes = Router::new()
        .route(
            "/expense",
            post(create_expense_handler).get(list_expenses_handler),
        )
        .route(
            "/expense/:id",
            get(get_expense_handler)
                .patch(update_expense_handler)
                .delete(delete_expense_handler),
        )
        .with_state(expense_service);

    let app = Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        .merge(category_routes)
        .merge(expense_routes)
        // Merge Swagger UI
        .merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", ApiDoc::openapi()))
        // Add CORS middleware
        .layer(CorsLayer::permissive());

    // Start server
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("server running on http://{}", addr);
    info!("API docs at http://{}/api/docs", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
