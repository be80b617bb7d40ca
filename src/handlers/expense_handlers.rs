use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use validator::Validate;

use crate::handlers::{validation_error_response, ErrorResponse};
use crate::models::expense::{CreateExpenseRequest, Expense, UpdateExpenseRequest};
use crate::models::filters::CategoryTypeFilter;
use crate::services::expense_service::{ExpenseError, ExpenseService};

/// Convert ExpenseError to HTTP response
impl IntoResponse for ExpenseError {
    fn into_response(self) -> Response {
        let (status, error_type) = match self {
            ExpenseError::ExpenseNotFound(_) => (StatusCode::NOT_FOUND, "expense_not_found"),
            ExpenseError::CategoryNotFound(_) => (StatusCode::NOT_FOUND, "category_not_found"),
            ExpenseError::DatabaseError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "database_error"),
        };

        let error_response = ErrorResponse::new(error_type, &self.to_string());
        (status, Json(error_response)).into_response()
    }
}

/// Handler for creating an expense
///
/// When a category id is given it is resolved to the full category record
/// before persisting; an unknown id fails with 404.
#[utoipa::path(
    post,
    path = "/expense",
    request_body = CreateExpenseRequest,
    responses(
        (status = 201, description = "Expense successfully created", body = Expense),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "expense"
)]
pub async fn create_expense_handler(
    State(expense_service): State<Arc<dyn ExpenseService>>,
    Json(request): Json<CreateExpenseRequest>,
) -> Result<(StatusCode, Json<Expense>), Response> {
    if let Err(validation_errors) = request.validate() {
        return Err(validation_error_response(validation_errors));
    }

    match expense_service.create_expense(request).await {
        Ok(expense) => Ok((StatusCode::CREATED, Json(expense))),
        Err(e) => Err(e.into_response()),
    }
}

/// Handler for listing expenses
///
/// Returns all expenses with their category attached, or only those whose
/// category has the given type when the `type` query parameter is present.
/// Uncategorized expenses are excluded from a filtered listing.
#[utoipa::path(
    get,
    path = "/expense",
    params(CategoryTypeFilter),
    responses(
        (status = 200, description = "List of expenses", body = Vec<Expense>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "expense"
)]
pub async fn list_expenses_handler(
    State(expense_service): State<Arc<dyn ExpenseService>>,
    Query(params): Query<CategoryTypeFilter>,
) -> Result<Json<Vec<Expense>>, Response> {
    let result = match params.category_type {
        Some(category_type) => {
            expense_service
                .get_expenses_by_category_type(category_type)
                .await
        }
        None => expense_service.get_expenses().await,
    };

    match result {
        Ok(expenses) => Ok(Json(expenses)),
        Err(e) => Err(e.into_response()),
    }
}

/// Handler for fetching a single expense
#[utoipa::path(
    get,
    path = "/expense/{id}",
    params(
        ("id" = i32, Path, description = "Expense ID")
    ),
    responses(
        (status = 200, description = "The expense", body = Expense),
        (status = 404, description = "Expense not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "expense"
)]
pub async fn get_expense_handler(
    State(expense_service): State<Arc<dyn ExpenseService>>,
    Path(id): Path<i32>,
) -> Result<Json<Expense>, Response> {
    match expense_service.get_expense(id).await {
        Ok(expense) => Ok(Json(expense)),
        Err(e) => Err(e.into_response()),
    }
}

/// Handler for updating an expense
///
/// Replaces price, reason and date; the category link is replaced only when a
/// category id is given.
#[utoipa::path(
    patch,
    path = "/expense/{id}",
    params(
        ("id" = i32, Path, description = "Expense ID")
    ),
    request_body = UpdateExpenseRequest,
    responses(
        (status = 200, description = "Expense successfully updated", body = Expense),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 404, description = "Expense or category not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "expense"
)]
pub async fn update_expense_handler(
    State(expense_service): State<Arc<dyn ExpenseService>>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateExpenseRequest>,
) -> Result<(StatusCode, Json<Expense>), Response> {
    if let Err(validation_errors) = request.validate() {
        return Err(validation_error_response(validation_errors));
    }

    match expense_service.update_expense(id, request).await {
        Ok(expense) => Ok((StatusCode::OK, Json(expense))),
        Err(e) => Err(e.into_response()),
    }
}

/// Handler for deleting an expense
#[utoipa::path(
    delete,
    path = "/expense/{id}",
    params(
        ("id" = i32, Path, description = "Expense ID")
    ),
    responses(
        (status = 204, description = "Expense successfully deleted"),
        (status = 404, description = "Expense not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "expense"
)]
pub async fn delete_expense_handler(
    State(expense_service): State<Arc<dyn ExpenseService>>,
    Path(id): Path<i32>,
) -> Result<StatusCode, Response> {
    match expense_service.delete_expense(id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => Err(e.into_response()),
    }
}
