use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use validator::Validate;

use crate::handlers::{validation_error_response, ErrorResponse};
use crate::models::category::{Category, CreateCategoryRequest, UpdateCategoryRequest};
use crate::models::filters::CategoryTypeFilter;
use crate::services::category_service::{CategoryError, CategoryService};

/// Convert CategoryError to HTTP response
impl IntoResponse for CategoryError {
    fn into_response(self) -> Response {
        let (status, error_type) = match self {
            CategoryError::DuplicateCategory { .. } => (StatusCode::CONFLICT, "category_exists"),
            CategoryError::CategoryNotFound(_) => (StatusCode::NOT_FOUND, "category_not_found"),
            CategoryError::DatabaseError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "database_error")
            }
        };

        let error_response = ErrorResponse::new(error_type, &self.to_string());
        (status, Json(error_response)).into_response()
    }
}

/// Handler for creating a category
///
/// Fails with 409 when a category with the same name (case-insensitive) and
/// type already exists.
#[utoipa::path(
    post,
    path = "/category",
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category successfully created", body = Category),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 409, description = "Category already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "category"
)]
pub async fn create_category_handler(
    State(category_service): State<Arc<dyn CategoryService>>,
    Json(request): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<Category>), Response> {
    if let Err(validation_errors) = request.validate() {
        return Err(validation_error_response(validation_errors));
    }

    match category_service.create_category(request).await {
        Ok(category) => Ok((StatusCode::CREATED, Json(category))),
        Err(e) => Err(e.into_response()),
    }
}

/// Handler for listing categories
///
/// Returns all categories, or only those of the given type when the `type`
/// query parameter is present.
#[utoipa::path(
    get,
    path = "/category",
    params(CategoryTypeFilter),
    responses(
        (status = 200, description = "List of categories", body = Vec<Category>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "category"
)]
pub async fn list_categories_handler(
    State(category_service): State<Arc<dyn CategoryService>>,
    Query(params): Query<CategoryTypeFilter>,
) -> Result<Json<Vec<Category>>, Response> {
    let result = match params.category_type {
        Some(category_type) => category_service.get_categories_by_type(category_type).await,
        None => category_service.get_categories().await,
    };

    match result {
        Ok(categories) => Ok(Json(categories)),
        Err(e) => Err(e.into_response()),
    }
}

/// Handler for fetching a single category
#[utoipa::path(
    get,
    path = "/category/{id}",
    params(
        ("id" = i32, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "The category", body = Category),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "category"
)]
pub async fn get_category_handler(
    State(category_service): State<Arc<dyn CategoryService>>,
    Path(id): Path<i32>,
) -> Result<Json<Category>, Response> {
    match category_service.get_category(id).await {
        Ok(category) => Ok(Json(category)),
        Err(e) => Err(e.into_response()),
    }
}

/// Handler for updating a category
///
/// Replaces name and type; the uniqueness identifier is recomputed.
#[utoipa::path(
    patch,
    path = "/category/{id}",
    params(
        ("id" = i32, Path, description = "Category ID")
    ),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Category successfully updated", body = Category),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "category"
)]
pub async fn update_category_handler(
    State(category_service): State<Arc<dyn CategoryService>>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateCategoryRequest>,
) -> Result<(StatusCode, Json<Category>), Response> {
    if let Err(validation_errors) = request.validate() {
        return Err(validation_error_response(validation_errors));
    }

    match category_service.update_category(id, request).await {
        Ok(category) => Ok((StatusCode::OK, Json(category))),
        Err(e) => Err(e.into_response()),
    }
}

/// Handler for deleting a category
///
/// Expenses referencing the category keep existing; their category link is
/// cleared by the store.
#[utoipa::path(
    delete,
    path = "/category/{id}",
    params(
        ("id" = i32, Path, description = "Category ID")
    ),
    responses(
        (status = 204, description = "Category successfully deleted"),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "category"
)]
pub async fn delete_category_handler(
    State(category_service): State<Arc<dyn CategoryService>>,
    Path(id): Path<i32>,
) -> Result<StatusCode, Response> {
    match category_service.delete_category(id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => Err(e.into_response()),
    }
}
