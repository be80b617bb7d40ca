use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::category::Category;

/// Expense entity representing a single monetary transaction
///
/// The price may be negative to represent refunds or adjustments. The linked
/// category is eagerly attached on every read and cleared (not cascaded) when
/// the category is deleted.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Expense {
    pub id: i32,
    #[schema(value_type = String, example = "42.50")]
    pub price: Decimal,
    pub expended_on: DateTime<Utc>,
    pub reason: String,
    pub category: Option<Category>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Expense fields as written by the repository
#[derive(Debug, Clone)]
pub struct NewExpense {
    pub price: Decimal,
    pub expended_on: DateTime<Utc>,
    pub reason: String,
    pub category_id: Option<i32>,
}

/// Request payload for creating a new expense
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "price": "117.99",
    "reason": "Weekly groceries",
    "expended_on": "2024-01-15T12:00:00Z",
    "category": 1
}))]
pub struct CreateExpenseRequest {
    #[schema(value_type = String, example = "117.99")]
    pub price: Decimal,

    #[validate(custom(function = crate::validation::validate_reason))]
    #[schema(min_length = 1, example = "Weekly groceries")]
    pub reason: String,

    pub expended_on: DateTime<Utc>,

    /// Optional category id; resolved to the full category before persisting
    pub category: Option<i32>,
}

/// Request payload for replacing an existing expense
///
/// Price, reason and date are overwritten. The category link is replaced only
/// when a category id is given, otherwise the existing link is kept.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "price": "89.00",
    "reason": "Corrected amount",
    "expended_on": "2024-01-16T12:00:00Z"
}))]
pub struct UpdateExpenseRequest {
    #[schema(value_type = String, example = "89.00")]
    pub price: Decimal,

    #[validate(custom(function = crate::validation::validate_reason))]
    #[schema(min_length = 1, example = "Corrected amount")]
    pub reason: String,

    pub expended_on: DateTime<Utc>,

    pub category: Option<i32>,
}
