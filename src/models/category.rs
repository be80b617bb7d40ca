use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Kind of a category - income or expense classification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum CategoryType {
    Income,
    Expense,
}

impl CategoryType {
    /// Convert to the string stored in the database
    pub fn to_db_string(self) -> &'static str {
        match self {
            CategoryType::Income => "INCOME",
            CategoryType::Expense => "EXPENSE",
        }
    }

    /// Parse from the string stored in the database
    pub fn from_db_string(value: &str) -> Option<Self> {
        match value {
            "INCOME" => Some(CategoryType::Income),
            "EXPENSE" => Some(CategoryType::Expense),
            _ => None,
        }
    }
}

impl fmt::Display for CategoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_string())
    }
}

/// Category entity representing an income/expense classification
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: i32,
    pub name: String,
    #[serde(rename = "type")]
    pub category_type: CategoryType,
    /// Normalized string derived from name and type, used for duplicate detection
    pub identifier: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Category fields as written by the repository; id and timestamps are
/// assigned by the store
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub category_type: CategoryType,
    pub identifier: String,
}

/// Request payload for creating a new category
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "name": "Groceries",
    "type": "EXPENSE"
}))]
pub struct CreateCategoryRequest {
    #[validate(custom(function = crate::validation::validate_category_name))]
    #[schema(min_length = 1, max_length = 40, example = "Groceries")]
    pub name: String,

    #[serde(rename = "type")]
    pub category_type: CategoryType,
}

/// Request payload for replacing an existing category
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "name": "Household",
    "type": "EXPENSE"
}))]
pub struct UpdateCategoryRequest {
    #[validate(custom(function = crate::validation::validate_category_name))]
    #[schema(min_length = 1, max_length = 40, example = "Household")]
    pub name: String,

    #[serde(rename = "type")]
    pub category_type: CategoryType,
}
