use serde::Deserialize;
use utoipa::IntoParams;

use crate::models::category::CategoryType;

/// Query parameters for filtering list endpoints by category type
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct CategoryTypeFilter {
    #[serde(rename = "type")]
    #[param(rename = "type")]
    pub category_type: Option<CategoryType>,
}
