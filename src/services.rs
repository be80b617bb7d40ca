pub mod category_service;
pub mod expense_service;
