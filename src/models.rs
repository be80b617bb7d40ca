pub mod category;
pub mod expense;
pub mod filters;

pub use category::{
    Category, CategoryType, CreateCategoryRequest, NewCategory, UpdateCategoryRequest,
};
pub use expense::{CreateExpenseRequest, Expense, NewExpense, UpdateExpenseRequest};
pub use filters::CategoryTypeFilter;
