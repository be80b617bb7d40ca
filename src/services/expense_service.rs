use async_trait::async_trait;
use std::sync::Arc;

use crate::models::category::{Category, CategoryType};
use crate::models::expense::{CreateExpenseRequest, Expense, NewExpense, UpdateExpenseRequest};
use crate::repositories::expense_repository::ExpenseRepository;
use crate::repositories::RepositoryError;
use crate::services::category_service::{CategoryError, CategoryService};

/// Expense service errors
#[derive(Debug, thiserror::Error)]
pub enum ExpenseError {
    #[error("Expense with id {0} not found.")]
    ExpenseNotFound(i32),

    #[error("Category with ID '{0}' was not found.")]
    CategoryNotFound(i32),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<RepositoryError> for ExpenseError {
    fn from(err: RepositoryError) -> Self {
        ExpenseError::DatabaseError(err.to_string())
    }
}

/// Trait defining expense service operations
#[async_trait]
pub trait ExpenseService: Send + Sync {
    /// Create a new expense; a given category id is resolved to the full
    /// category record before persisting
    async fn create_expense(&self, request: CreateExpenseRequest)
        -> Result<Expense, ExpenseError>;

    /// Get all expenses with their category attached
    async fn get_expenses(&self) -> Result<Vec<Expense>, ExpenseError>;

    /// Get all expenses whose linked category has the given type
    async fn get_expenses_by_category_type(
        &self,
        category_type: CategoryType,
    ) -> Result<Vec<Expense>, ExpenseError>;

    /// Get a single expense by id
    async fn get_expense(&self, id: i32) -> Result<Expense, ExpenseError>;

    /// Replace price, reason and date of an existing expense; the category
    /// link is replaced only when a category id is given
    async fn update_expense(
        &self,
        id: i32,
        request: UpdateExpenseRequest,
    ) -> Result<Expense, ExpenseError>;

    /// Delete an expense by id
    async fn delete_expense(&self, id: i32) -> Result<(), ExpenseError>;
}

/// Implementation of ExpenseService
pub struct ExpenseServiceImpl {
    expense_repository: Arc<dyn ExpenseRepository>,
    category_service: Arc<dyn CategoryService>,
}

impl ExpenseServiceImpl {
    pub fn new(
        expense_repository: Arc<dyn ExpenseRepository>,
        category_service: Arc<dyn CategoryService>,
    ) -> Self {
        Self {
            expense_repository,
            category_service,
        }
    }

    async fn resolve_category(&self, id: i32) -> Result<Category, ExpenseError> {
        self.category_service
            .get_category(id)
            .await
            .map_err(|e| match e {
                CategoryError::CategoryNotFound(id) => ExpenseError::CategoryNotFound(id),
                other => ExpenseError::DatabaseError(other.to_string()),
            })
    }
}

#[async_trait]
impl ExpenseService for ExpenseServiceImpl {
    async fn create_expense(
        &self,
        request: CreateExpenseRequest,
    ) -> Result<Expense, ExpenseError> {
        let category = match request.category {
            Some(category_id) => Some(self.resolve_category(category_id).await?),
            None => None,
        };

        let entry = NewExpense {
            price: request.price,
            expended_on: request.expended_on,
            reason: request.reason,
            category_id: category.map(|c| c.id),
        };

        Ok(self.expense_repository.create(entry).await?)
    }

    async fn get_expenses(&self) -> Result<Vec<Expense>, ExpenseError> {
        Ok(self.expense_repository.find_all().await?)
    }

    async fn get_expenses_by_category_type(
        &self,
        category_type: CategoryType,
    ) -> Result<Vec<Expense>, ExpenseError> {
        Ok(self
            .expense_repository
            .find_by_category_type(category_type)
            .await?)
    }

    async fn get_expense(&self, id: i32) -> Result<Expense, ExpenseError> {
        self.expense_repository
            .find_by_id(id)
            .await?
            .ok_or(ExpenseError::ExpenseNotFound(id))
    }

    async fn update_expense(
        &self,
        id: i32,
        request: UpdateExpenseRequest,
    ) -> Result<Expense, ExpenseError> {
        let existing = self.get_expense(id).await?;

        // Keep the current category link unless the request names a new one.
        let category_id = match request.category {
            Some(category_id) => Some(self.resolve_category(category_id).await?.id),
            None => existing.category.map(|c| c.id),
        };

        self.expense_repository
            .update(
                id,
                NewExpense {
                    price: request.price,
                    expended_on: request.expended_on,
                    reason: request.reason,
                    category_id,
                },
            )
            .await?;

        // Return the freshly reloaded entity.
        self.get_expense(id).await
    }

    async fn delete_expense(&self, id: i32) -> Result<(), ExpenseError> {
        self.get_expense(id).await?;

        Ok(self.expense_repository.delete(id).await?)
    }
}
