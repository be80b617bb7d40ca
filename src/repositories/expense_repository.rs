use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::models::category::{Category, CategoryType};
use crate::models::expense::{Expense, NewExpense};
use crate::repositories::RepositoryError;

/// Trait defining expense repository operations
///
/// All reads attach the linked category eagerly.
#[async_trait]
pub trait ExpenseRepository: Send + Sync {
    /// Create a new expense; id and timestamps are assigned by the store
    async fn create(&self, expense: NewExpense) -> Result<Expense, RepositoryError>;

    /// Find all expenses in store order
    async fn find_all(&self) -> Result<Vec<Expense>, RepositoryError>;

    /// Find all expenses whose linked category has the given type;
    /// uncategorized expenses are excluded
    async fn find_by_category_type(
        &self,
        category_type: CategoryType,
    ) -> Result<Vec<Expense>, RepositoryError>;

    /// Find an expense by id
    async fn find_by_id(&self, id: i32) -> Result<Option<Expense>, RepositoryError>;

    /// Overwrite price, reason, date and category link of an existing expense
    async fn update(&self, id: i32, expense: NewExpense) -> Result<(), RepositoryError>;

    /// Delete an expense by id
    async fn delete(&self, id: i32) -> Result<(), RepositoryError>;
}

/// PostgreSQL implementation of ExpenseRepository
///
/// Prices cross the storage boundary as fixed-precision strings through the
/// DecimalTransformer.
pub struct PostgresExpenseRepository {
    pool: PgPool,
    transformer: crate::transformer::DecimalTransformer,
}

impl PostgresExpenseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            transformer: crate::transformer::DecimalTransformer::default(),
        }
    }

    fn expense_from_row(&self, row: &PgRow) -> Result<Expense, RepositoryError> {
        let price_str: String = row.try_get("price")?;
        let price = self
            .transformer
            .from_storage(Some(&price_str))
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        let category_id: Option<i32> = row.try_get("category_id")?;
        let category = match category_id {
            Some(id) => {
                let type_str: String = row.try_get("category_type")?;
                let category_type = CategoryType::from_db_string(&type_str).ok_or_else(|| {
                    RepositoryError::DatabaseError(format!("unknown category type '{}'", type_str))
                })?;
                let created_at: DateTime<Utc> = row.try_get("category_created_at")?;
                let updated_at: DateTime<Utc> = row.try_get("category_updated_at")?;

                Some(Category {
                    id,
                    name: row.try_get("name")?,
                    category_type,
                    identifier: row.try_get("identifier")?,
                    created_at,
                    updated_at,
                })
            }
            None => None,
        };

        Ok(Expense {
            id: row.try_get("expense_id")?,
            price,
            expended_on: row.try_get("expended_on")?,
            reason: row.try_get("reason")?,
            category,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

const EXPENSE_SELECT: &str = r#"
    SELECT e.expense_id, e.price, e.expended_on, e.reason,
           e.created_at, e.updated_at,
           c.category_id, c.name, c.category_type, c.identifier,
           c.created_at AS category_created_at,
           c.updated_at AS category_updated_at
    FROM expense e
    LEFT JOIN category c ON c.category_id = e.category_id
"#;

#[async_trait]
impl ExpenseRepository for PostgresExpenseRepository {
    async fn create(&self, expense: NewExpense) -> Result<Expense, RepositoryError> {
        let price_str = self.transformer.format(expense.price);

        let row = sqlx::query(
            r#"
            INSERT INTO expense (price, expended_on, reason, category_id)
            VALUES ($1, $2, $3, $4)
            RETURNING expense_id
            "#,
        )
        .bind(&price_str)
        .bind(expense.expended_on)
        .bind(&expense.reason)
        .bind(expense.category_id)
        .fetch_one(&self.pool)
        .await?;

        let id: i32 = row.try_get("expense_id")?;

        // Reload with the category join so the returned entity matches reads.
        self.find_by_id(id)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    async fn find_all(&self) -> Result<Vec<Expense>, RepositoryError> {
        let query = format!("{} ORDER BY e.expense_id", EXPENSE_SELECT);
        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;

        rows.iter().map(|row| self.expense_from_row(row)).collect()
    }

    async fn find_by_category_type(
        &self,
        category_type: CategoryType,
    ) -> Result<Vec<Expense>, RepositoryError> {
        let query = format!(
            "{} WHERE c.category_type = $1 ORDER BY e.expense_id",
            EXPENSE_SELECT
        );
        let rows = sqlx::query(&query)
            .bind(category_type.to_db_string())
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(|row| self.expense_from_row(row)).collect()
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Expense>, RepositoryError> {
        let query = format!("{} WHERE e.expense_id = $1", EXPENSE_SELECT);
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref()
            .map(|row| self.expense_from_row(row))
            .transpose()
    }

    async fn update(&self, id: i32, expense: NewExpense) -> Result<(), RepositoryError> {
        let price_str = self.transformer.format(expense.price);

        let result = sqlx::query(
            r#"
            UPDATE expense
            SET price = $2,
                expended_on = $3,
                reason = $4,
                category_id = $5,
                updated_at = NOW()
            WHERE expense_id = $1
            "#,
        )
        .bind(id)
        .bind(&price_str)
        .bind(expense.expended_on)
        .bind(&expense.reason)
        .bind(expense.category_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn delete(&self, id: i32) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM expense WHERE expense_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
