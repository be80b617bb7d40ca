use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::models::category::{Category, CategoryType, NewCategory};
use crate::repositories::RepositoryError;

/// Trait defining category repository operations
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Create a new category; id and timestamps are assigned by the store
    async fn create(&self, category: NewCategory) -> Result<Category, RepositoryError>;

    /// Find all categories in store order
    async fn find_all(&self) -> Result<Vec<Category>, RepositoryError>;

    /// Find all categories of a given type
    async fn find_by_type(
        &self,
        category_type: CategoryType,
    ) -> Result<Vec<Category>, RepositoryError>;

    /// Find a category by id
    async fn find_by_id(&self, id: i32) -> Result<Option<Category>, RepositoryError>;

    /// Find categories whose name matches case-insensitively within a type,
    /// used for duplicate detection
    async fn find_by_name_and_type(
        &self,
        name: &str,
        category_type: CategoryType,
    ) -> Result<Vec<Category>, RepositoryError>;

    /// Overwrite name, type and identifier of an existing category
    async fn update(&self, id: i32, category: NewCategory) -> Result<(), RepositoryError>;

    /// Delete a category by id; expense references are cleared by the store
    async fn delete(&self, id: i32) -> Result<(), RepositoryError>;
}

/// PostgreSQL implementation of CategoryRepository
pub struct PostgresCategoryRepository {
    pool: PgPool,
}

impl PostgresCategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Map a category row into the domain record
fn category_from_row(row: &PgRow) -> Result<Category, RepositoryError> {
    let type_str: String = row.try_get("category_type")?;
    let category_type = CategoryType::from_db_string(&type_str).ok_or_else(|| {
        RepositoryError::DatabaseError(format!("unknown category type '{}'", type_str))
    })?;

    Ok(Category {
        id: row.try_get("category_id")?,
        name: row.try_get("name")?,
        category_type,
        identifier: row.try_get("identifier")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn create(&self, category: NewCategory) -> Result<Category, RepositoryError> {
        let row = sqlx::query(
            r#"
            INSERT INTO category (name, category_type, identifier)
            VALUES ($1, $2, $3)
            RETURNING category_id, name, category_type, identifier, created_at, updated_at
            "#,
        )
        .bind(&category.name)
        .bind(category.category_type.to_db_string())
        .bind(&category.identifier)
        .fetch_one(&self.pool)
        .await?;

        category_from_row(&row)
    }

    async fn find_all(&self) -> Result<Vec<Category>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT category_id, name, category_type, identifier, created_at, updated_at
            FROM category
            ORDER BY category_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(category_from_row).collect()
    }

    async fn find_by_type(
        &self,
        category_type: CategoryType,
    ) -> Result<Vec<Category>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT category_id, name, category_type, identifier, created_at, updated_at
            FROM category
            WHERE category_type = $1
            ORDER BY category_id
            "#,
        )
        .bind(category_type.to_db_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(category_from_row).collect()
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Category>, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT category_id, name, category_type, identifier, created_at, updated_at
            FROM category
            WHERE category_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(category_from_row).transpose()
    }

    async fn find_by_name_and_type(
        &self,
        name: &str,
        category_type: CategoryType,
    ) -> Result<Vec<Category>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT category_id, name, category_type, identifier, created_at, updated_at
            FROM category
            WHERE LOWER(name) = LOWER($1) AND category_type = $2
            "#,
        )
        .bind(name)
        .bind(category_type.to_db_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(category_from_row).collect()
    }

    async fn update(&self, id: i32, category: NewCategory) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE category
            SET name = $2,
                category_type = $3,
                identifier = $4,
                updated_at = NOW()
            WHERE category_id = $1
            "#,
        )
        .bind(id)
        .bind(&category.name)
        .bind(category.category_type.to_db_string())
        .bind(&category.identifier)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn delete(&self, id: i32) -> Result<(), RepositoryError> {
        // The FK on expense.category_id is ON DELETE SET NULL, so referencing
        // expenses keep existing with an empty category link.
        let result = sqlx::query("DELETE FROM category WHERE category_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
