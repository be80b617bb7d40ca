use async_trait::async_trait;
use std::sync::Arc;

use crate::models::category::{
    Category, CategoryType, CreateCategoryRequest, NewCategory, UpdateCategoryRequest,
};
use crate::repositories::category_repository::CategoryRepository;
use crate::repositories::RepositoryError;

/// Category service errors
#[derive(Debug, thiserror::Error)]
pub enum CategoryError {
    #[error("Category with name '{name}' and type '{category_type}' already exists.")]
    DuplicateCategory {
        name: String,
        category_type: CategoryType,
    },

    #[error("Category with ID '{0}' was not found.")]
    CategoryNotFound(i32),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<RepositoryError> for CategoryError {
    fn from(err: RepositoryError) -> Self {
        CategoryError::DatabaseError(err.to_string())
    }
}

/// Derive the uniqueness identifier for a category from its trimmed,
/// lowercased name suffixed with the lowercased type
fn derive_identifier(name: &str, category_type: CategoryType) -> String {
    format!(
        "{}_{}",
        name.trim().to_lowercase(),
        category_type.to_db_string().to_lowercase()
    )
}

/// Trait defining category service operations
#[async_trait]
pub trait CategoryService: Send + Sync {
    /// Create a new category, failing with DuplicateCategory when another
    /// category with the same derived identifier and type already exists
    async fn create_category(
        &self,
        request: CreateCategoryRequest,
    ) -> Result<Category, CategoryError>;

    /// Get all categories in store order
    async fn get_categories(&self) -> Result<Vec<Category>, CategoryError>;

    /// Get all categories of a given type
    async fn get_categories_by_type(
        &self,
        category_type: CategoryType,
    ) -> Result<Vec<Category>, CategoryError>;

    /// Get a single category by id
    async fn get_category(&self, id: i32) -> Result<Category, CategoryError>;

    /// Replace name and type of an existing category, recomputing its identifier
    async fn update_category(
        &self,
        id: i32,
        request: UpdateCategoryRequest,
    ) -> Result<Category, CategoryError>;

    /// Delete a category by id
    async fn delete_category(&self, id: i32) -> Result<(), CategoryError>;
}

/// Implementation of CategoryService
pub struct CategoryServiceImpl {
    category_repository: Arc<dyn CategoryRepository>,
}

impl CategoryServiceImpl {
    pub fn new(category_repository: Arc<dyn CategoryRepository>) -> Self {
        Self {
            category_repository,
        }
    }
}

#[async_trait]
impl CategoryService for CategoryServiceImpl {
    async fn create_category(
        &self,
        request: CreateCategoryRequest,
    ) -> Result<Category, CategoryError> {
        let name = request.name.trim().to_string();
        let identifier = derive_identifier(&name, request.category_type);

        // Case-insensitive name match at query time, exact identifier equality
        // at comparison time.
        let existing = self
            .category_repository
            .find_by_name_and_type(&name, request.category_type)
            .await?;

        if existing.iter().any(|c| c.identifier == identifier) {
            return Err(CategoryError::DuplicateCategory {
                name,
                category_type: request.category_type,
            });
        }

        self.category_repository
            .create(NewCategory {
                name: name.clone(),
                category_type: request.category_type,
                identifier,
            })
            .await
            .map_err(|e| match e {
                // A concurrent create can still trip the unique constraint.
                RepositoryError::ConstraintViolation(_) => CategoryError::DuplicateCategory {
                    name,
                    category_type: request.category_type,
                },
                other => CategoryError::DatabaseError(other.to_string()),
            })
    }

    async fn get_categories(&self) -> Result<Vec<Category>, CategoryError> {
        Ok(self.category_repository.find_all().await?)
    }

    async fn get_categories_by_type(
        &self,
        category_type: CategoryType,
    ) -> Result<Vec<Category>, CategoryError> {
        Ok(self.category_repository.find_by_type(category_type).await?)
    }

    async fn get_category(&self, id: i32) -> Result<Category, CategoryError> {
        self.category_repository
            .find_by_id(id)
            .await?
            .ok_or(CategoryError::CategoryNotFound(id))
    }

    async fn update_category(
        &self,
        id: i32,
        request: UpdateCategoryRequest,
    ) -> Result<Category, CategoryError> {
        self.get_category(id).await?;

        let name = request.name.trim().to_string();
        let identifier = derive_identifier(&name, request.category_type);

        self.category_repository
            .update(
                id,
                NewCategory {
                    name,
                    category_type: request.category_type,
                    identifier,
                },
            )
            .await?;

        // Return the freshly reloaded entity.
        self.get_category(id).await
    }

    async fn delete_category(&self, id: i32) -> Result<(), CategoryError> {
        self.get_category(id).await?;

        Ok(self.category_repository.delete(id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Mutex;

    // Mock CategoryRepository for testing
    struct MockCategoryRepository {
        categories: Mutex<HashMap<i32, Category>>,
        next_id: AtomicI32,
        should_fail: bool,
    }

    impl MockCategoryRepository {
        fn new() -> Self {
            Self {
                categories: Mutex::new(HashMap::new()),
                next_id: AtomicI32::new(1),
                should_fail: false,
            }
        }

        fn with_failure() -> Self {
            Self {
                categories: Mutex::new(HashMap::new()),
                next_id: AtomicI32::new(1),
                should_fail: true,
            }
        }
    }

    #[async_trait]
    impl CategoryRepository for MockCategoryRepository {
        async fn create(&self, category: NewCategory) -> Result<Category, RepositoryError> {
            if self.should_fail {
                return Err(RepositoryError::DatabaseError("Database error".to_string()));
            }

            let mut categories = self.categories.lock().unwrap();

            if categories.values().any(|c| {
                c.category_type == category.category_type && c.identifier == category.identifier
            }) {
                return Err(RepositoryError::ConstraintViolation(
                    "duplicate key value violates unique constraint".to_string(),
                ));
            }

            let id = self.next_id.fetch_add(1, Ordering::SeqCst);
            let entity = Category {
                id,
                name: category.name,
                category_type: category.category_type,
                identifier: category.identifier,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            };
            categories.insert(id, entity.clone());
            Ok(entity)
        }

        async fn find_all(&self) -> Result<Vec<Category>, RepositoryError> {
            if self.should_fail {
                return Err(RepositoryError::DatabaseError("Database error".to_string()));
            }

            let categories = self.categories.lock().unwrap();
            let mut result: Vec<Category> = categories.values().cloned().collect();
            result.sort_by_key(|c| c.id);
            Ok(result)
        }

        async fn find_by_type(
            &self,
            category_type: CategoryType,
        ) -> Result<Vec<Category>, RepositoryError> {
            let categories = self.categories.lock().unwrap();
            let mut result: Vec<Category> = categories
                .values()
                .filter(|c| c.category_type == category_type)
                .cloned()
                .collect();
            result.sort_by_key(|c| c.id);
            Ok(result)
        }

        async fn find_by_id(&self, id: i32) -> Result<Option<Category>, RepositoryError> {
            let categories = self.categories.lock().unwrap();
            Ok(categories.get(&id).cloned())
        }

        async fn find_by_name_and_type(
            &self,
            name: &str,
            category_type: CategoryType,
        ) -> Result<Vec<Category>, RepositoryError> {
            if self.should_fail {
                return Err(RepositoryError::DatabaseError("Database error".to_string()));
            }

            let categories = self.categories.lock().unwrap();
            Ok(categories
                .values()
                .filter(|c| {
                    c.category_type == category_type
                        && c.name.to_lowercase() == name.to_lowercase()
                })
                .cloned()
                .collect())
        }

        async fn update(&self, id: i32, category: NewCategory) -> Result<(), RepositoryError> {
            let mut categories = self.categories.lock().unwrap();
            match categories.get_mut(&id) {
                Some(existing) => {
                    existing.name = category.name;
                    existing.category_type = category.category_type;
                    existing.identifier = category.identifier;
                    existing.updated_at = Utc::now();
                    Ok(())
                }
                None => Err(RepositoryError::NotFound),
            }
        }

        async fn delete(&self, id: i32) -> Result<(), RepositoryError> {
            let mut categories = self.categories.lock().unwrap();
            if categories.remove(&id).is_some() {
                Ok(())
            } else {
                Err(RepositoryError::NotFound)
            }
        }
    }

    fn create_request(name: &str, category_type: CategoryType) -> CreateCategoryRequest {
        CreateCategoryRequest {
            name: name.to_string(),
            category_type,
        }
    }

    #[tokio::test]
    async fn test_create_category_derives_identifier() {
        let repo = Arc::new(MockCategoryRepository::new());
        let service = CategoryServiceImpl::new(repo);

        let result = service
            .create_category(create_request("Sondersachen", CategoryType::Expense))
            .await;

        assert!(result.is_ok());
        let category = result.unwrap();
        assert_eq!(category.name, "Sondersachen");
        assert_eq!(category.category_type, CategoryType::Expense);
        assert_eq!(category.identifier, "sondersachen_expense");
    }

    #[tokio::test]
    async fn test_create_category_trims_name() {
        let repo = Arc::new(MockCategoryRepository::new());
        let service = CategoryServiceImpl::new(repo);

        let category = service
            .create_category(create_request("  Salary  ", CategoryType::Income))
            .await
            .unwrap();

        assert_eq!(category.name, "Salary");
        assert_eq!(category.identifier, "salary_income");
    }

    #[tokio::test]
    async fn test_create_category_duplicate_fails_with_conflict() {
        let repo = Arc::new(MockCategoryRepository::new());
        let service = CategoryServiceImpl::new(repo);

        service
            .create_category(create_request("Sondersachen", CategoryType::Expense))
            .await
            .unwrap();

        let result = service
            .create_category(create_request("Sondersachen", CategoryType::Expense))
            .await;

        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, CategoryError::DuplicateCategory { .. }));
        assert_eq!(
            err.to_string(),
            "Category with name 'Sondersachen' and type 'EXPENSE' already exists."
        );
    }

    #[tokio::test]
    async fn test_create_category_duplicate_detection_is_case_insensitive() {
        let repo = Arc::new(MockCategoryRepository::new());
        let service = CategoryServiceImpl::new(repo);

        service
            .create_category(create_request("Groceries", CategoryType::Expense))
            .await
            .unwrap();

        let result = service
            .create_category(create_request("GROCERIES", CategoryType::Expense))
            .await;

        assert!(matches!(
            result.unwrap_err(),
            CategoryError::DuplicateCategory { .. }
        ));
    }

    #[tokio::test]
    async fn test_create_category_same_name_different_type_succeeds() {
        let repo = Arc::new(MockCategoryRepository::new());
        let service = CategoryServiceImpl::new(repo);

        service
            .create_category(create_request("Sonstiges", CategoryType::Expense))
            .await
            .unwrap();

        let result = service
            .create_category(create_request("Sonstiges", CategoryType::Income))
            .await;

        assert!(result.is_ok());
        assert_eq!(result.unwrap().identifier, "sonstiges_income");
    }

    #[tokio::test]
    async fn test_create_category_database_error() {
        let repo = Arc::new(MockCategoryRepository::with_failure());
        let service = CategoryServiceImpl::new(repo);

        let result = service
            .create_category(create_request("Groceries", CategoryType::Expense))
            .await;

        assert!(matches!(
            result.unwrap_err(),
            CategoryError::DatabaseError(_)
        ));
    }

    #[tokio::test]
    async fn test_get_categories_returns_all() {
        let repo = Arc::new(MockCategoryRepository::new());
        let service = CategoryServiceImpl::new(repo);

        service
            .create_category(create_request("Groceries", CategoryType::Expense))
            .await
            .unwrap();
        service
            .create_category(create_request("Salary", CategoryType::Income))
            .await
            .unwrap();

        let categories = service.get_categories().await.unwrap();
        assert_eq!(categories.len(), 2);
    }

    #[tokio::test]
    async fn test_get_categories_by_type_filters() {
        let repo = Arc::new(MockCategoryRepository::new());
        let service = CategoryServiceImpl::new(repo);

        service
            .create_category(create_request("Groceries", CategoryType::Expense))
            .await
            .unwrap();
        service
            .create_category(create_request("Salary", CategoryType::Income))
            .await
            .unwrap();

        let income = service
            .get_categories_by_type(CategoryType::Income)
            .await
            .unwrap();
        assert_eq!(income.len(), 1);
        assert_eq!(income[0].name, "Salary");
    }

    #[tokio::test]
    async fn test_get_category_not_found_message() {
        let repo = Arc::new(MockCategoryRepository::new());
        let service = CategoryServiceImpl::new(repo);

        let result = service.get_category(10).await;

        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, CategoryError::CategoryNotFound(10)));
        assert_eq!(err.to_string(), "Category with ID '10' was not found.");
    }

    #[tokio::test]
    async fn test_update_category_recomputes_identifier() {
        let repo = Arc::new(MockCategoryRepository::new());
        let service = CategoryServiceImpl::new(repo);

        let created = service
            .create_category(create_request("Groceries", CategoryType::Expense))
            .await
            .unwrap();

        let updated = service
            .update_category(
                created.id,
                UpdateCategoryRequest {
                    name: " Household ".to_string(),
                    category_type: CategoryType::Expense,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "Household");
        assert_eq!(updated.identifier, "household_expense");
    }

    #[tokio::test]
    async fn test_update_category_not_found() {
        let repo = Arc::new(MockCategoryRepository::new());
        let service = CategoryServiceImpl::new(repo);

        let result = service
            .update_category(
                42,
                UpdateCategoryRequest {
                    name: "Household".to_string(),
                    category_type: CategoryType::Expense,
                },
            )
            .await;

        assert!(matches!(
            result.unwrap_err(),
            CategoryError::CategoryNotFound(42)
        ));
    }

    #[tokio::test]
    async fn test_delete_category_removes_it() {
        let repo = Arc::new(MockCategoryRepository::new());
        let service = CategoryServiceImpl::new(repo);

        let created = service
            .create_category(create_request("Groceries", CategoryType::Expense))
            .await
            .unwrap();

        service.delete_category(created.id).await.unwrap();

        let result = service.get_category(created.id).await;
        assert!(matches!(
            result.unwrap_err(),
            CategoryError::CategoryNotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_delete_category_not_found() {
        let repo = Arc::new(MockCategoryRepository::new());
        let service = CategoryServiceImpl::new(repo);

        let result = service.delete_category(7).await;

        assert!(matches!(
            result.unwrap_err(),
            CategoryError::CategoryNotFound(7)
        ));
    }

    #[test]
    fn test_derive_identifier_lowercases_and_suffixes_type() {
        assert_eq!(
            derive_identifier("Sondersachen", CategoryType::Expense),
            "sondersachen_expense"
        );
        assert_eq!(
            derive_identifier("  Salary ", CategoryType::Income),
            "salary_income"
        );
    }
}
