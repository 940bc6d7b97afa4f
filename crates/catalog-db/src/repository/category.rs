//! # Category Repository
//!
//! Database operations for the category tree.
//!
//! Parent links are plain `parent_id` columns. Deleting a category turns its
//! direct children into roots and deletes its products.

use chrono::Utc;
use sqlx::{Executor, QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use catalog_core::validation::check_parent;
use catalog_core::{Category, NewCategory, MAX_CATEGORY_DEPTH};

const SELECT_CATEGORY: &str = r#"
    SELECT id, title, description, parent_id AS parent, slug, created_at, updated_at
    FROM categories
"#;

/// Repository for category database operations.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    /// Creates a new CategoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CategoryRepository { pool }
    }

    /// Lists every category ordered by id.
    pub async fn list_all(&self) -> DbResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(&format!("{SELECT_CATEGORY} ORDER BY id"))
            .fetch_all(&self.pool)
            .await?;

        debug!(count = categories.len(), "Listed categories");
        Ok(categories)
    }

    /// Gets a category by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Category))` - Category found
    /// * `Ok(None)` - Category not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(&format!("{SELECT_CATEGORY} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(category)
    }

    /// Loads several categories at once, ordered by id. Unknown ids are
    /// skipped.
    pub async fn get_many(&self, ids: &[i64]) -> DbResult<Vec<Category>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(SELECT_CATEGORY);
        query.push(" WHERE id IN (");
        let mut separated = query.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(") ORDER BY id");

        let categories = query
            .build_query_as::<Category>()
            .fetch_all(&self.pool)
            .await?;

        Ok(categories)
    }

    /// Checks whether a category exists.
    pub async fn exists(&self, id: i64) -> DbResult<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT id FROM categories WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(found.is_some())
    }

    /// Returns `id` followed by its ancestors, nearest first.
    ///
    /// Empty if `id` does not exist. The walk stops one step past
    /// [`MAX_CATEGORY_DEPTH`] ancestors.
    pub async fn ancestors(&self, id: i64) -> DbResult<Vec<i64>> {
        ancestor_chain(&self.pool, id).await
    }

    /// Inserts a new category.
    ///
    /// `input.slug` must already be filled in (see
    /// `catalog_core::validation::validate_new_category`).
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - title or slug already exists
    /// * `Err(DbError::ForeignKeyViolation)` - parent doesn't exist
    pub async fn insert(&self, input: &NewCategory) -> DbResult<Category> {
        debug!(title = %input.title, parent = ?input.parent, "Inserting category");

        let now = Utc::now();
        let slug = input.slug.clone().unwrap_or_default();

        let result = sqlx::query(
            r#"
            INSERT INTO categories (title, description, parent_id, slug, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?5)
            "#,
        )
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.parent)
        .bind(&slug)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Category", id))
    }

    /// Writes all mutable fields of `category` and bumps `updated_at`.
    ///
    /// The write and the parent check share one transaction: the row is
    /// updated first, which takes SQLite's write lock, and the new parent's
    /// ancestor chain is then read under that lock. Concurrent moves are
    /// serialized, so two of them cannot combine into a cycle.
    ///
    /// ## Returns
    /// * `Ok(Category)` - the stored row after the update
    /// * `Err(DbError::NotFound)` - category doesn't exist
    /// * `Err(DbError::Rejected)` - the move would create a cycle or nest too
    ///   deep; nothing is written
    pub async fn update(&self, category: &Category) -> DbResult<Category> {
        debug!(id = category.id, parent = ?category.parent, "Updating category");

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE categories SET
                title = ?2,
                description = ?3,
                parent_id = ?4,
                slug = ?5,
                updated_at = ?6
            WHERE id = ?1
            "#,
        )
        .bind(category.id)
        .bind(&category.title)
        .bind(&category.description)
        .bind(category.parent)
        .bind(&category.slug)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", category.id));
        }

        if let Some(parent_id) = category.parent {
            let chain = ancestor_chain(&mut *tx, parent_id).await?;
            check_parent(category.id, parent_id, &chain)?;
        }
        tx.commit().await?;

        self.get_by_id(category.id)
            .await?
            .ok_or_else(|| DbError::not_found("Category", category.id))
    }

    /// Deletes a category.
    ///
    /// Children are re-rooted and products are removed by the schema's
    /// foreign key actions.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id = id, "Deleting category");

        let result = sqlx::query("DELETE FROM categories WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", id));
        }

        Ok(())
    }

    /// Counts categories (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

async fn ancestor_chain<'e, E>(executor: E, id: i64) -> DbResult<Vec<i64>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let chain: Vec<i64> = sqlx::query_scalar(
        r#"
        WITH RECURSIVE chain(id, parent_id, depth) AS (
            SELECT id, parent_id, 0 FROM categories WHERE id = ?1
            UNION ALL
            SELECT c.id, c.parent_id, chain.depth + 1
            FROM categories c
            JOIN chain ON c.id = chain.parent_id
            WHERE chain.depth < ?2
        )
        SELECT id FROM chain ORDER BY depth
        "#,
    )
    .bind(id)
    .bind(MAX_CATEGORY_DEPTH as i64)
    .fetch_all(executor)
    .await?;

    Ok(chain)
}

// =============================================================================
// Unit Tests
// =============================================================================
