//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - Filtered, paginated listing (`list` + `count`)
//! - CRUD operations
//!
//! Prices are stored as integer cents and come back as [`Money`].

use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use catalog_core::{Money, NewProduct, Product, ProductStatus};

const SELECT_PRODUCT: &str = r#"
    SELECT id, name, description, price_cents, quantity, status, category_id,
           created_at, updated_at
    FROM products
"#;

/// Raw `products` row.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    description: String,
    price_cents: i64,
    quantity: i64,
    status: ProductStatus,
    category_id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            description: row.description,
            price: Money::from_cents(row.price_cents),
            quantity: row.quantity,
            status: row.status,
            category: row.category_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Listing filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Only products in this category (not its subcategories).
    pub category: Option<i64>,
}

impl ProductFilter {
    pub fn by_category(category: i64) -> Self {
        ProductFilter {
            category: Some(category),
        }
    }

    fn push_where(&self, query: &mut QueryBuilder<'_, Sqlite>) {
        if let Some(category) = self.category {
            query.push(" WHERE category_id = ").push_bind(category);
        }
    }
}

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let page = repo.list(&ProductFilter::by_category(3), Some(20), 0).await?;
/// let product = repo.get_by_id(42).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists products ordered by id.
    ///
    /// ## Arguments
    /// * `filter` - Optional category restriction
    /// * `limit` - Page size; `None` returns everything after `offset`
    /// * `offset` - Rows to skip
    pub async fn list(
        &self,
        filter: &ProductFilter,
        limit: Option<i64>,
        offset: i64,
    ) -> DbResult<Vec<Product>> {
        debug!(category = ?filter.category, limit = ?limit, offset = offset, "Listing products");

        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(SELECT_PRODUCT);
        filter.push_where(&mut query);
        query.push(" ORDER BY id");
        // SQLite needs a LIMIT before OFFSET; -1 means unbounded
        query.push(" LIMIT ").push_bind(limit.unwrap_or(-1));
        query.push(" OFFSET ").push_bind(offset);

        let rows = query
            .build_query_as::<ProductRow>()
            .fetch_all(&self.pool)
            .await?;

        debug!(count = rows.len(), "Listed products");
        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Counts products matching `filter`.
    pub async fn count(&self, filter: &ProductFilter) -> DbResult<i64> {
        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT COUNT(*) FROM products");
        filter.push_where(&mut query);

        let count = query
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Counts all products (for diagnostics).
    pub async fn count_all(&self) -> DbResult<i64> {
        self.count(&ProductFilter::default()).await
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(&format!("{SELECT_PRODUCT} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Product::from))
    }

    /// Checks whether a product exists.
    pub async fn exists(&self, id: i64) -> DbResult<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT id FROM products WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(found.is_some())
    }

    /// Inserts a new product.
    ///
    /// ## Returns
    /// * `Ok(Product)` - Inserted product with generated id and timestamps
    /// * `Err(DbError::ForeignKeyViolation)` - category doesn't exist
    pub async fn insert(&self, input: &NewProduct) -> DbResult<Product> {
        debug!(name = %input.name, category = input.category, "Inserting product");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO products (
                name, description, price_cents, quantity, status, category_id,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
            "#,
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.price.cents())
        .bind(input.quantity)
        .bind(input.status)
        .bind(input.category)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Writes all mutable fields of `product` and bumps `updated_at`.
    ///
    /// ## Returns
    /// * `Ok(Product)` - the stored row after the update
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn update(&self, product: &Product) -> DbResult<Product> {
        debug!(id = product.id, "Updating product");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?2,
                description = ?3,
                price_cents = ?4,
                quantity = ?5,
                status = ?6,
                category_id = ?7,
                updated_at = ?8
            WHERE id = ?1
            "#,
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price.cents())
        .bind(product.quantity)
        .bind(product.status)
        .bind(product.category)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", product.id));
        }

        self.get_by_id(product.id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", product.id))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
