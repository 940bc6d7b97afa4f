//! # Discount Repository
//!
//! Database operations for discounts and their product attachments.
//!
//! ## Ownership vs Attachment
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  discounts.product_id          product_discounts                        │
//! │  ─────────────────────         ─────────────────────────────            │
//! │  the product the discount      every product the discount applies to    │
//! │  was created for (1)           (owner included, many-to-many)           │
//! │                                                                         │
//! │  insert()  ──► discount row + owner link, one transaction               │
//! │  attach()  ──► INSERT OR IGNORE link (idempotent)                       │
//! │  for_product() / for_products() ──► read through the link table         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::collections::HashMap;
use std::str::FromStr;
use tracing::debug;

use crate::error::{DbError, DbResult};
use catalog_core::{Discount, DiscountStatus, DiscountType, NewDiscount};

/// Raw `discounts` row.
#[derive(Debug, sqlx::FromRow)]
struct DiscountRow {
    id: i64,
    product_id: i64,
    discount_type: String,
    value: String,
    status: DiscountStatus,
    expires_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<DiscountRow> for Discount {
    type Error = DbError;

    fn try_from(row: DiscountRow) -> Result<Self, Self::Error> {
        let value = Decimal::from_str(&row.value).map_err(|_| DbError::Corrupt {
            column: "discounts.value".to_string(),
            value: row.value.clone(),
        })?;

        Ok(Discount {
            id: row.id,
            product: row.product_id,
            discount_type: DiscountType::from(row.discount_type),
            value,
            status: row.status,
            expires_at: row.expires_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// A discount row joined with the product it is attached to.
#[derive(Debug, sqlx::FromRow)]
struct AttachedDiscountRow {
    attached_to: i64,
    #[sqlx(flatten)]
    discount: DiscountRow,
}

/// Repository for discount database operations.
#[derive(Debug, Clone)]
pub struct DiscountRepository {
    pool: SqlitePool,
}

impl DiscountRepository {
    /// Creates a new DiscountRepository.
    pub fn new(pool: SqlitePool) -> Self {
        DiscountRepository { pool }
    }

    /// Gets a discount by its ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Discount>> {
        let row = sqlx::query_as::<_, DiscountRow>(
            r#"
            SELECT id, product_id, discount_type, value, status, expires_at,
                   created_at, updated_at
            FROM discounts
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Discount::try_from).transpose()
    }

    /// Inserts a discount and links it to its owning product.
    ///
    /// Both writes happen in one transaction, so a discount is never visible
    /// without its owner link.
    ///
    /// ## Returns
    /// * `Err(DbError::ForeignKeyViolation)` - product doesn't exist
    pub async fn insert(&self, input: &NewDiscount) -> DbResult<Discount> {
        debug!(
            product = input.product,
            discount_type = %input.discount_type,
            value = %input.value,
            "Inserting discount"
        );

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO discounts (
                product_id, discount_type, value, status, expires_at,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
            "#,
        )
        .bind(input.product)
        .bind(input.discount_type.as_str())
        .bind(input.value.to_string())
        .bind(input.status)
        .bind(input.expires_at)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        let id = result.last_insert_rowid();

        sqlx::query(
            "INSERT OR IGNORE INTO product_discounts (product_id, discount_id) VALUES (?1, ?2)",
        )
        .bind(input.product)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Discount", id))
    }

    /// Writes all mutable fields of `discount`. The owner never changes.
    pub async fn update(&self, discount: &Discount) -> DbResult<Discount> {
        debug!(id = discount.id, "Updating discount");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE discounts SET
                discount_type = ?2,
                value = ?3,
                status = ?4,
                expires_at = ?5,
                updated_at = ?6
            WHERE id = ?1
            "#,
        )
        .bind(discount.id)
        .bind(discount.discount_type.as_str())
        .bind(discount.value.to_string())
        .bind(discount.status)
        .bind(discount.expires_at)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Discount", discount.id));
        }

        self.get_by_id(discount.id)
            .await?
            .ok_or_else(|| DbError::not_found("Discount", discount.id))
    }

    /// Attaches a discount to a product.
    ///
    /// A single `INSERT OR IGNORE`, so concurrent or repeated calls converge
    /// on one link row.
    ///
    /// ## Returns
    /// * `Ok(true)` - a new link was created
    /// * `Ok(false)` - the link already existed
    pub async fn attach(&self, product_id: i64, discount_id: i64) -> DbResult<bool> {
        debug!(product = product_id, discount = discount_id, "Attaching discount");

        let result = sqlx::query(
            "INSERT OR IGNORE INTO product_discounts (product_id, discount_id) VALUES (?1, ?2)",
        )
        .bind(product_id)
        .bind(discount_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Every discount attached to `product_id`, ordered by id.
    pub async fn for_product(&self, product_id: i64) -> DbResult<Vec<Discount>> {
        let rows = sqlx::query_as::<_, DiscountRow>(
            r#"
            SELECT d.id, d.product_id, d.discount_type, d.value, d.status, d.expires_at,
                   d.created_at, d.updated_at
            FROM discounts d
            JOIN product_discounts pd ON pd.discount_id = d.id
            WHERE pd.product_id = ?1
            ORDER BY d.id
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Discount::try_from).collect()
    }

    /// Attached discounts for several products in one query.
    ///
    /// Every requested id has an entry, empty when nothing is attached.
    pub async fn for_products(&self, product_ids: &[i64]) -> DbResult<HashMap<i64, Vec<Discount>>> {
        let mut attached: HashMap<i64, Vec<Discount>> =
            product_ids.iter().map(|id| (*id, Vec::new())).collect();

        if product_ids.is_empty() {
            return Ok(attached);
        }

        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(
            r#"
            SELECT pd.product_id AS attached_to,
                   d.id, d.product_id, d.discount_type, d.value, d.status, d.expires_at,
                   d.created_at, d.updated_at
            FROM discounts d
            JOIN product_discounts pd ON pd.discount_id = d.id
            WHERE pd.product_id IN (
            "#,
        );
        let mut separated = query.separated(", ");
        for id in product_ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(") ORDER BY pd.product_id, d.id");

        let rows = query
            .build_query_as::<AttachedDiscountRow>()
            .fetch_all(&self.pool)
            .await?;

        debug!(
            products = product_ids.len(),
            discounts = rows.len(),
            "Loaded attached discounts"
        );

        for row in rows {
            let discount = Discount::try_from(row.discount)?;
            attached.entry(row.attached_to).or_default().push(discount);
        }

        Ok(attached)
    }

    /// Counts discounts (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM discounts")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::{category, database, product};
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn new_discount(product: i64, discount_type: DiscountType, value: Decimal) -> NewDiscount {
        NewDiscount {
            product,
            discount_type,
            value,
            status: DiscountStatus::Active,
            expires_at: None,
        }
    }

    #[tokio::test]
    async fn test_insert_links_owner() {
        let db = database().await;
        let cat = category(&db, "Electronics", None).await;
        let laptop = product(&db, "Laptop", 250099, cat.id).await;

        let discount = db
            .discounts()
            .insert(&new_discount(laptop.id, DiscountType::Percentage, dec!(20)))
            .await
            .unwrap();

        assert_eq!(discount.product, laptop.id);
        assert_eq!(discount.value, dec!(20));
        assert_eq!(discount.discount_type, DiscountType::Percentage);

        let attached = db.discounts().for_product(laptop.id).await.unwrap();
        assert_eq!(attached, vec![discount]);
    }

    #[tokio::test]
    async fn test_insert_for_missing_product_leaves_nothing_behind() {
        let db = database().await;
        let err = db
            .discounts()
            .insert(&new_discount(404, DiscountType::Fixed, dec!(5)))
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
        assert_eq!(db.discounts().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_attach_is_idempotent() {
        let db = database().await;
        let cat = category(&db, "Kitchen", None).await;
        let pan = product(&db, "Pan", 3000, cat.id).await;
        let pot = product(&db, "Pot", 4000, cat.id).await;

        let discount = db
            .discounts()
            .insert(&new_discount(pan.id, DiscountType::Fixed, dec!(5)))
            .await
            .unwrap();

        assert!(db.discounts().attach(pot.id, discount.id).await.unwrap());
        assert!(!db.discounts().attach(pot.id, discount.id).await.unwrap());
        assert!(!db.discounts().attach(pan.id, discount.id).await.unwrap());

        let on_pot = db.discounts().for_product(pot.id).await.unwrap();
        assert_eq!(on_pot.len(), 1);
        assert_eq!(on_pot[0].product, pan.id);
    }

    #[tokio::test]
    async fn test_for_products_batches() {
        let db = database().await;
        let cat = category(&db, "Sports", None).await;
        let ball = product(&db, "Ball", 1500, cat.id).await;
        let net = product(&db, "Net", 6000, cat.id).await;
        let bare = product(&db, "Cones", 900, cat.id).await;

        let d1 = db
            .discounts()
            .insert(&new_discount(ball.id, DiscountType::Fixed, dec!(1)))
            .await
            .unwrap();
        let d2 = db
            .discounts()
            .insert(&new_discount(net.id, DiscountType::Percentage, dec!(10)))
            .await
            .unwrap();
        db.discounts().attach(net.id, d1.id).await.unwrap();

        let map = db
            .discounts()
            .for_products(&[ball.id, net.id, bare.id])
            .await
            .unwrap();

        assert_eq!(map[&ball.id].iter().map(|d| d.id).collect::<Vec<_>>(), vec![d1.id]);
        assert_eq!(
            map[&net.id].iter().map(|d| d.id).collect::<Vec<_>>(),
            vec![d1.id, d2.id]
        );
        assert!(map[&bare.id].is_empty());
        assert!(db.discounts().for_products(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_keeps_owner() {
        let db = database().await;
        let cat = category(&db, "Audio", None).await;
        let speaker = product(&db, "Speaker", 9900, cat.id).await;
        let discount = db
            .discounts()
            .insert(&new_discount(speaker.id, DiscountType::Fixed, dec!(10)))
            .await
            .unwrap();

        let expires = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        let mut changed = discount.clone();
        changed.status = DiscountStatus::Inactive;
        changed.value = dec!(12.50);
        changed.expires_at = Some(expires);

        let updated = db.discounts().update(&changed).await.unwrap();
        assert_eq!(updated.product, speaker.id);
        assert_eq!(updated.status, DiscountStatus::Inactive);
        assert_eq!(updated.value, dec!(12.50));
        assert_eq!(updated.expires_at, Some(expires));
    }

    #[tokio::test]
    async fn test_unknown_type_loads_as_unrecognized() {
        let db = database().await;
        let cat = category(&db, "Legacy", None).await;
        let item = product(&db, "Old stock", 1000, cat.id).await;
        let discount = db
            .discounts()
            .insert(&new_discount(item.id, DiscountType::Fixed, dec!(1)))
            .await
            .unwrap();

        sqlx::query("UPDATE discounts SET discount_type = 'bogo' WHERE id = ?1")
            .bind(discount.id)
            .execute(db.pool())
            .await
            .unwrap();

        let loaded = db.discounts().get_by_id(discount.id).await.unwrap().unwrap();
        assert_eq!(loaded.discount_type, DiscountType::Unrecognized("bogo".to_string()));
    }

    #[tokio::test]
    async fn test_corrupt_value_is_reported() {
        let db = database().await;
        let cat = category(&db, "Broken", None).await;
        let item = product(&db, "Thing", 1000, cat.id).await;
        let discount = db
            .discounts()
            .insert(&new_discount(item.id, DiscountType::Fixed, dec!(1)))
            .await
            .unwrap();

        sqlx::query("UPDATE discounts SET value = 'ten' WHERE id = ?1")
            .bind(discount.id)
            .execute(db.pool())
            .await
            .unwrap();

        let err = db.discounts().get_by_id(discount.id).await.unwrap_err();
        assert!(matches!(err, DbError::Corrupt { .. }));
    }

    #[tokio::test]
    async fn test_product_delete_cascades_to_discounts() {
        let db = database().await;
        let cat = category(&db, "Temp", None).await;
        let item = product(&db, "Temp item", 1000, cat.id).await;
        db.discounts()
            .insert(&new_discount(item.id, DiscountType::Fixed, dec!(1)))
            .await
            .unwrap();

        db.categories().delete(cat.id).await.unwrap();
        assert_eq!(db.discounts().count().await.unwrap(), 0);
    }
}
