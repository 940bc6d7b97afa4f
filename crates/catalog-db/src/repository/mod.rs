//! # Repository Module
//!
//! Database repository implementations for the catalog.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  HTTP handler                                                          │
//! │       │                                                                 │
//! │       │  db.products().list(&filter, Some(20), 0)                       │
//! │       ▼                                                                 │
//! │  ProductRepository                                                     │
//! │  ├── list(&self, filter, limit, offset)                                │
//! │  ├── get_by_id(&self, id)                                              │
//! │  ├── insert(&self, product)                                            │
//! │  └── update(&self, product)                                            │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`CategoryRepository`](category::CategoryRepository) - Category tree CRUD
//! - [`ProductRepository`](product::ProductRepository) - Product CRUD and filtered listing
//! - [`DiscountRepository`](discount::DiscountRepository) - Discounts and product attachment

pub mod category;
pub mod discount;
pub mod product;
