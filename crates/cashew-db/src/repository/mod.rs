//! # Repository Module
//!
//! Database repository implementations for Cashew POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  Billing Engine                                                         │
//! │       │                                                                 │
//! │       │  db.products().get_by_code("P001")                              │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  ProductRepository                                                      │
//! │  ├── create(&self, new_product)                                         │
//! │  ├── get_by_code(&self, code)                                           │
//! │  ├── update(&self, id, changes)                                         │
//! │  └── delete(&self, id)                                                  │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • SQL is isolated in one place per entity                              │
//! │  • Call sites read as domain operations                                 │
//! │  • Transaction boundaries live next to the queries they guard           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Catalog CRUD and stock queries
//! - [`customer::CustomerRepository`] - Customer lookup and get-or-create
//! - [`purchase::PurchaseRepository`] - Atomic purchase commit and history

pub mod customer;
pub mod product;
pub mod purchase;
