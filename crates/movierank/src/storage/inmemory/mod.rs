//! In-memory storage backend.
//!
//! Stores rankings in a `BTreeMap` keyed by `(user_id, movie_name)` behind an
//! `Arc<RwLock<_>>`. Key order matches the DynamoDB sort order, so prefix
//! queries come back ascending by movie name like they do against the table.
//!
//! # Example
//!
//! ```rust,ignore
//! use movierank::storage::inmemory::InMemoryRepository;
//!
//! let repo = InMemoryRepository::new();
//! ```

mod repository;

pub use repository::InMemoryRepository;
