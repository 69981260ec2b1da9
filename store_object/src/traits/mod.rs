//! Traits for database operations
//!
//! `RecordStore` is the seam every backend implements; `TableMetadata`
//! describes the typed entities that can be written into a store.

pub mod record_store;
pub mod table_metadata;

pub use record_store::RecordStore;
pub use table_metadata::TableMetadata;
