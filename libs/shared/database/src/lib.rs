pub mod collection;
pub mod collections;
pub mod context;
pub mod document;
pub mod error;
pub mod memory;
pub mod pipeline;
pub mod rest;
pub mod store;

pub use collection::Collection;
pub use context::AppContext;
pub use document::{Document, Filter, ID_FIELD};
pub use error::StoreError;
pub use memory::MemoryStore;
pub use pipeline::{Lookup, Pipeline, Projection, Stage};
pub use rest::RestStore;
pub use store::DocumentStore;
