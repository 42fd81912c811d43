//! Documents module - local copies of captured documents.

mod documents_store;

pub use documents_store::LocalDocumentStore;
