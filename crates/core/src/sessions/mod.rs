//! Sessions module - per-chat filename state.

mod sessions_model;
mod sessions_store;

pub use sessions_model::ChatId;
pub use sessions_store::{InMemorySessionStore, SessionStore};
