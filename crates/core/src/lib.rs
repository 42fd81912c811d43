//! Scrollkeeper Core - domain types, services, and traits.
//!
//! This crate holds the document capture logic and the contracts the
//! integration crates implement: [`remote::RemoteStore`] for the document
//! repository and [`capture::ChatPlatform`] for the chat side.

pub mod capture;
pub mod constants;
pub mod documents;
pub mod errors;
pub mod notation;
pub mod remote;
pub mod sessions;
pub mod users;
pub mod utils;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
