//! Users module - read-only directory of API credentials and chat owners.

mod users_directory;
mod users_model;

pub use users_directory::UserDirectory;
pub use users_model::UserAccount;
