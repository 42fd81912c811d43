//! Remote module - contract for the version-controlled document store.

mod remote_model;
mod remote_traits;

pub use remote_model::{CommitOutcome, RemoteFile, RemoteFileRef};
pub use remote_traits::RemoteStore;
