//! Port contracts for the filing lifecycle.
//!
//! Ports define infrastructure-agnostic interfaces for the collaborators the
//! filing services consume: filing storage, the reviewer directory, and the
//! user record updater.

pub mod ca_directory;
pub mod repository;
pub mod user_directory;

pub use ca_directory::{CaDirectory, CaDirectoryError, CaDirectoryResult};
pub use repository::{FilingRepository, FilingRepositoryError, FilingRepositoryResult};
pub use user_directory::{UserDirectory, UserDirectoryError, UserDirectoryResult};

