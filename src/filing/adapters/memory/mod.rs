//! In-memory adapters for tests and local tooling.

mod ca_directory;
mod filing;
mod user_directory;

pub use ca_directory::InMemoryCaDirectory;
pub use filing::InMemoryFilingRepository;
pub use user_directory::InMemoryUserDirectory;
