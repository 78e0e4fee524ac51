//! In-process adapters used when no database or Redis URL is configured.
//!
//! State lives behind `tokio::sync::RwLock` and disappears with the process,
//! which suits development servers and tests.

mod session_store;
mod user_repository;

pub use session_store::InMemorySessionStore;
pub use user_repository::InMemoryUserRepository;
