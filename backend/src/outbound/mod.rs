//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **memory**: process-local user directory and session store
//! - **persistence**: PostgreSQL user directory using Diesel
//! - **cache**: Redis session store using `bb8-redis`
//! - **crypto**: Argon2 password hashing
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

pub mod cache;
pub mod crypto;
pub mod memory;
pub mod persistence;
