//! In-memory store adapters used when no database is configured.

mod memory_sweet_repository;
mod memory_user_repository;

pub use memory_sweet_repository::MemorySweetRepository;
pub use memory_user_repository::MemoryUserRepository;
