//! Storage implementations for the Research Pool.

mod memory;

pub use memory::MemoryPool;

#[cfg(feature = "postgres")]
mod postgres;

#[cfg(feature = "postgres")]
pub use postgres::PostgresPool;
