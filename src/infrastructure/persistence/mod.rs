mod memory;
mod sqlite;

pub use memory::MemorySessionStore;
pub use sqlite::SqlSessionStore;
