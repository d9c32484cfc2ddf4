// Service exports
#[cfg(test)]
pub(crate) mod failing;
pub mod memory;
pub mod postgres;
pub mod store;

pub use memory::InMemoryStore;
pub use postgres::PostgresStore;
pub use store::{CandidateStore, FetchQuery, SortOrder, StoreError, MEMBER_PREVIEW_LIMIT};
