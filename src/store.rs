pub mod datastore;
#[cfg(test)]
pub mod faulty;
pub mod memory;
pub mod postgres;

pub use datastore::{
    fetch_by_ids, from_document, to_document, Collection, Datastore, Direction, Document, Filter,
    Query, IN_QUERY_LIMIT,
};
pub use memory::MemoryDatastore;
pub use postgres::PgDatastore;
