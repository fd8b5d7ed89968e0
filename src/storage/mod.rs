mod filter;
mod memory;
mod models;
mod postgres;
mod querier;

#[cfg(test)]
pub(crate) use self::memory::fixtures;

pub use self::{
    filter::PostFilter,
    memory::MemoryStore,
    postgres::{DBPool, init_db_from_env, migrate, new_db_pool},
    querier::{ContentStore, Window},
};
