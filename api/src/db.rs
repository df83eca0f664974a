use diesel_async::{
    AsyncPgConnection,
    pooled_connection::{
        AsyncDieselConnectionManager,
        deadpool::{BuildError, Object, Pool},
    },
};

use crate::error::StoreError;

pub type DbPool = Pool<AsyncPgConnection>;

/// Postgres-backed implementation of the comment and identity stores.
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn connect(database_url: &str, max_connections: usize) -> Result<Self, BuildError> {
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(database_url);
        let pool = Pool::builder(manager).max_size(max_connections).build()?;

        Ok(PgStore { pool })
    }

    pub(crate) async fn conn(&self) -> Result<Object<AsyncPgConnection>, StoreError> {
        Ok(self.pool.get().await?)
    }
}
