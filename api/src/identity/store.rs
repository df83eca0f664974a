use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::{
    db::PgStore,
    error::StoreError,
    schema::{identities, sessions},
};

use super::{
    User,
    models::{identity::Identity, session::Session},
};

/// Read access to members and their sessions.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn find_user(&self, id: i32) -> Result<Option<User>, StoreError>;

    async fn find_session(&self, token: &str) -> Result<Option<Session>, StoreError>;
}

#[async_trait]
impl IdentityStore for PgStore {
    async fn find_user(&self, id: i32) -> Result<Option<User>, StoreError> {
        let mut conn = self.conn().await?;

        let identity = identities::table
            .find(id)
            .select(Identity::as_select())
            .first(&mut conn)
            .await
            .optional()?;

        Ok(identity.map(User::from))
    }

    async fn find_session(&self, token: &str) -> Result<Option<Session>, StoreError> {
        let mut conn = self.conn().await?;

        Ok(sessions::table
            .filter(sessions::token.eq(token))
            .select(Session::as_select())
            .first(&mut conn)
            .await
            .optional()?)
    }
}
