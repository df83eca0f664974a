use std::{convert::Infallible, sync::Arc, time::Duration};

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, request::Parts},
};
use axum_extra::extract::cookie::CookieJar;

use crate::{
    App,
    comment::{datasource::CommentDataSource, store::CommentStore},
    identity::{
        COOKIE_NAME, permission, session,
        models::session::Session,
        store::IdentityStore,
        token::{Claims, decode_token},
    },
};

/// Data sources available to resolvers for the duration of one request.
pub struct Api {
    pub comment: CommentDataSource,
}

impl Api {
    pub fn new(
        comments: Arc<dyn CommentStore>,
        identities: Arc<dyn IdentityStore>,
        batch_delay: Duration,
    ) -> Self {
        Api {
            comment: CommentDataSource::new(comments, identities, batch_delay),
        }
    }
}

/// Everything a resolver knows about the caller.
pub struct RequestContext {
    pub session: Option<Session>,
    pub auth_token: Option<String>,
    pub decoded_token: Option<Claims>,
    /// Acting member id.
    pub mid: Option<i32>,
    pub api: Api,
}

impl RequestContext {
    pub fn session_valid(&self) -> bool {
        session::valid(self.session.as_ref(), self.auth_token.as_deref())
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        permission::exists(self.decoded_token.as_ref(), permission)
    }

    /// The member to record in audit fields, captured only while the session
    /// is valid.
    pub fn acting_member(&self) -> Option<i32> {
        if self.session_valid() { self.mid } else { None }
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
}

impl RequestContext {
    /// Builds the caller's context from the `auth_token` cookie and the
    /// optional bearer token. Neither is required: an unknown session, a
    /// failed session lookup or an undecodable token leave the matching
    /// fields empty.
    pub async fn from_headers(
        headers: &HeaderMap,
        comments: Arc<dyn CommentStore>,
        identities: Arc<dyn IdentityStore>,
        jwt_secret: &str,
        batch_delay: Duration,
    ) -> Self {
        let jar = CookieJar::from_headers(headers);
        let auth_token = jar.get(COOKIE_NAME).map(|c| c.value().to_owned());

        let session = match auth_token.as_deref() {
            Some(token) => identities.find_session(token).await.unwrap_or_else(|error| {
                // audit fields stay empty, the request still runs
                tracing::error!(%error, "Could not load session");
                None
            }),
            None => None,
        };

        let decoded_token =
            bearer_token(headers).and_then(|token| match decode_token(token, jwt_secret) {
                Ok(claims) => Some(claims),
                Err(error) => {
                    tracing::debug!(%error, "Ignoring invalid bearer token");
                    None
                }
            });

        let mid = decoded_token
            .as_ref()
            .map(|claims| claims.sub)
            .or_else(|| session.as_ref().map(|s| s.identity_id));

        RequestContext {
            session,
            auth_token,
            decoded_token,
            mid,
            api: Api::new(comments, identities, batch_delay),
        }
    }
}

impl FromRequestParts<App> for RequestContext {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &App) -> Result<Self, Self::Rejection> {
        Ok(RequestContext::from_headers(
            &parts.headers,
            state.store.clone(),
            state.store.clone(),
            &state.config.jwt_secret,
            state.config.comment_batch_delay,
        )
        .await)
    }
}
