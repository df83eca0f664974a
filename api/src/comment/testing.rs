//! In-memory stores and request contexts for resolver tests.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::{
    context::{Api, RequestContext},
    error::StoreError,
    identity::{User, models::session::Session, store::IdentityStore, token::Claims},
};

use super::{Comment, NewComment, store::CommentStore};

#[derive(Default)]
struct State {
    comments: Vec<Comment>,
    users: HashMap<i32, String>,
    sessions: HashMap<String, Session>,
    next_id: i32,
    bulk_queries: usize,
    last_bulk_ids: Vec<i32>,
    reverse_bulk_results: bool,
    fail: bool,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

fn base_time() -> NaiveDateTime {
    chrono::DateTime::from_timestamp(1_700_000_000, 0)
        .unwrap()
        .naive_utc()
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user(&self, id: i32, name: &str) {
        self.state.lock().unwrap().users.insert(id, name.into());
    }

    /// Inserts a comment directly, bypassing permission checks.
    pub fn seed(&self, author: i32, content: &str, parent: &str, model: &str) -> Comment {
        let name = self
            .state
            .lock()
            .unwrap()
            .users
            .get(&author)
            .cloned()
            .unwrap_or_default();

        self.insert_now(NewComment {
            content: content.into(),
            author_name: name,
            author_reference: author,
            parent_reference: parent.into(),
            parent_model: model.into(),
            created_by: None,
        })
    }

    pub fn comments(&self) -> Vec<Comment> {
        self.state.lock().unwrap().comments.clone()
    }

    pub fn bulk_queries(&self) -> usize {
        self.state.lock().unwrap().bulk_queries
    }

    pub fn last_bulk_ids(&self) -> Vec<i32> {
        self.state.lock().unwrap().last_bulk_ids.clone()
    }

    pub fn reverse_bulk_results(&self) {
        self.state.lock().unwrap().reverse_bulk_results = true;
    }

    pub fn fail_queries(&self) {
        self.state.lock().unwrap().fail = true;
    }

    /// Stores a session for `identity_id` and returns its token.
    pub fn add_session(&self, identity_id: i32, valid: bool) -> String {
        let token = format!("wnrx_{identity_id}");
        self.state
            .lock()
            .unwrap()
            .sessions
            .insert(token.clone(), session_row(identity_id, &token, valid));
        token
    }

    pub fn context(&self, member: Member) -> RequestContext {
        let store = Arc::new(self.clone());
        let token = format!("wnrx_{}", member.mid);
        let session = member
            .session
            .map(|valid| session_row(member.mid, &token, valid));

        RequestContext {
            auth_token: session.as_ref().map(|_| token),
            session,
            decoded_token: Some(claims(member.mid, member.permissions)),
            mid: Some(member.mid),
            api: Api::new(store.clone(), store, Duration::from_millis(5)),
        }
    }

    fn insert_now(&self, comment: NewComment) -> Comment {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let created_at = base_time() + chrono::Duration::try_seconds(state.next_id as i64).unwrap();

        let comment = Comment {
            id: state.next_id,
            content: comment.content,
            author_name: comment.author_name,
            author_reference: comment.author_reference,
            parent_reference: comment.parent_reference,
            parent_model: comment.parent_model,
            created_by: comment.created_by,
            updated_by: None,
            created_at,
            updated_at: created_at,
        };
        state.comments.push(comment.clone());
        comment
    }

    fn check(&self) -> Result<(), StoreError> {
        match self.state.lock().unwrap().fail {
            true => Err(StoreError::Query(
                diesel::result::Error::BrokenTransactionManager,
            )),
            false => Ok(()),
        }
    }
}

pub fn session_row(identity_id: i32, token: &str, valid: bool) -> Session {
    let now = chrono::Utc::now().naive_utc();

    Session {
        id: identity_id,
        token: token.into(),
        active: true,
        issued_at: now - chrono::Duration::try_days(2).unwrap(),
        expires_at: match valid {
            true => now + chrono::Duration::try_days(1).unwrap(),
            false => now - chrono::Duration::try_days(1).unwrap(),
        },
        identity_id,
        created_at: now,
        updated_at: now,
    }
}

/// Unexpired claims for `sub`.
pub fn claims(sub: i32, permissions: Vec<String>) -> Claims {
    let now = chrono::Utc::now().timestamp();

    Claims {
        sub,
        permissions,
        exp: now + 600,
        iat: now,
    }
}

/// The caller a test context is built for.
pub struct Member {
    mid: i32,
    permissions: Vec<String>,
    /// `Some(true)` for a live session, `Some(false)` for an expired one.
    session: Option<bool>,
}

impl Member {
    pub fn new(mid: i32) -> Self {
        Member {
            mid,
            permissions: vec![],
            session: None,
        }
    }

    pub fn valid(mut self) -> Self {
        self.session = Some(true);
        self
    }

    pub fn expired(mut self) -> Self {
        self.session = Some(false);
        self
    }

    pub fn permissions(mut self, permissions: &[&str]) -> Self {
        self.permissions = permissions.iter().map(|p| p.to_string()).collect();
        self
    }
}

#[async_trait]
impl CommentStore for MemoryStore {
    async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<Comment>, StoreError> {
        {
            let mut state = self.state.lock().unwrap();
            state.bulk_queries += 1;
            state.last_bulk_ids = ids.to_vec();
        }
        self.check()?;

        let state = self.state.lock().unwrap();
        let mut rows: Vec<Comment> = state
            .comments
            .iter()
            .filter(|c| ids.contains(&c.id))
            .cloned()
            .collect();
        if state.reverse_bulk_results {
            rows.reverse();
        }
        Ok(rows)
    }

    async fn find_all(&self, offset: i64, limit: i64) -> Result<Vec<Comment>, StoreError> {
        self.check()?;

        let mut rows = self.comments();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(rows
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count_by_parent(
        &self,
        parent_reference: &str,
        parent_model: &str,
    ) -> Result<i64, StoreError> {
        self.check()?;

        Ok(self
            .comments()
            .iter()
            .filter(|c| c.parent_reference == parent_reference && c.parent_model == parent_model)
            .count() as i64)
    }

    async fn insert(&self, comment: NewComment) -> Result<Comment, StoreError> {
        self.check()?;
        Ok(self.insert_now(comment))
    }

    async fn update_content(
        &self,
        id: i32,
        content: String,
        updated_by: Option<i32>,
    ) -> Result<Option<Comment>, StoreError> {
        self.check()?;

        let mut state = self.state.lock().unwrap();
        Ok(state.comments.iter_mut().find(|c| c.id == id).map(|c| {
            c.content = content;
            c.updated_by = updated_by;
            c.updated_at = c.updated_at + chrono::Duration::try_seconds(1).unwrap();
            c.clone()
        }))
    }

    async fn delete(&self, id: i32) -> Result<Option<Comment>, StoreError> {
        self.check()?;

        let mut state = self.state.lock().unwrap();
        let position = state.comments.iter().position(|c| c.id == id);
        Ok(position.map(|i| state.comments.remove(i)))
    }
}

#[async_trait]
impl IdentityStore for MemoryStore {
    async fn find_user(&self, id: i32) -> Result<Option<User>, StoreError> {
        self.check()?;

        Ok(self
            .state
            .lock()
            .unwrap()
            .users
            .get(&id)
            .map(|name| User {
                id,
                full_name: name.clone(),
            }))
    }

    async fn find_session(&self, token: &str) -> Result<Option<Session>, StoreError> {
        self.check()?;
        Ok(self.state.lock().unwrap().sessions.get(token).cloned())
    }
}
