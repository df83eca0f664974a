use self::models::identity::Identity;

pub mod models;
pub mod permission;
pub mod session;
pub mod store;
pub mod token;

/// Cookie carrying the session token.
pub const COOKIE_NAME: &str = "auth_token";

/// A member as seen by the comment subsystem.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i32,
    pub full_name: String,
}

impl From<Identity> for User {
    fn from(identity: Identity) -> Self {
        let full_name = identity.get_traits().name.unwrap_or_else(|| {
            tracing::warn!("No name in traits found for identity ID `{}`", identity.id);
            String::new()
        });

        User {
            id: identity.id,
            full_name,
        }
    }
}
