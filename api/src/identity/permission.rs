use super::token::Claims;

/// Whether the decoded bearer token grants `permission`.
///
/// Grants are exact string matches against the token's permission list.
pub fn exists(decoded_token: Option<&Claims>, permission: &str) -> bool {
    exists_at(decoded_token, permission, chrono::Utc::now().timestamp())
}

fn exists_at(decoded_token: Option<&Claims>, permission: &str, now: i64) -> bool {
    decoded_token.is_some_and(|claims| {
        claims.exp > now && claims.permissions.iter().any(|p| p == permission)
    })
}
