use chrono::NaiveDateTime;

use super::models::session::Session;

/// Whether the session presented with `auth_token` is usable right now.
pub fn valid(session: Option<&Session>, auth_token: Option<&str>) -> bool {
    valid_at(session, auth_token, chrono::Utc::now().naive_utc())
}

fn valid_at(session: Option<&Session>, auth_token: Option<&str>, now: NaiveDateTime) -> bool {
    match (session, auth_token) {
        (Some(session), Some(token)) => {
            session.active
                && session.token == token
                && session.issued_at <= now
                && now < session.expires_at
        }
        _ => false,
    }
}
