use diesel::prelude::*;
use serde_json::Value as JsonValue;

#[allow(dead_code)]
#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::identities)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Identity {
    pub id: i32,
    pub traits: JsonValue,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

impl Identity {
    /// Traits are free-form JSON, so unreadable ones are treated as empty.
    pub fn get_traits(&self) -> Traits {
        serde_json::from_value(self.traits.clone()).unwrap_or_else(|error| {
            tracing::warn!(%error, identity_id = self.id, "Could not read identity traits");
            Traits::default()
        })
    }
}

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, Default)]
pub struct Traits {
    pub email: Option<String>,
    pub name: Option<String>,
}
