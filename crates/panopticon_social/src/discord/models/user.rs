//! Discord user models.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::Serialize;

/// Database row for the users table.
#[derive(Debug, Clone, PartialEq, Queryable, Identifiable, Selectable, Serialize)]
#[diesel(table_name = panopticon_database::schema::users)]
#[diesel(primary_key(user_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    pub user_id: i64,
    pub created_at: NaiveDateTime,
    pub name: String,
    pub discriminator: Option<String>, // Legacy discriminator, absent for unique usernames
    pub bot: bool,
    pub last_updated: NaiveDateTime,
}

/// Insertable struct for the users table.
///
/// `last_updated` is left to the column default on insert and bumped by the
/// upsert on conflict.
#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = panopticon_database::schema::users)]
pub struct NewUser {
    pub user_id: i64,
    pub created_at: NaiveDateTime,
    pub name: String,
    pub discriminator: Option<String>,
    pub bot: bool,
}
