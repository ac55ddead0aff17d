//! Guild (Discord server) models.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::Serialize;

/// Database row for the guilds table.
#[derive(Debug, Clone, PartialEq, Queryable, Identifiable, Selectable, Serialize)]
#[diesel(table_name = panopticon_database::schema::guilds)]
#[diesel(primary_key(guild_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct GuildRow {
    pub guild_id: i64,
    pub name: String,
    pub last_updated: NaiveDateTime,
}

/// Insertable struct for the guilds table.
#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = panopticon_database::schema::guilds)]
pub struct NewGuild {
    pub guild_id: i64,
    pub name: String,
}
