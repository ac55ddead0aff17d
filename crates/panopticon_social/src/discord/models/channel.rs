//! Channel models for both topologies.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::Serialize;

/// Database row for the private_channels table.
///
/// The participant pair is always stored sorted, so `first_user_id` is the
/// numerically smaller id.
#[derive(Debug, Clone, PartialEq, Queryable, Identifiable, Selectable, Serialize)]
#[diesel(table_name = panopticon_database::schema::private_channels)]
#[diesel(primary_key(channel_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PrivateChannelRow {
    pub channel_id: i64,
    pub first_user_id: i64,
    pub second_user_id: i64,
}

/// Insertable struct for the private_channels table.
#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = panopticon_database::schema::private_channels)]
pub struct NewPrivateChannel {
    pub channel_id: i64,
    pub first_user_id: i64,
    pub second_user_id: i64,
}

impl NewPrivateChannel {
    /// Build a private channel row with the participants in canonical order.
    pub fn canonical(channel_id: i64, a: i64, b: i64) -> Self {
        Self {
            channel_id,
            first_user_id: a.min(b),
            second_user_id: a.max(b),
        }
    }
}

/// Database row for the guild_channels table.
#[derive(Debug, Clone, PartialEq, Queryable, Identifiable, Selectable, Serialize)]
#[diesel(table_name = panopticon_database::schema::guild_channels)]
#[diesel(primary_key(channel_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct GuildChannelRow {
    pub channel_id: i64,
    pub guild_id: i64,
    pub name: String,
    pub last_updated: NaiveDateTime,
}

/// Insertable struct for the guild_channels table.
#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = panopticon_database::schema::guild_channels)]
pub struct NewGuildChannel {
    pub channel_id: i64,
    pub guild_id: i64,
    pub name: String,
}
