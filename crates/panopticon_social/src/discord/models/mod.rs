//! Diesel models for archived Discord entities.

mod channel;
mod guild;
mod message;
mod user;

pub use channel::{GuildChannelRow, NewGuildChannel, NewPrivateChannel, PrivateChannelRow};
pub use guild::{GuildRow, NewGuild};
pub use message::{
    AttachmentRow, DeletionRow, EditRow, MessageRow, NewAttachment, NewDeletion, NewEdit,
    NewMessage, Topology,
};
pub use user::{NewUser, UserRow};
