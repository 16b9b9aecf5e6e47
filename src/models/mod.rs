//! Data models for conversations and messages

mod conversation;
mod message;

pub mod fixtures;

pub use conversation::*;
pub use message::*;
