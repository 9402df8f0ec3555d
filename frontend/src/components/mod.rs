pub mod chat;
pub mod suggestions;
