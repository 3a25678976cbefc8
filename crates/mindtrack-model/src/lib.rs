pub mod chat;
pub mod journal;
pub mod login;
pub mod stats;
pub mod status;
pub mod user;
