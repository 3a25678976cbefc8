pub mod access_tokens;
pub mod journal;
pub mod user;
