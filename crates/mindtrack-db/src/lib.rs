pub mod access_tokens;
pub mod journal;
pub mod migration;
pub mod user;
pub mod util;

pub use sea_orm;
