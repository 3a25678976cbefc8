pub(crate) mod chat;
pub(crate) mod journal;
pub(crate) mod local_time;
pub(crate) mod status;
pub(crate) mod user;
