pub mod chat;
pub mod export;
pub mod journal;
pub mod llm;
pub mod reflection;
pub mod safety;
pub mod stats;
pub mod status;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
