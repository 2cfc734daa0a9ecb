pub mod cache;
pub mod matching;
pub mod odds;
pub mod snapshot;
pub mod types;
