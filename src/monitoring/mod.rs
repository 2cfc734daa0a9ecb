pub mod logger;
pub mod table;
