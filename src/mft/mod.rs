pub mod attributes;
pub mod boot;
pub mod parser;
pub mod record;
pub mod utils;
