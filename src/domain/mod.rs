pub mod records;
pub mod tool;
pub mod types;
