pub mod db;
pub mod generate;
pub mod types;
