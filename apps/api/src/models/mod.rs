pub mod catalog;
pub mod ids;
