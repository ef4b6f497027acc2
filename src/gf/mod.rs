pub mod tables;
pub mod weight;
