pub mod matrix;
pub mod sort;
