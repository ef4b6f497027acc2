pub mod handlers;
pub mod render;
