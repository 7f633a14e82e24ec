pub mod actions;
pub mod components;
pub mod render;
pub mod status;
pub mod sync;
