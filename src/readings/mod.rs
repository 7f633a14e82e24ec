pub mod canvas;
pub mod chart;
pub mod components;
pub mod create_readings;
