pub mod dashboard;
pub mod render;
pub mod setup;
pub mod ui;
