//! HTTP API handlers for moodwav-web

pub mod health;
pub mod predict;
pub mod ui;
pub mod uploads;

pub use health::health_routes;
pub use predict::predict_routes;
pub use ui::ui_routes;
pub use uploads::upload_routes;
