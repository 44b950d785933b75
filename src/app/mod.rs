pub mod display;
pub mod navigation;
pub mod setup;

pub use display::sync_vsync_settings;
pub use navigation::navigate_sections;
pub use setup::setup;
