pub mod audio;
pub mod camera;
pub mod debug;
pub mod input;
pub mod physics;
pub mod player;
pub mod ron;
pub use crate::ron as ron_loader;
pub mod settings;
pub mod state;
pub mod ui;
pub mod world;
