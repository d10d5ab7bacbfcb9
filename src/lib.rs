pub mod ambient;
pub mod camera_rig;
pub mod config;
pub mod constants;
pub mod decorations;
pub mod emitters;
pub mod engine;
pub mod explosions;
pub mod heart_mesh;
pub mod math_utils;
pub mod plugin;
pub mod pool;
pub mod render_bridge;
pub mod renderer;
pub mod scheduler;
pub mod setup;
