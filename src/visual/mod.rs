pub mod bubbles;
pub mod haptics;
pub mod plugin;
pub mod utils;
