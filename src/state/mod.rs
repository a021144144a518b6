#[cfg(feature = "desktop")]
pub mod commands;
pub mod controller;
pub mod seed;

pub use controller::StateController;
pub use seed::default_snacks;
