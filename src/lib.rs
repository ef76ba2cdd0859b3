pub mod core;
#[cfg(feature = "logging")]
mod settings;
