// src/api/handlers/mod.rs
mod health;
mod verify;
mod compile;

pub use health::health_check;
pub use verify::verify;
pub use compile::compile;
