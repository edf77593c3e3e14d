// src/lib.rs
pub mod config;
pub mod errors;
pub mod models;
pub mod parser;
pub mod invocation;
pub mod runner;
pub mod verifier;
pub mod banner;
pub mod api;
