// Library target for integration tests and the beacon-server binary.
// The quiz entry point is main.rs, which re-declares the module tree.
// Some items are only reached through the binary, so suppress dead_code warnings.
#![allow(dead_code)]

pub mod app;
pub mod config;
pub mod curriculum;
pub mod engine;
pub mod event;
pub mod session;
pub mod telemetry;
pub mod ui;

#[cfg(feature = "server")]
pub mod server;
