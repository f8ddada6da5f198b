pub mod config;
pub mod downloader;
pub mod filter;
pub mod job;
pub mod logging;
pub mod manifest;
pub mod pathsafe;
pub mod progress;
