//! CLI command implementations

pub mod clean;
pub mod delete;
pub mod generate;
pub mod init;
pub mod list;
pub mod new;
pub mod render;
pub mod show;
pub mod upload;
