//! CLI commands for rcc

pub mod dispatch;
pub mod init;
pub mod permanent;
pub mod snippet;
