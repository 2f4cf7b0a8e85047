//! RCC Core Library
//!
//! Build cache and compiler orchestration for rcc: snippet identity, template
//! rendering, compiler commands, the ephemeral and permanent artifact stores,
//! and cache eviction.

pub mod assets;
pub mod autowrap;
pub mod cache;
pub mod compiler;
pub mod config;
pub mod error;
pub mod hash;
pub mod install;
pub mod janitor;
pub mod layout;
pub mod logging;
pub mod permanent;
pub mod process;
pub mod request;
pub mod suggest;
pub mod template;

#[cfg(test)]
mod test_support;
