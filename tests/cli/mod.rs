pub mod support;

#[cfg(unix)]
mod maintenance;
#[cfg(unix)]
mod permanent;
#[cfg(unix)]
mod snippet;
