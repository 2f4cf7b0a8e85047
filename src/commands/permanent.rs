//! Permanent program commands: create, run, list, remove

use rcc_core::error::Result;
use rcc_core::permanent::{PermanentState, PermanentStore};

use crate::cli::BuildArgs;
use crate::commands::dispatch::CommandContext;
use crate::commands::snippet::build_request;

pub fn create(
    ctx: &CommandContext,
    name: &str,
    desc: Option<&str>,
    build: &BuildArgs,
) -> Result<i32> {
    let request = build_request(build, &ctx.config, Some((name, desc)))?;
    let store = PermanentStore::new(&ctx.layout);
    Ok(if store.create(&request)? { 0 } else { 1 })
}

pub fn run(ctx: &CommandContext, name: &str, program_args: &[String]) -> Result<i32> {
    let status = PermanentStore::new(&ctx.layout).run(name, program_args)?;
    Ok(status.exit_code())
}

pub fn list(ctx: &CommandContext, zsh: bool) -> Result<i32> {
    let listing = PermanentStore::new(&ctx.layout).list()?;
    for permanent in &listing {
        let description = permanent.description.as_deref().unwrap_or_default();
        if zsh {
            println!("{}:{}", permanent.name, description);
            continue;
        }
        match permanent.state {
            PermanentState::Built => println!("{}: {}", permanent.name, description),
            PermanentState::BuildFailed => {
                println!("{}: {} (build failed)", permanent.name, description)
            }
        }
    }
    Ok(0)
}

pub fn remove(ctx: &CommandContext, names: &[String]) -> Result<i32> {
    let report = PermanentStore::new(&ctx.layout).remove(names);
    for error in &report.errors {
        eprintln!("error: {}", error);
    }
    println!("{}", report.summary());
    Ok(if report.is_success() { 0 } else { 1 })
}
