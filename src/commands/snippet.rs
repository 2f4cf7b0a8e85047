//! Default mode: build and run a snippet through the cache

use rcc_core::autowrap::run_with_autowrap;
use rcc_core::cache::BuildCache;
use rcc_core::config::RccConfig;
use rcc_core::error::Result;
use rcc_core::request::{BuildRequest, INCLUDE_ALL_HEADER};

use crate::cli::items::classify;
use crate::cli::{BuildArgs, SnippetArgs};
use crate::commands::dispatch::{Command, CommandContext, NoCommand};

/// Assemble a request from command-line arguments on top of the config defaults
pub fn build_request(
    build: &BuildArgs,
    config: &RccConfig,
    permanent: Option<(&str, Option<&str>)>,
) -> Result<BuildRequest> {
    let items = classify(&build.items, build.code.clone());
    let compiler = build.compiler.as_deref().unwrap_or(&config.compiler);
    let std = items.std.as_deref().unwrap_or(&config.std);

    let mut request = BuildRequest::builder(compiler, std)
        .cxxflags(config.cxxflags.iter().cloned())
        .cxxflags(items.cxxflags);
    for flag in items.extra_flags {
        request = request.extra_flag(flag);
    }

    for header in &build.include {
        request = request.include(header.clone());
    }
    if build.include_all && !build.include.iter().any(|h| h == INCLUDE_ALL_HEADER) {
        request = request.include(INCLUDE_ALL_HEADER);
    }

    for source in &build.compile_with {
        if !source.is_file() {
            rcc_core::bail_usage!(format!(
                "--compile-with: file does not exist: {}",
                source.display()
            ));
        }
        request = request.extra_source(source.to_string_lossy().into_owned());
    }

    for code in &build.put_above_main {
        request = request.above_main(code.clone());
    }
    for code in &build.function {
        request = request.function(code.clone());
    }
    for fragment in items.code {
        request = request.code(fragment);
    }

    if let Some((name, desc)) = permanent {
        request = request.permanent(name);
        if let Some(desc) = desc {
            request = request.description(desc);
        }
    }

    Ok(request.build())
}

pub fn execute(ctx: &CommandContext, args: &SnippetArgs) -> Result<i32> {
    let request = build_request(&args.build, &ctx.config, None)?;
    if !request.has_code() {
        if ctx.cli.snippet.clean_cache {
            return Ok(0);
        }
        return NoCommand.execute(ctx);
    }

    let cache = BuildCache::open(&ctx.layout)?;
    let outcome = run_with_autowrap(&cache, &request, &args.program_args)?;
    Ok(outcome.exit_code())
}
