//! Auto-wrap: `rcc '2+3*5'` prints `17`
//!
//! If the last code fragment is not statement-shaped it is first tried as an
//! expression streamed to stdout, silently. If that does not compile, the
//! literal request is built and run normally.

use crate::cache::{BuildCache, BuildOutcome};
use crate::error::Result;
use crate::request::BuildRequest;

/// Whether a fragment already reads as a statement or block
fn is_statement_shaped(fragment: &str) -> bool {
    let trimmed = fragment.trim_end();
    trimmed.is_empty() || trimmed.ends_with(';') || trimmed.ends_with('}')
}

/// The wrapped variant of `request`, if its last fragment is an expression
pub fn wrap_candidate(request: &BuildRequest) -> Option<BuildRequest> {
    let (last, earlier) = request.code_fragments().split_last()?;
    if is_statement_shaped(last) {
        return None;
    }
    let mut fragments = earlier.to_vec();
    fragments.push(format!("cout << ({}) << endl;", last));
    Some(request.with_code_fragments(fragments))
}

/// Run `request` through the cache, trying the wrapped form first
pub fn run_with_autowrap(
    cache: &BuildCache<'_>,
    request: &BuildRequest,
    program_args: &[String],
) -> Result<BuildOutcome> {
    if let Some(wrapped) = wrap_candidate(request) {
        tracing::debug!("trying to wrap code with 'cout << ... << endl;'");
        match cache.run(&wrapped, program_args, true)? {
            BuildOutcome::CompileFailed => {
                tracing::debug!("wrapped code did not compile, using it as written");
            }
            ran => return Ok(ran),
        }
    }
    cache.run(request, program_args, false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(fragments: &[&str]) -> BuildRequest {
        let mut builder = BuildRequest::builder("g++", "c++17");
        for f in fragments {
            builder = builder.code(*f);
        }
        builder.build()
    }

    #[test]
    fn test_expression_is_wrapped() {
        let wrapped = wrap_candidate(&request(&["2+3*5"])).unwrap();
        assert_eq!(wrapped.code(), "cout << (2+3*5) << endl;");
    }

    #[test]
    fn test_statement_is_not_wrapped() {
        assert!(wrap_candidate(&request(&["int x=5;"])).is_none());
        assert!(wrap_candidate(&request(&["if (1) { f(); }"])).is_none());
        assert!(wrap_candidate(&request(&["int x=5;  "])).is_none());
        assert!(wrap_candidate(&request(&[""])).is_none());
        assert!(wrap_candidate(&request(&[])).is_none());
    }

    #[test]
    fn test_only_last_fragment_is_wrapped() {
        let wrapped = wrap_candidate(&request(&["int x = 2;", "x * 21"])).unwrap();
        assert_eq!(
            wrapped.code_fragments(),
            ["int x = 2;", "cout << (x * 21) << endl;"]
        );
    }

    #[test]
    fn test_wrapped_request_keeps_configuration() {
        let req = BuildRequest::builder("clang++", "c++20")
            .cxxflag("-O2")
            .include("vector")
            .code("1")
            .build();
        let wrapped = wrap_candidate(&req).unwrap();
        assert_eq!(wrapped.identifier_tag(), req.identifier_tag());
        assert_ne!(wrapped.cache_key(), req.cache_key());
    }

    #[cfg(unix)]
    mod with_toolchain {
        use super::*;
        use crate::test_support::FakeToolchain;

        #[test]
        fn test_wrapped_attempt_runs_first() {
            let fake = FakeToolchain::install("g++");
            let layout = fake.layout();
            let cache = BuildCache::open(&layout).unwrap();
            let req = BuildRequest::builder(fake.compiler(), "c++17")
                .code("2+3*5")
                .build();

            let outcome = run_with_autowrap(&cache, &req, &[]).unwrap();
            assert_eq!(outcome.exit_code(), 0);
            assert_eq!(fake.compile_count(), 1);

            let wrapped = wrap_candidate(&req).unwrap();
            assert!(layout.ephemeral_pair(&wrapped.cache_key()).binary.is_file());
            assert!(!layout.ephemeral_pair(&req.cache_key()).binary.exists());
        }

        #[test]
        fn test_falls_back_to_literal_request() {
            let fake = FakeToolchain::install("g++");
            let layout = fake.layout();
            let cache = BuildCache::open(&layout).unwrap();
            let req = BuildRequest::builder(fake.compiler(), "c++17")
                .code("RCC_TEST_NOWRAP()")
                .build();

            let outcome = run_with_autowrap(&cache, &req, &[]).unwrap();
            assert_eq!(outcome.exit_code(), 0);
            assert_eq!(fake.compile_count(), 2);
            assert!(layout.ephemeral_pair(&req.cache_key()).binary.is_file());
        }

        #[test]
        fn test_statement_compiles_once() {
            let fake = FakeToolchain::install("g++");
            let layout = fake.layout();
            let cache = BuildCache::open(&layout).unwrap();
            let req = BuildRequest::builder(fake.compiler(), "c++17")
                .code("int x=5;")
                .build();

            run_with_autowrap(&cache, &req, &[]).unwrap();
            assert_eq!(fake.compile_count(), 1);
        }
    }
}
