//! Fake toolchain for tests
//!
//! The fake compiler is a shell script that logs every invocation, answers
//! preprocess-only probes, and "compiles" by writing a script that prints the
//! rendered source and its arguments. Markers inside the snippet steer it:
//! - `RCC_TEST_BREAK`: compilation fails
//! - `RCC_TEST_NOWRAP`: compilation fails if the snippet was auto-wrapped
//! - `RCC_TEST_EXIT_<n>`: the program exits with `n`
//! - `RCC_TEST_SIGNAL`: the program kills itself with SIGKILL

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::assets::{PCH_ALL_FILE, PCH_FILE};
use crate::install::{install, InstallOptions};
use crate::layout::{CacheLayout, TEMPLATES_DIR};

const FAKE_COMPILER: &str = r#"#!/bin/sh
dir=$(dirname "$0")
out=""
src=""
probe=0
prev=""
for arg in "$@"; do
    if [ "$prev" = "-o" ]; then out="$arg"; fi
    case "$arg" in
        -E) probe=1 ;;
        *.cpp) if [ -z "$src" ]; then src="$arg"; fi ;;
    esac
    prev="$arg"
done
if [ "$probe" = 1 ]; then
    echo probe >> "$dir/probes.log"
    if [ -f "$dir/probe_fails" ]; then exit 1; fi
    exit 0
fi
echo compile >> "$dir/compiles.log"
if grep -q RCC_TEST_BREAK "$src"; then
    echo "$src: error: RCC_TEST_BREAK" >&2
    exit 1
fi
if grep -q RCC_TEST_NOWRAP "$src" && grep -q 'cout << (' "$src"; then
    echo "$src: error: wrapped" >&2
    exit 1
fi
code=$(sed -n 's/.*RCC_TEST_EXIT_\([0-9][0-9]*\).*/\1/p' "$src" | head -n 1)
{
    echo '#!/bin/sh'
    echo "cat '$src'"
    echo 'echo "args: $*"'
    if grep -q RCC_TEST_SIGNAL "$src"; then echo 'kill -9 $$'; fi
    echo "exit ${code:-0}"
} > "$out"
chmod +x "$out"
"#;

pub struct FakeToolchain {
    _dir: TempDir,
    root: PathBuf,
    bin_dir: PathBuf,
    compiler: String,
}

impl FakeToolchain {
    /// Install a cache root and a fake compiler named `name`
    pub fn install(name: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("root");
        let bin_dir = dir.path().join("bin");
        fs::create_dir_all(&bin_dir).unwrap();

        install(&root, &InstallOptions::default()).unwrap();

        let compiler_path = bin_dir.join(name);
        fs::write(&compiler_path, FAKE_COMPILER).unwrap();
        make_executable(&compiler_path);

        let templates = root.join(TEMPLATES_DIR);
        fs::write(templates.join(PCH_FILE), "fake pch").unwrap();
        fs::write(templates.join(PCH_ALL_FILE), "fake pch").unwrap();

        Self {
            compiler: compiler_path.to_string_lossy().into_owned(),
            _dir: dir,
            root,
            bin_dir,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn compiler(&self) -> &str {
        &self.compiler
    }

    pub fn layout(&self) -> CacheLayout {
        CacheLayout::resolve(&self.root).unwrap()
    }

    pub fn fail_probes(&self) {
        fs::write(self.bin_dir.join("probe_fails"), "").unwrap();
    }

    pub fn compile_count(&self) -> usize {
        count_lines(&self.bin_dir.join("compiles.log"))
    }

    pub fn probe_count(&self) -> usize {
        count_lines(&self.bin_dir.join("probes.log"))
    }
}

fn count_lines(path: &Path) -> usize {
    fs::read_to_string(path)
        .map(|s| s.lines().count())
        .unwrap_or(0)
}

#[cfg(unix)]
fn make_executable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) {}
