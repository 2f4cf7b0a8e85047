use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::{cargo::cargo_bin_cmd, Command};
use tempfile::TempDir;

/// Stand-in for g++: logs compiles and "compiles" to a script that prints the
/// rendered source and its arguments. `RCC_TEST_BREAK` fails the compile,
/// `RCC_TEST_EXIT_<n>` sets the exit code, `RCC_TEST_SIGNAL` kills the program.
const FAKE_COMPILER: &str = r#"#!/bin/sh
dir=$(dirname "$0")
out=""
src=""
prev=""
for arg in "$@"; do
    if [ "$prev" = "-o" ]; then out="$arg"; fi
    case "$arg" in
        *.cpp) if [ -z "$src" ]; then src="$arg"; fi ;;
    esac
    prev="$arg"
done
if [ -z "$src" ]; then exit 0; fi
echo compile >> "$dir/compiles.log"
if grep -q RCC_TEST_BREAK "$src"; then
    echo "$src: error: RCC_TEST_BREAK" >&2
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

/// Get a Command for rcc, isolated from the user's environment
pub fn rcc() -> Command {
    let mut cmd = cargo_bin_cmd!("rcc");
    cmd.env_remove("RCC_LOG").env_remove("RCC_CACHE_DIR");
    cmd
}

/// An installed cache root whose configured compiler is the fake one
pub struct TestEnv {
    _dir: TempDir,
    root: PathBuf,
    bin_dir: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("rcc");
        let bin_dir = dir.path().join("bin");
        fs::create_dir_all(&bin_dir).unwrap();

        let compiler = bin_dir.join("g++");
        fs::write(&compiler, FAKE_COMPILER).unwrap();
        make_executable(&compiler);

        rcc().arg("--cache-dir").arg(&root).arg("init").assert().success();
        fs::write(
            root.join("config.toml"),
            format!(
                "compiler = \"{}\"\nstd = \"c++17\"\ncxxflags = [\"-Wall\"]\n\n[janitor]\none_in = 0\n",
                compiler.display()
            ),
        )
        .unwrap();

        Self {
            _dir: dir,
            root,
            bin_dir,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// rcc bound to this cache root
    pub fn rcc(&self) -> Command {
        let mut cmd = rcc();
        cmd.env("RCC_CACHE_DIR", &self.root);
        cmd
    }

    pub fn compile_count(&self) -> usize {
        fs::read_to_string(self.bin_dir.join("compiles.log"))
            .map(|s| s.lines().count())
            .unwrap_or(0)
    }

    pub fn cache_files(&self) -> Vec<PathBuf> {
        fs::read_dir(self.root.join("cache"))
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect()
    }
}

#[cfg(unix)]
fn make_executable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) {}
