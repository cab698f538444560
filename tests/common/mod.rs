//! Shared test utilities for the CLI end-to-end tests.
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_file("templates/a", "{{ Name }}");
//!     fixture.command().arg("ls").arg("--mount").arg(fixture.mount("templates", "/t"));
//! }
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::configs;
    pub use super::TestFixture;
}

/// Configuration documents used across tests.
#[allow(dead_code)]
pub mod configs {
    /// Supplies `Test` for the include scenario.
    pub const HELLO: &str = "Config:\n  Test: Hello, World!\n";

    /// Supplies `Name`.
    pub const NAME: &str = "Config:\n  Name: tmpl\n";

    /// Valid YAML without the required `Config` key.
    pub const MISSING_CONFIG_KEY: &str = "Other:\n  Name: tmpl\n";

    /// Invalid YAML for error testing.
    pub const INVALID_YAML: &str = "Config: [unclosed";
}

/// A temporary directory holding template sources and configuration files.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of `relative` inside the fixture.
    pub fn join(&self, relative: &str) -> PathBuf {
        self.temp_dir.path().join(relative)
    }

    /// A `SOURCE:TARGET` mount spec for a path inside the fixture.
    pub fn mount(&self, source: &str, target: &str) -> String {
        format!("{}:{}", self.join(source).display(), target)
    }

    /// Read a file written into the fixture.
    #[allow(dead_code)]
    pub fn read(&self, relative: &str) -> String {
        std::fs::read_to_string(self.join(relative)).expect("Failed to read file")
    }

    /// Create a child path in the temp directory.
    #[allow(dead_code)]
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// Create a command configured to run in this fixture's directory.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("tmpl");
        cmd.current_dir(self.path());
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_with_file() {
        let fixture = TestFixture::new().with_file("templates/a", "hello");
        assert!(fixture.join("templates/a").exists());
    }

    #[test]
    fn test_fixture_mount_spec() {
        let fixture = TestFixture::new();
        let spec = fixture.mount("templates", "/t");
        assert!(spec.ends_with("templates:/t"));
        assert!(spec.starts_with('/'));
    }

    #[test]
    fn test_configs_parse_as_yaml() {
        for config in [configs::HELLO, configs::NAME, configs::MISSING_CONFIG_KEY] {
            serde_yaml::from_str::<serde_yaml::Value>(config).expect("Config should be valid YAML");
        }
        assert!(serde_yaml::from_str::<serde_yaml::Value>(configs::INVALID_YAML).is_err());
    }
}
