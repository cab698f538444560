//! # Generation Runs
//!
//! [`generate`] performs one complete run: it stacks the mounts, merges the
//! configuration documents, renders the entry template against the merged
//! `Config` mapping and writes the result to the output file.
//!
//! Every run uses a fresh [`TemplateCache`], so templates included several
//! times during the run are read and compiled only once.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::info;

use crate::config::ConfigSpec;
use crate::error::Result;
use crate::filesystem::FileSystem;
use crate::overlay::MountSet;
use crate::path;
use crate::template::{Options, TemplateCache};

/// Inputs of one generation run.
#[derive(Debug, Clone, Default)]
pub struct GenerateRequest {
    /// Absolute virtual path of the entry template.
    pub template: String,
    /// Mount specs in precedence order, highest first.
    pub mounts: Vec<String>,
    /// Configuration documents, merged left to right.
    pub configs: Vec<PathBuf>,
    /// Output file; relative paths are taken against the working directory.
    pub out: PathBuf,
    pub options: Options,
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Absolute paths of the files written.
    pub filenames: Vec<PathBuf>,
    pub duration: Duration,
}

impl Report {
    /// One-line summary, e.g. `Generated 1 file in 2.1ms`.
    pub fn summary(&self) -> String {
        let count = self.filenames.len();
        format!(
            "Generated {} {} in {:?}",
            count,
            if count == 1 { "file" } else { "files" },
            self.duration
        )
    }
}

/// Run one generation.
///
/// The template is rendered completely before the output file is created,
/// so a failing run never truncates an existing output.
pub fn generate(fs: Arc<dyn FileSystem>, request: &GenerateRequest) -> Result<Report> {
    let start = Instant::now();

    let mounts = MountSet::new(Arc::clone(&fs), request.mounts.as_slice())?;
    let config = ConfigSpec::load(fs.as_ref(), request.configs.as_slice())?;
    let out = path::absolutize(&request.out)?;

    let cache = Arc::new(TemplateCache::new(Arc::new(mounts), request.options.clone()));
    let template = cache.resolve(&request.template)?;
    let rendered = template.execute(config.config())?;
    let compiled = cache.len()?;

    let mut writer = fs.create(&out)?;
    writer.write_all(rendered.as_bytes())?;
    writer.flush()?;

    let duration = start.elapsed();
    info!(
        "Generated {} from {} ({} templates compiled) in {:?}",
        out.display(),
        template.name(),
        compiled,
        duration
    );

    Ok(Report {
        filenames: vec![out],
        duration,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::filesystem::{MemoryFS, OsFileSystem};
    use serial_test::serial;
    use std::path::Path;

    fn staged_fs() -> Arc<MemoryFS> {
        let fs = Arc::new(MemoryFS::new());
        fs.add_file_string("/source/a", "{{ include(path=\"./b/c\") }}")
            .unwrap();
        fs.add_file_string(
            "/source/b/c",
            "Data: {{ Test }}\nFilename: {{ filename() }}",
        )
        .unwrap();
        fs.add_file_string("/config/config.yaml", "Config:\n  Test: Hello, World!")
            .unwrap();
        fs.add_dir("/out").unwrap();
        fs
    }

    fn request(template: &str, mounts: &[&str]) -> GenerateRequest {
        GenerateRequest {
            template: template.to_string(),
            mounts: mounts.iter().map(|m| m.to_string()).collect(),
            configs: vec![PathBuf::from("/config/config.yaml")],
            out: PathBuf::from("/out/result"),
            options: Options::default(),
        }
    }

    #[test]
    fn test_generate_with_include() {
        let fs = staged_fs();

        let report = generate(fs.clone(), &request("/target/a", &["/source:/target"])).unwrap();

        assert_eq!(report.filenames, vec![PathBuf::from("/out/result")]);
        assert_eq!(
            fs.file_string("/out/result").unwrap(),
            "Data: Hello, World!\nFilename: /target/b/c"
        );
    }

    #[test]
    fn test_generate_single_file_mount() {
        let fs = staged_fs();
        fs.add_file_string("/single/a", "{{ Test }}").unwrap();

        generate(fs.clone(), &request("/target/a", &["/single/a:/target/"])).unwrap();

        assert_eq!(fs.file_string("/out/result").unwrap(), "Hello, World!");
    }

    #[test]
    fn test_generate_missing_template_leaves_output_untouched() {
        let fs = staged_fs();
        fs.add_file_string("/out/result", "previous").unwrap();

        let err = generate(fs.clone(), &request("/target/missing", &["/source:/target"]))
            .unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(fs.file_string("/out/result").unwrap(), "previous");
    }

    #[test]
    fn test_generate_missing_output_directory() {
        let fs = staged_fs();
        let mut request = request("/target/a", &["/source:/target"]);
        request.out = PathBuf::from("/missing/result");

        let err = generate(fs.clone(), &request).unwrap_err();

        assert!(err.is_not_found());
        assert!(!fs.exists("/missing"));
    }

    #[test]
    fn test_generate_invalid_mount() {
        let fs = staged_fs();
        let err = generate(fs, &request("/target/a", &["/source"])).unwrap_err();
        assert!(matches!(err, Error::MountInvalid { .. }));
    }

    #[test]
    fn test_generate_invalid_config() {
        let fs = staged_fs();
        fs.add_file_string("/config/config.yaml", "Other: 1").unwrap();

        let err = generate(fs, &request("/target/a", &["/source:/target"])).unwrap_err();
        assert!(matches!(err, Error::ConfigInvalid { .. }));
    }

    #[test]
    fn test_generate_on_disk() {
        let temp = tempfile::TempDir::new().unwrap();
        let root = temp.path();
        std::fs::create_dir_all(root.join("templates")).unwrap();
        std::fs::write(root.join("templates/readme"), "# {{ Name }}").unwrap();
        std::fs::write(root.join("config.yaml"), "Config:\n  Name: tmpl").unwrap();

        let request = GenerateRequest {
            template: "/t/readme".to_string(),
            mounts: vec![format!("{}:/t", root.join("templates").display())],
            configs: vec![root.join("config.yaml")],
            out: root.join("README.md"),
            options: Options::default(),
        };

        let report = generate(Arc::new(OsFileSystem::new()), &request).unwrap();
        assert_eq!(report.filenames, vec![root.join("README.md")]);
        assert_eq!(
            std::fs::read_to_string(root.join("README.md")).unwrap(),
            "# tmpl"
        );
    }

    #[test]
    #[serial]
    fn test_generate_relative_output_uses_working_directory() {
        let temp = tempfile::TempDir::new().unwrap();
        std::fs::write(temp.path().join("page"), "page").unwrap();
        let previous = std::env::current_dir().unwrap();
        std::env::set_current_dir(temp.path()).unwrap();

        let request = GenerateRequest {
            template: "/t/page".to_string(),
            mounts: vec![format!("{}:/t", temp.path().display())],
            out: PathBuf::from("./out.txt"),
            ..Default::default()
        };
        let result = generate(Arc::new(OsFileSystem::new()), &request);
        let cwd = std::env::current_dir().unwrap();
        std::env::set_current_dir(previous).unwrap();

        let report = result.unwrap();
        assert_eq!(report.filenames, vec![cwd.join("out.txt")]);
        assert_eq!(
            std::fs::read_to_string(temp.path().join("out.txt")).unwrap(),
            "page"
        );
    }

    #[test]
    fn test_report_summary() {
        let report = Report {
            filenames: vec![Path::new("/out").to_path_buf()],
            duration: Duration::from_millis(2),
        };
        assert_eq!(report.summary(), "Generated 1 file in 2ms");

        let report = Report {
            filenames: vec![],
            duration: Duration::from_millis(2),
        };
        assert_eq!(report.summary(), "Generated 0 files in 2ms");
    }
}
