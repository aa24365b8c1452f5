//! Type-safe arguments for downloading and unpacking the builder.
//!
//! - `CurlDownloadArgs` for `curl`
//! - `UnzipArgs` for `unzip`

use std::path::PathBuf;

use crate::tool_traits::ToolArgs;

/// Arguments for `curl` fetching a single URL to a file.
///
/// # Field to Flag Mapping
///
/// | Rust Field | CLI Flag   | Notes |
/// |------------|------------|-------|
/// | `url`      | positional | Remote archive URL |
/// | `output`   | `--output` | Destination file |
///
/// `--fail` turns HTTP errors into a non-zero exit, and `--location`
/// follows the redirect GitHub archive URLs answer with.
#[derive(Debug, Clone)]
pub struct CurlDownloadArgs {
    pub url: String,
    pub output: PathBuf,
}

impl ToolArgs for CurlDownloadArgs {
    fn program(&self) -> String {
        super::CURL.to_string()
    }

    fn to_cli_args(&self) -> Vec<String> {
        vec![
            "--fail".to_string(),
            "--location".to_string(),
            "--silent".to_string(),
            "--show-error".to_string(),
            "--output".to_string(),
            self.output.display().to_string(),
            self.url.clone(),
        ]
    }
}

/// Arguments for `unzip` extracting an archive into a directory.
///
/// | Rust Field    | CLI Flag   | Notes |
/// |---------------|------------|-------|
/// | `archive`     | positional | Zip file |
/// | `destination` | `-d`       | Extraction root |
#[derive(Debug, Clone)]
pub struct UnzipArgs {
    pub archive: PathBuf,
    pub destination: PathBuf,
}

impl ToolArgs for UnzipArgs {
    fn program(&self) -> String {
        super::UNZIP.to_string()
    }

    fn to_cli_args(&self) -> Vec<String> {
        vec![
            "-q".to_string(),
            "-o".to_string(),
            self.archive.display().to_string(),
            "-d".to_string(),
            self.destination.display().to_string(),
        ]
    }

    /// unzip exits 1 when it finished with warnings only.
    fn success_codes(&self) -> &'static [i32] {
        &[0, 1]
    }
}
