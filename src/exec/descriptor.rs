// src/exec/descriptor.rs

//! Command-line derivation for one export invocation.

use std::path::{Path, PathBuf};

use crate::export::ExportRequest;

/// Fully composed compiler invocation: executable, ordered arguments and the
/// working directory to run it in.
///
/// Holds no behaviour beyond rendering itself for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDescriptor {
    pub command: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl CommandDescriptor {
    /// Derive the compiler invocation for one export request.
    ///
    /// Deterministic and side-effect-free: the same request always yields the
    /// same descriptor, and nothing is checked on disk here. The compiler is
    /// run from the source file's parent directory so relative includes in
    /// the document resolve the way they do in the editor.
    pub fn build(request: &ExportRequest) -> Self {
        let cwd = request
            .source_file
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        let source_name = request
            .source_file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| request.source_file.display().to_string());

        CommandDescriptor {
            command: request.executable_path.display().to_string(),
            args: vec![
                "c".to_string(),
                source_name,
                "--pdf".to_string(),
                "-o".to_string(),
                request.output_dir.display().to_string(),
            ],
            cwd,
        }
    }

    /// Full command line for informational logging.
    pub fn display_command(&self) -> String {
        let mut parts = Vec::with_capacity(self.args.len() + 1);
        parts.push(self.command.clone());
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}
