#![allow(dead_code)]

use std::path::PathBuf;

use qdexport::export::ExportRequest;

/// Builder for `ExportRequest` to simplify test setup.
pub struct ExportRequestBuilder {
    request: ExportRequest,
}

impl ExportRequestBuilder {
    pub fn new() -> Self {
        Self {
            request: ExportRequest {
                executable_path: PathBuf::from("quarkdown"),
                source_file: PathBuf::from("docs/main.qd"),
                output_dir: PathBuf::from("out"),
            },
        }
    }

    pub fn compiler(mut self, path: &str) -> Self {
        self.request.executable_path = PathBuf::from(path);
        self
    }

    pub fn source(mut self, path: &str) -> Self {
        self.request.source_file = PathBuf::from(path);
        self
    }

    pub fn output_dir(mut self, path: &str) -> Self {
        self.request.output_dir = PathBuf::from(path);
        self
    }

    pub fn build(self) -> ExportRequest {
        self.request
    }
}

impl Default for ExportRequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}
