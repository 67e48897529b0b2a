// src/config/model.rs

use serde::Deserialize;

/// Top-level configuration as read from a TOML file:
///
/// ```toml
/// [compiler]
/// path = "quarkdown"
///
/// [export]
/// output_dir = "output"
/// ```
///
/// All sections are optional and have reasonable defaults; CLI flags
/// override whatever the file says.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ConfigFile {
    /// Compiler location from `[compiler]`.
    #[serde(default)]
    pub compiler: CompilerSection,

    /// Export defaults from `[export]`.
    #[serde(default)]
    pub export: ExportSection,
}

/// `[compiler]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct CompilerSection {
    /// Path or bare name of the Quarkdown executable. A bare name is
    /// resolved through `PATH` at spawn time.
    #[serde(default = "default_compiler_path")]
    pub path: String,
}

fn default_compiler_path() -> String {
    "quarkdown".to_string()
}

impl Default for CompilerSection {
    fn default() -> Self {
        Self {
            path: default_compiler_path(),
        }
    }
}

/// `[export]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ExportSection {
    /// Directory the compiler writes the produced PDF into.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

fn default_output_dir() -> String {
    "output".to_string()
}

impl Default for ExportSection {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}
