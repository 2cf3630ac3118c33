use miette::{IntoDiagnostic, Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for a usage search.
///
/// Everything here has a sensible default; a config file only needs the
/// keys it changes. CLI flags override file values in `main`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// File extensions considered candidates.
    pub extensions: Vec<String>,

    /// Glob-ish patterns excluded from scanning, on top of ignore files.
    pub exclude: Vec<String>,

    /// Default for `--strict-import`.
    pub strict_import: bool,

    /// Default for `--same-package-ok`.
    pub same_package_ok: bool,

    /// Default engine: "auto", "pattern", or "structural".
    pub engine: String,

    /// Follow symbolic links during discovery.
    pub follow_symlinks: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            extensions: vec!["kt".to_string(), "kts".to_string(), "java".to_string()],
            exclude: vec![
                "**/build/**".to_string(),
                "**/out/**".to_string(),
                "**/dist/**".to_string(),
                "**/target/**".to_string(),
                "**/.gradle/**".to_string(),
                "**/.idea/**".to_string(),
                "**/node_modules/**".to_string(),
            ],
            strict_import: false,
            same_package_ok: false,
            engine: "auto".to_string(),
            follow_symlinks: false,
        }
    }
}

impl Config {
    /// Load configuration from a YAML or TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        match extension {
            "yml" | "yaml" => serde_yaml::from_str(&contents)
                .into_diagnostic()
                .wrap_err("failed to parse YAML config"),
            "toml" => toml::from_str(&contents)
                .into_diagnostic()
                .wrap_err("failed to parse TOML config"),
            _ => {
                if let Ok(config) = serde_yaml::from_str(&contents) {
                    Ok(config)
                } else {
                    toml::from_str(&contents)
                        .into_diagnostic()
                        .wrap_err("failed to parse config file")
                }
            }
        }
    }

    /// Probe the default config file locations under `root`.
    pub fn from_default_locations(root: &Path) -> Result<Self> {
        let default_names = [
            ".findusages.yml",
            ".findusages.yaml",
            ".findusages.toml",
            "findusages.toml",
        ];

        for name in &default_names {
            let path = root.join(name);
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Whether a path matches one of the exclude patterns.
    pub fn should_exclude(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy().replace('\\', "/");
        self.exclude
            .iter()
            .any(|pattern| glob_match(pattern, &path_str))
    }
}

/// Minimal glob matching for the patterns the config uses: `**/dir/**`
/// directory excludes, plus bare `*suffix` / `prefix*` forms.
fn glob_match(pattern: &str, text: &str) -> bool {
    if let Some(dir) = pattern
        .strip_prefix("**/")
        .and_then(|p| p.strip_suffix("/**"))
    {
        // Match the segment anywhere in the path, as a whole directory name.
        return text
            .split('/')
            .rev()
            .skip(1) // the file name itself is not a directory
            .any(|segment| segment == dir);
    }

    if let Some(suffix) = pattern.strip_prefix('*') {
        return text.ends_with(suffix);
    }
    if let Some(prefix) = pattern.strip_suffix('*') {
        return text.starts_with(prefix);
    }

    text == pattern
}
