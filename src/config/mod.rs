//! Configuration management for `llmstxt.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section.rs     # [[sections]] and page entries
//! ├── types/         # ConfigError, diagnostics, field paths
//! ├── util.rs        # config discovery, URL parsing
//! └── mod.rs         # LlmsConfig (this file)
//! ```
//!
//! # Keys
//!
//! | Key                    | Default        | Purpose                               |
//! |------------------------|----------------|---------------------------------------|
//! | `site_url`             | (required)     | Published URL of the site root        |
//! | `site_name`            | host of URL    | `# <name>` heading                    |
//! | `site_description`     | none           | `> <description>` summary line        |
//! | `site_dir`             | `site`         | Built HTML site to read               |
//! | `autoclean`            | `true`         | Strip site chrome before conversion   |
//! | `preprocess`           | none           | External hook program                 |
//! | `markdown_description` | none           | Free text after the summary           |
//! | `output`               | `llms.txt`     | Index file, relative to `site_dir`    |
//! | `full_output`          | none           | Full-text file, relative to `site_dir`|
//! | `[[sections]]`         | none           | Ordered named page groups             |

pub mod section;
pub mod types;
mod util;

pub use section::{PageEntry, ResolvedSection, SectionConfig};
pub use types::{ConfigDiagnostic, ConfigDiagnostics, ConfigError, FieldPath};
pub use util::{find_config_file, find_config_from, parse_site_url};

use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use url::Url;

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing `llmstxt.toml`
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LlmsConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    pub site_name: Option<String>,
    pub site_url: Option<String>,
    pub site_description: Option<String>,

    #[serde(default = "default_site_dir")]
    pub site_dir: PathBuf,

    #[serde(default = "default_true")]
    pub autoclean: bool,

    pub preprocess: Option<PathBuf>,
    pub markdown_description: Option<String>,

    #[serde(default = "default_output")]
    pub output: PathBuf,

    pub full_output: Option<PathBuf>,

    #[serde(default)]
    pub sections: Vec<SectionConfig>,
}

fn default_site_dir() -> PathBuf {
    PathBuf::from("site")
}

fn default_true() -> bool {
    true
}

fn default_output() -> PathBuf {
    PathBuf::from("llms.txt")
}

impl Default for LlmsConfig {
    fn default() -> Self {
        Self {
            config_path: PathBuf::new(),
            root: PathBuf::new(),
            site_name: None,
            site_url: None,
            site_description: None,
            site_dir: default_site_dir(),
            autoclean: true,
            preprocess: None,
            markdown_description: None,
            output: default_output(),
            full_output: None,
            sections: Vec::new(),
        }
    }
}

impl LlmsConfig {
    /// Load configuration from a file.
    ///
    /// The project root is the config file's parent directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let mut config = Self::from_str(&content)?;
        config.config_path = path.to_path_buf();
        config.root = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Apply command-line overrides.
    pub fn apply_overrides(&mut self, site_dir: Option<&Path>, site_url: Option<&str>) {
        if let Some(dir) = site_dir {
            self.site_dir = dir.to_path_buf();
        }
        if let Some(url) = site_url {
            self.site_url = Some(url.to_string());
        }
    }

    /// Validate the whole configuration, reporting every problem at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();

        match self.site_url.as_deref() {
            None => diag.error_with_hint(
                FieldPath::new("site_url"),
                "site_url must be set",
                "set it to the published URL of the site root, or pass --site-url",
            ),
            Some(url) if parse_site_url(url).is_none() => diag.error(
                FieldPath::new("site_url"),
                format!("`{url}` is not an absolute URL"),
            ),
            Some(_) => {}
        }

        if self.output.as_os_str().is_empty() {
            diag.error(FieldPath::new("output"), "output file name must not be empty");
        }

        if let Some(program) = self.preprocess_path()
            && !program.is_file()
        {
            diag.error(
                FieldPath::new("preprocess"),
                format!("preprocess program `{}` not found", program.display()),
            );
        }

        let mut seen = Vec::with_capacity(self.sections.len());
        for (index, section) in self.sections.iter().enumerate() {
            section.validate(index, &mut diag);
            if seen.contains(&section.name.as_str()) {
                diag.error(
                    FieldPath::section(index, "name"),
                    format!("duplicate section `{}`", section.name),
                );
            }
            seen.push(section.name.as_str());
        }

        diag.into_result()
    }

    // ========================================================================
    // resolved values
    // ========================================================================

    /// Join a path with the root directory.
    pub fn root_join(&self, path: impl AsRef<Path>) -> PathBuf {
        self.root.join(path)
    }

    /// Parsed site URL, ending in `/`.
    pub fn site_url(&self) -> Result<Url, ConfigError> {
        let raw = self
            .site_url
            .as_deref()
            .ok_or_else(|| ConfigError::Validation("site_url must be set".into()))?;
        parse_site_url(raw)
            .ok_or_else(|| ConfigError::Validation(format!("`{raw}` is not an absolute URL")))
    }

    /// Site name, falling back to the host of the site URL.
    pub fn site_name(&self) -> String {
        if let Some(name) = self.site_name.as_deref().filter(|n| !n.trim().is_empty()) {
            return name.to_string();
        }
        self.site_url()
            .ok()
            .and_then(|url| url.host_str().map(str::to_string))
            .unwrap_or_default()
    }

    /// Built site directory.
    pub fn site_dir(&self) -> PathBuf {
        self.root_join(&self.site_dir)
    }

    /// Index file path.
    pub fn output_path(&self) -> PathBuf {
        self.site_dir().join(&self.output)
    }

    /// Full-text file path, when configured.
    pub fn full_output_path(&self) -> Option<PathBuf> {
        self.full_output.as_ref().map(|p| self.site_dir().join(p))
    }

    /// Pre-processing hook program, when configured.
    pub fn preprocess_path(&self) -> Option<PathBuf> {
        self.preprocess.as_ref().map(|p| self.root_join(p))
    }

    /// Expand every section against the known source paths, in declaration order.
    pub fn resolve_sections<S: AsRef<str>>(
        &self,
        src_uris: &[S],
    ) -> Result<Vec<ResolvedSection>, ConfigError> {
        self.sections.iter().map(|s| s.resolve(src_uris)).collect()
    }
}
