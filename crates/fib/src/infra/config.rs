//! Configuration management utilities.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dirs_next::config_dir;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

static DEFAULT_CONFIG: Lazy<&'static str> =
    Lazy::new(|| include_str!("../../assets/default-config.toml"));
static DEFAULT_WORKSPACE_CONFIG_PATH: &str = ".fib/config.toml";

/// Layered configuration loaded from defaults, user, workspace, and env.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub bundle: Bundle,
    #[serde(default)]
    pub ignore: Ignore,
    #[serde(default)]
    pub response: Response,
}

/// Fallbacks for `bundle` flags not given on the command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Bundle {
    #[serde(default)]
    sort: Option<String>,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    note: Option<bool>,
    #[serde(default)]
    remove_empty_lines: Option<bool>,
}

impl Bundle {
    fn default_sort() -> &'static str {
        "alphabetic"
    }

    pub fn sort(&self) -> &str {
        self.sort.as_deref().unwrap_or(Self::default_sort())
    }

    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn note(&self) -> bool {
        self.note.unwrap_or(false)
    }

    pub fn remove_empty_lines(&self) -> bool {
        self.remove_empty_lines.unwrap_or(false)
    }
}

/// File name globs never bundled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Ignore {
    #[serde(default)]
    pub globs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    #[serde(default = "Response::default_program")]
    pub program: String,
}

impl Response {
    fn default_program() -> String {
        "fib".into()
    }
}

impl Default for Response {
    fn default() -> Self {
        Self {
            program: Self::default_program(),
        }
    }
}

/// Environment overrides for bundle defaults.
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    sort: Option<String>,
    author: Option<String>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        Self {
            sort: env::var("FIB_SORT").ok(),
            author: env::var("FIB_AUTHOR").ok(),
        }
    }

    #[cfg(test)]
    fn for_tests(sort: &str, author: &str) -> Self {
        Self {
            sort: Some(sort.to_owned()),
            author: Some(author.to_owned()),
        }
    }
}

impl Config {
    /// Load configuration from defaults, user/global config, workspace config, and env overrides.
    pub fn load() -> Result<Self> {
        let env = EnvOverrides::from_env();
        let global = global_config_path();
        let workspace = workspace_config_path()?;
        Self::load_with_layers(global, workspace, env)
    }

    fn load_with_layers(
        global: Option<PathBuf>,
        workspace: Option<PathBuf>,
        env_overrides: EnvOverrides,
    ) -> Result<Self> {
        let mut layers: Vec<Config> = Vec::new();

        layers.push(Self::from_str(&DEFAULT_CONFIG)?);

        if let Some(global_path) = global.filter(|path| path.exists()) {
            tracing::debug!(path = %global_path.display(), "loading global config");
            layers.push(Self::from_file(&global_path)?);
        }

        if let Some(workspace_path) = workspace.filter(|path| path.exists()) {
            tracing::debug!(path = %workspace_path.display(), "loading workspace config");
            layers.push(Self::from_file(&workspace_path)?);
        }

        let merged = layers.into_iter().reduce(Config::merge).unwrap_or_default();
        Ok(apply_env_overrides(merged, env_overrides))
    }

    fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_str(&data)
            .with_context(|| format!("invalid config file: {}", path.display()))
    }

    fn from_str(contents: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(contents).with_context(|| "failed to parse TOML config".to_string())?;
        Ok(config)
    }

    fn merge(self, other: Self) -> Self {
        Self {
            bundle: merge_bundle(self.bundle, other.bundle),
            ignore: merge_ignore(self.ignore, other.ignore),
            response: merge_response(self.response, other.response),
        }
    }
}

fn merge_bundle(mut base: Bundle, overlay: Bundle) -> Bundle {
    if overlay.sort.is_some() {
        base.sort = overlay.sort;
    }
    if overlay.author.is_some() {
        base.author = overlay.author;
    }
    if overlay.language.is_some() {
        base.language = overlay.language;
    }
    if overlay.note.is_some() {
        base.note = overlay.note;
    }
    if overlay.remove_empty_lines.is_some() {
        base.remove_empty_lines = overlay.remove_empty_lines;
    }
    base
}

fn merge_ignore(base: Ignore, overlay: Ignore) -> Ignore {
    let mut globs = base.globs;
    for glob in overlay.globs {
        if !globs.contains(&glob) {
            globs.push(glob);
        }
    }
    Ignore { globs }
}

fn merge_response(base: Response, overlay: Response) -> Response {
    if overlay.program != Response::default_program() {
        overlay
    } else {
        base
    }
}

fn global_config_path() -> Option<PathBuf> {
    config_dir().map(|base| base.join("fib/config.toml"))
}

fn workspace_config_path() -> Result<Option<PathBuf>> {
    let cwd = env::current_dir()?;
    let root = find_repo_root(&cwd).unwrap_or(cwd);
    Ok(Some(root.join(DEFAULT_WORKSPACE_CONFIG_PATH)))
}

fn find_repo_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(".git").exists())
        .map(Path::to_path_buf)
}

fn apply_env_overrides(mut config: Config, env: EnvOverrides) -> Config {
    if let Some(sort) = env.sort {
        config.bundle.sort = Some(sort);
    }
    if let Some(author) = env.author {
        config.bundle.author = Some(author);
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_uses_defaults_when_no_files() {
        let config = Config::load_with_layers(None, None, EnvOverrides::default())
            .expect("load default config");
        assert_eq!(config.bundle.sort(), "alphabetic");
        assert_eq!(config.bundle.author(), None);
        assert!(!config.bundle.note());
        assert!(config.ignore.globs.is_empty());
        assert_eq!(config.response.program, "fib");
    }

    #[test]
    fn unset_sort_falls_back_to_alphabetic() {
        let bundle = Bundle::default();
        assert_eq!(bundle.sort(), "alphabetic");

        let configured = Config::from_str("[bundle]\nsort = \"language\"\n").expect("valid toml");
        assert_eq!(configured.bundle.sort(), "language");
    }

    #[test]
    fn merge_global_and_workspace() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let global = temp.path().join("config.toml");
        fs::write(
            &global,
            r#"
[bundle]
sort = "language"
author = "Jane"
[ignore]
globs = ["*.lock"]
"#,
        )?;

        let workspace_dir = temp.path().join("repo");
        fs::create_dir_all(workspace_dir.join(".fib"))?;
        fs::write(
            workspace_dir.join(".fib/config.toml"),
            r#"
[bundle]
author = "Sam"
remove_empty_lines = true
[ignore]
globs = ["*.min.js"]
[response]
program = "fib-dev"
"#,
        )?;

        let config = Config::load_with_layers(
            Some(global),
            Some(workspace_dir.join(".fib/config.toml")),
            EnvOverrides::default(),
        )?;

        assert_eq!(config.bundle.sort(), "language");
        assert_eq!(config.bundle.author(), Some("Sam"));
        assert!(config.bundle.remove_empty_lines());
        assert_eq!(config.ignore.globs, vec!["*.lock", "*.min.js"]);
        assert_eq!(config.response.program, "fib-dev");
        Ok(())
    }

    #[test]
    fn env_overrides_take_precedence() -> Result<()> {
        let overrides = EnvOverrides::for_tests("none", "Env Author");
        let config = Config::load_with_layers(None, None, overrides)?;
        assert_eq!(config.bundle.sort(), "none");
        assert_eq!(config.bundle.author(), Some("Env Author"));
        Ok(())
    }

    #[test]
    fn invalid_config_returns_error() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let file = temp.path().join("broken.toml");
        fs::write(&file, "this is not toml")?;
        assert!(Config::from_file(&file).is_err());
        Ok(())
    }

    #[test]
    fn repo_root_is_nearest_git_ancestor() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let nested = temp.path().join("a/b");
        fs::create_dir_all(&nested)?;
        fs::create_dir_all(temp.path().join("a/.git"))?;
        assert_eq!(find_repo_root(&nested), Some(temp.path().join("a")));
        Ok(())
    }
}
