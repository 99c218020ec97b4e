use crate::error::{Result, SlipwayError};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// DeployConfig
// ---------------------------------------------------------------------------

pub const DEFAULT_RETAIN_RELEASES: usize = 10;

/// One run's configuration, read from `slipway.yaml` at the project root.
/// Immutable once loaded; derived paths live in [`Layout`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployConfig {
    /// Project name. Doubles as the directory under `projects_dir` on the
    /// host and as the subdirectory containing `manage.py` in a checkout.
    pub project: String,

    /// Clone URL of the application repository.
    #[serde(default)]
    pub repo: Option<String>,

    /// Production host for remote tasks.
    #[serde(default)]
    pub host: Option<String>,

    #[serde(default = "default_user")]
    pub user: String,

    /// Where all projects live on the production host, under the deploy
    /// user's home directory.
    #[serde(default = "default_projects_dir")]
    pub projects_dir: String,

    /// Virtualenv directory name inside a release.
    #[serde(default = "default_venv_dir")]
    pub venv_dir: String,

    /// Pip requirements file, relative to the release root.
    #[serde(default = "default_requirements")]
    pub requirements: String,

    /// Settings module for management commands on the production host.
    #[serde(default = "default_production_settings")]
    pub production_settings: String,

    /// Fixture to load after migrations, relative to the manage.py
    /// directory. Absent means no fixture step.
    #[serde(default = "default_fixture")]
    pub fixture: Option<String>,

    /// Patch applied to the imaging library's setup.py before install,
    /// relative to the release root. Absent skips the whole dance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pil_patch: Option<String>,

    /// Where database dumps end up on the production host.
    #[serde(default = "default_backup_dir")]
    pub database_backup_dir: String,

    /// How many past releases to keep on disk.
    #[serde(default = "default_retain_releases")]
    pub retain_releases: usize,
}

fn default_user() -> String {
    "deploy".to_string()
}

fn default_projects_dir() -> String {
    "projects".to_string()
}

fn default_venv_dir() -> String {
    "env".to_string()
}

fn default_requirements() -> String {
    "requirements.txt".to_string()
}

fn default_production_settings() -> String {
    "settings_production".to_string()
}

fn default_fixture() -> Option<String> {
    Some("fixtures/initial_data.json".to_string())
}

fn default_backup_dir() -> String {
    "/tmp/db_backups".to_string()
}

fn default_retain_releases() -> usize {
    DEFAULT_RETAIN_RELEASES
}

impl DeployConfig {
    pub fn new(project: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            repo: None,
            host: None,
            user: default_user(),
            projects_dir: default_projects_dir(),
            venv_dir: default_venv_dir(),
            requirements: default_requirements(),
            production_settings: default_production_settings(),
            fixture: default_fixture(),
            pil_patch: None,
            database_backup_dir: default_backup_dir(),
            retain_releases: default_retain_releases(),
        }
    }

    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Err(SlipwayError::ConfigNotFound(root.to_path_buf()));
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: DeployConfig = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    pub fn host(&self) -> Result<&str> {
        match self.host.as_deref() {
            Some(h) if !h.is_empty() => Ok(h),
            _ => Err(SlipwayError::HostMissing),
        }
    }

    pub fn repo(&self) -> Result<&str> {
        match self.repo.as_deref() {
            Some(r) if !r.is_empty() => Ok(r),
            _ => Err(SlipwayError::RepoMissing),
        }
    }

    /// Directory on the production host holding the release directories and
    /// the `live` link: `/home/<user>/<projects_dir>/<project>`.
    pub fn deployment_dir(&self) -> PathBuf {
        PathBuf::from("/home")
            .join(&self.user)
            .join(&self.projects_dir)
            .join(&self.project)
    }

    /// Derived paths for one checkout rooted at `root`.
    pub fn layout(&self, root: impl Into<PathBuf>) -> Layout {
        let root = root.into();
        Layout {
            project_dir: root.join(&self.project),
            venv_dir: root.join(&self.venv_dir),
            requirements: root.join(&self.requirements),
            root,
        }
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.project.trim().is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "project name is empty".to_string(),
            });
        }

        if self.host().is_err() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "no 'host' set: remote tasks (deploy, in-place-deploy, backup-db) \
                          will fail"
                    .to_string(),
            });
        }

        if self.repo().is_err() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "no 'repo' set: deploy will fail".to_string(),
            });
        }

        if self.retain_releases == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "retain_releases is 0: pruning will delete every release except \
                          the live one"
                    .to_string(),
            });
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// Paths derived from one checkout root. Computed once per run instead of
/// accumulated while steps execute.
#[derive(Debug, Clone)]
pub struct Layout {
    pub root: PathBuf,
    /// Directory containing `manage.py`.
    pub project_dir: PathBuf,
    pub venv_dir: PathBuf,
    pub requirements: PathBuf,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn minimal_config_gets_defaults() {
        let cfg: DeployConfig = serde_yaml::from_str("project: healthcms\n").unwrap();
        assert_eq!(cfg.user, "deploy");
        assert_eq!(cfg.projects_dir, "projects");
        assert_eq!(cfg.venv_dir, "env");
        assert_eq!(cfg.requirements, "requirements.txt");
        assert_eq!(cfg.production_settings, "settings_production");
        assert_eq!(cfg.fixture.as_deref(), Some("fixtures/initial_data.json"));
        assert!(cfg.pil_patch.is_none());
        assert_eq!(cfg.retain_releases, 10);
    }

    #[test]
    fn roundtrip() {
        let mut cfg = DeployConfig::new("healthcms");
        cfg.repo = Some("git@example.com:healthcms.git".to_string());
        cfg.host = Some("web1.example.com".to_string());
        let yaml = serde_yaml::to_string(&cfg).unwrap();
        let parsed: DeployConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.project, "healthcms");
        assert_eq!(parsed.host.as_deref(), Some("web1.example.com"));
    }

    #[test]
    fn fixture_can_be_disabled() {
        let cfg: DeployConfig =
            serde_yaml::from_str("project: healthcms\nfixture: null\n").unwrap();
        assert!(cfg.fixture.is_none());
    }

    #[test]
    fn deployment_dir_layout() {
        let cfg = DeployConfig::new("healthcms");
        assert_eq!(
            cfg.deployment_dir(),
            PathBuf::from("/home/deploy/projects/healthcms")
        );
    }

    #[test]
    fn layout_derives_paths_from_root() {
        let cfg = DeployConfig::new("healthcms");
        let layout = cfg.layout("/home/deploy/projects/healthcms/20230101_000000");
        assert_eq!(
            layout.project_dir,
            PathBuf::from("/home/deploy/projects/healthcms/20230101_000000/healthcms")
        );
        assert_eq!(
            layout.venv_dir,
            PathBuf::from("/home/deploy/projects/healthcms/20230101_000000/env")
        );
        assert_eq!(
            layout.requirements,
            PathBuf::from("/home/deploy/projects/healthcms/20230101_000000/requirements.txt")
        );
    }

    #[test]
    fn load_missing_config_fails() {
        let dir = TempDir::new().unwrap();
        let err = DeployConfig::load(dir.path()).unwrap_err();
        assert!(matches!(err, SlipwayError::ConfigNotFound(_)));
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let cfg = DeployConfig::new("healthcms");
        cfg.save(dir.path()).unwrap();
        let loaded = DeployConfig::load(dir.path()).unwrap();
        assert_eq!(loaded.project, "healthcms");
    }

    #[test]
    fn host_and_repo_reject_empty_strings() {
        let mut cfg = DeployConfig::new("healthcms");
        cfg.host = Some(String::new());
        cfg.repo = Some(String::new());
        assert!(matches!(cfg.host().unwrap_err(), SlipwayError::HostMissing));
        assert!(matches!(cfg.repo().unwrap_err(), SlipwayError::RepoMissing));
    }

    #[test]
    fn validate_fresh_config_warns_about_host_and_repo() {
        let cfg = DeployConfig::new("healthcms");
        let warnings = cfg.validate();
        assert!(warnings.iter().any(|w| w.message.contains("'host'")));
        assert!(warnings.iter().any(|w| w.message.contains("'repo'")));
        assert!(warnings.iter().all(|w| w.level == WarnLevel::Warning));
    }

    #[test]
    fn validate_complete_config_is_clean() {
        let mut cfg = DeployConfig::new("healthcms");
        cfg.repo = Some("git@example.com:healthcms.git".to_string());
        cfg.host = Some("web1.example.com".to_string());
        assert!(cfg.validate().is_empty());
    }

    #[test]
    fn validate_empty_project_is_an_error() {
        let cfg = DeployConfig::new("");
        let warnings = cfg.validate();
        assert!(warnings
            .iter()
            .any(|w| w.level == WarnLevel::Error && w.message.contains("project")));
    }

    #[test]
    fn validate_zero_retention_warns() {
        let mut cfg = DeployConfig::new("healthcms");
        cfg.retain_releases = 0;
        let warnings = cfg.validate();
        assert!(warnings
            .iter()
            .any(|w| w.message.contains("retain_releases")));
    }
}
