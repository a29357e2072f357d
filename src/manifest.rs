//! Declarative description of what a generated tree may contain.
//!
//! A manifest lists, per feature flag, the sentinel and owned paths to prune,
//! the leak rules to reconcile, the artifacts to regenerate and the scripts to
//! mark executable. The built-in manifest describes the bundled project
//! template; a different one can be loaded from JSON or YAML.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

use crate::audit::sentinel_globs;
use crate::constants::{MANIFEST_VERSION, SENTINEL_PATTERN};
use crate::error::{Error, Result};
use crate::options::Options;
use crate::renderer::TemplateRenderer;

/// Boolean expression over feature flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    #[default]
    Always,
    Enabled(String),
    Disabled(String),
    All(Vec<Condition>),
    Any(Vec<Condition>),
}

impl Condition {
    pub fn enabled(flag: &str) -> Self {
        Condition::Enabled(flag.to_string())
    }

    pub fn disabled(flag: &str) -> Self {
        Condition::Disabled(flag.to_string())
    }

    pub fn holds(&self, options: &Options) -> bool {
        match self {
            Condition::Always => true,
            Condition::Enabled(flag) => options.is_enabled(flag),
            Condition::Disabled(flag) => !options.is_enabled(flag),
            Condition::All(conds) => conds.iter().all(|c| c.holds(options)),
            Condition::Any(conds) => conds.iter().any(|c| c.holds(options)),
        }
    }

    /// Flags referenced by this condition, in first-seen order.
    pub fn flags(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_flags(&mut out);
        out
    }

    fn collect_flags(&self, out: &mut Vec<String>) {
        match self {
            Condition::Always => {}
            Condition::Enabled(flag) | Condition::Disabled(flag) => {
                if !out.contains(flag) {
                    out.push(flag.clone());
                }
            }
            Condition::All(conds) | Condition::Any(conds) => {
                for cond in conds {
                    cond.collect_flags(out);
                }
            }
        }
    }
}

/// A path removed by the pruner when its condition holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathRule {
    pub when: Condition,
    pub path: String,
}

/// Files that leak into `parent` when a conditional directory name collapses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeakRule {
    pub name: String,
    pub when: Condition,
    pub parent: String,
    #[serde(default)]
    pub entries: Vec<String>,
    /// Artifacts the leak overwrites and that must be rebuilt afterwards.
    #[serde(default)]
    pub regenerates: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    #[serde(default)]
    pub when: Condition,
    pub template: String,
}

/// A file synthesized from scratch out of flag-gated fragments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub path: String,
    pub fragments: Vec<Fragment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub version: u32,
    /// Child flag to the parent flag it is meaningless without.
    #[serde(default)]
    pub dependencies: IndexMap<String, String>,
    #[serde(default)]
    pub placeholders: Vec<PathRule>,
    #[serde(default)]
    pub leaks: Vec<LeakRule>,
    #[serde(default)]
    pub artifacts: IndexMap<String, Artifact>,
    /// Artifacts rebuilt unconditionally after leak reconciliation.
    #[serde(default)]
    pub regenerate: Vec<String>,
    #[serde(default)]
    pub executables: Vec<String>,
    #[serde(default = "default_sentinel_patterns")]
    pub sentinel_patterns: Vec<String>,
}

fn default_sentinel_patterns() -> Vec<String> {
    vec![SENTINEL_PATTERN.to_string()]
}

impl Manifest {
    /// Checks the manifest before anything on disk is touched.
    ///
    /// # Errors
    /// * `Error::ConfigError` for an unknown version, artifact or bad pattern
    /// * `Error::ValidationError` for an entry or executable escaping the project
    pub fn validate(&self) -> Result<()> {
        if self.version != MANIFEST_VERSION {
            return Err(Error::ConfigError(format!(
                "unsupported manifest version {} (expected {})",
                self.version, MANIFEST_VERSION
            )));
        }

        let referenced = self
            .leaks
            .iter()
            .flat_map(|rule| rule.regenerates.iter())
            .chain(self.regenerate.iter());
        for id in referenced {
            if !self.artifacts.contains_key(id) {
                return Err(Error::ConfigError(format!("unknown artifact '{id}'")));
            }
        }

        for rule in &self.leaks {
            for entry in &rule.entries {
                if !is_contained(Path::new(entry)) {
                    return Err(Error::ValidationError(format!(
                        "leak rule '{}' has unsafe entry '{entry}'",
                        rule.name
                    )));
                }
            }
        }
        for script in &self.executables {
            if !is_contained(Path::new(script)) {
                return Err(Error::ValidationError(format!("unsafe executable path '{script}'")));
            }
        }

        sentinel_globs(&self.sentinel_patterns)?;
        Ok(())
    }

    /// The manifest of the bundled project template.
    pub fn builtin() -> Self {
        let api = || Condition::disabled("api");
        let nested = |child: &str| {
            Condition::All(vec![Condition::enabled("api"), Condition::disabled(child)])
        };
        let rule = |when: Condition, path: &str| PathRule { when, path: path.to_string() };
        let names = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        let placeholders = vec![
            rule(api(), "src/_api_disabled"),
            rule(Condition::disabled("cli"), "src/_cli_disabled"),
            rule(Condition::disabled("web"), "src/_web_disabled"),
            rule(api(), "tests/unit/_test_api_disabled"),
            rule(Condition::disabled("cli"), "tests/unit/_test_cli_disabled"),
            rule(Condition::disabled("web"), "tests/unit/_test_web_disabled"),
            rule(Condition::disabled("api_lambda"), "envs/_docker_compose_disabled"),
            rule(Condition::disabled("api_lambda"), "docker/_lambda_api_disabled"),
            rule(Condition::disabled("api_lambda"), "tests/_common_disabled"),
            rule(Condition::disabled("api_lambda"), "tests/_integration_disabled"),
            rule(Condition::disabled("api_lambda"), "tests/_smoke_disabled"),
            rule(Condition::disabled("github_actions"), "_.github_disabled"),
            rule(nested("api_auth"), "src/{{ package_name }}_api/_auth_disabled"),
            rule(nested("api_versioning"), "src/{{ package_name }}_api/routers/_v1_disabled"),
            rule(Condition::disabled("docker"), "docker"),
            rule(Condition::disabled("docker"), "docker-compose.yaml"),
            rule(Condition::disabled("docker"), ".dockerignore"),
            rule(Condition::disabled("web"), "docker/web"),
            rule(
                Condition::Any(vec![api(), Condition::enabled("api_lambda")]),
                "docker/api",
            ),
            rule(Condition::disabled("api_lambda"), "docker/lambda-api"),
        ];

        let leak = |name: &str, when: Condition, parent: &str, entries: &[&str], regenerates: &[&str]| {
            LeakRule {
                name: name.to_string(),
                when,
                parent: parent.to_string(),
                entries: names(entries),
                regenerates: names(regenerates),
            }
        };

        let leaks = vec![
            leak(
                "api",
                api(),
                "src",
                &[
                    "__init__.py",
                    "py.typed",
                    "config.py",
                    "exceptions.py",
                    "main.py",
                    "pagination.py",
                    "lambda_handler.py",
                    "auth.py",
                    "schemas.py",
                    "jwt.py",
                    "dependencies.py",
                    "auth",
                    "dependencies",
                    "middleware",
                    "routers",
                    "schemas",
                    "services",
                    "v1",
                ],
                &[],
            ),
            leak(
                "api-tests",
                api(),
                "tests/unit",
                &[
                    "test_config.py",
                    "test_health.py",
                    "test_auth.py",
                    "test_lambda_handler.py",
                    "conftest.py",
                    "auth",
                    "routers",
                    "v1",
                ],
                &[],
            ),
            leak("cli", Condition::disabled("cli"), "src", &["__main__.py"], &[]),
            leak("cli-tests", Condition::disabled("cli"), "tests/unit", &["test_cli.py"], &[]),
            leak(
                "web",
                Condition::disabled("web"),
                "src",
                &["__init__.py", "py.typed", "asgi.py", "settings.py", "urls.py", "wsgi.py", "templates"],
                &[],
            ),
            leak("web-tests", Condition::disabled("web"), "tests/unit", &["test_django.py"], &[]),
            leak("sentry", Condition::disabled("sentry"), "src", &["sentry.py"], &[]),
            leak(
                "auth",
                nested("api_auth"),
                "src/{{ package_name }}_api",
                &["jwt.py", "schemas.py"],
                &["api_init"],
            ),
            leak(
                "auth-router",
                nested("api_auth"),
                "src/{{ package_name }}_api/routers",
                &["auth.py"],
                &[],
            ),
            leak(
                "auth-tests",
                nested("api_auth"),
                "tests/unit/test_{{ package_name }}_api",
                &["test_auth.py"],
                &[],
            ),
            leak(
                "versioning",
                nested("api_versioning"),
                "src/{{ package_name }}_api/routers",
                &["example.py"],
                &["routers_init"],
            ),
        ];

        let fragment = |when: Condition, template: &str| Fragment { when, template: template.to_string() };

        let mut artifacts = IndexMap::new();
        artifacts.insert(
            "root_conftest".to_string(),
            Artifact {
                path: "tests/conftest.py".to_string(),
                fragments: vec![
                    fragment(Condition::Always, include_str!("artifacts/conftest_base.py.j2")),
                    fragment(Condition::enabled("web"), include_str!("artifacts/conftest_django.py.j2")),
                    fragment(Condition::enabled("sentry"), include_str!("artifacts/conftest_sentry.py.j2")),
                    fragment(Condition::enabled("api_auth"), include_str!("artifacts/conftest_auth.py.j2")),
                ],
            },
        );
        artifacts.insert(
            "api_init".to_string(),
            Artifact {
                path: "src/{{ package_name }}_api/__init__.py".to_string(),
                fragments: vec![fragment(Condition::Always, include_str!("artifacts/api_init.py.j2"))],
            },
        );
        artifacts.insert(
            "routers_init".to_string(),
            Artifact {
                path: "src/{{ package_name }}_api/routers/__init__.py".to_string(),
                fragments: vec![fragment(Condition::Always, include_str!("artifacts/routers_init.py.j2"))],
            },
        );

        let mut dependencies = IndexMap::new();
        for child in ["api_auth", "api_lambda", "api_versioning"] {
            dependencies.insert(child.to_string(), "api".to_string());
        }

        Manifest {
            version: MANIFEST_VERSION,
            dependencies,
            placeholders,
            leaks,
            artifacts,
            regenerate: names(&["root_conftest"]),
            executables: names(&["test"]),
            sentinel_patterns: default_sentinel_patterns(),
        }
    }
}

/// Renders a manifest path template and checks it stays inside the project.
///
/// # Errors
/// * `Error::ValidationError` if the rendered path is empty, absolute or
///   climbs out of the project with `..`
pub fn render_path(
    template: &str,
    options: &Options,
    renderer: &dyn TemplateRenderer,
) -> Result<PathBuf> {
    let rendered = renderer.render(template, &options.to_context())?;
    let path = Path::new(rendered.trim());

    if !is_contained(path) {
        return Err(Error::ValidationError(format!(
            "path '{template}' rendered to unsafe path '{}'",
            path.display()
        )));
    }
    Ok(path.to_path_buf())
}

/// Non-empty and made only of plain names: no root, prefix, `.` or `..`.
fn is_contained(path: &Path) -> bool {
    path.components().next().is_some()
        && path.components().all(|c| matches!(c, Component::Normal(_)))
}
