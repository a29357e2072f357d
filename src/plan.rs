//! Path dispositions computed from the manifest and the resolved options.

use std::fmt;
use std::path::PathBuf;

use crate::error::Result;
use crate::manifest::{render_path, Manifest};
use crate::options::Options;
use crate::renderer::TemplateRenderer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Keep,
    Remove,
    Regenerate,
}

impl fmt::Display for Disposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Disposition::Keep => "keep",
            Disposition::Remove => "remove",
            Disposition::Regenerate => "regenerate",
        })
    }
}

/// A project-relative path, the flags governing it and what happens to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSpec {
    pub path: PathBuf,
    pub flags: Vec<String>,
    pub disposition: Disposition,
}

impl fmt::Display for PathSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<10} {}", self.disposition, self.path.display())?;
        if !self.flags.is_empty() {
            write!(f, " [{}]", self.flags.join(", "))?;
        }
        Ok(())
    }
}

/// Everything the pipeline intends to do, before touching the filesystem.
#[derive(Debug, Clone, Default)]
pub struct Plan {
    pub placeholders: Vec<PathSpec>,
    pub leaks: Vec<PathSpec>,
    pub artifacts: Vec<PathSpec>,
}

impl Plan {
    /// Computes the plan. Placeholder specs cover every rule (`keep` or
    /// `remove`); leak specs cover only entries of active rules; artifact
    /// specs cover the artifacts that would be regenerated.
    pub fn build(
        manifest: &Manifest,
        options: &Options,
        renderer: &dyn TemplateRenderer,
    ) -> Result<Self> {
        let placeholders = manifest
            .placeholders
            .iter()
            .map(|rule| {
                let disposition =
                    if rule.when.holds(options) { Disposition::Remove } else { Disposition::Keep };
                Ok(PathSpec {
                    path: render_path(&rule.path, options, renderer)?,
                    flags: rule.when.flags(),
                    disposition,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut leaks = Vec::new();
        let mut artifact_ids: Vec<(&str, Vec<String>)> = Vec::new();
        for rule in manifest.leaks.iter().filter(|rule| rule.when.holds(options)) {
            let parent = render_path(&rule.parent, options, renderer)?;
            for entry in &rule.entries {
                leaks.push(PathSpec {
                    path: parent.join(entry),
                    flags: rule.when.flags(),
                    disposition: Disposition::Remove,
                });
            }
            for id in &rule.regenerates {
                artifact_ids.push((id.as_str(), rule.when.flags()));
            }
        }
        for id in &manifest.regenerate {
            artifact_ids.push((id.as_str(), Vec::new()));
        }

        let mut artifacts: Vec<PathSpec> = Vec::new();
        for (id, flags) in artifact_ids {
            let Some(artifact) = manifest.artifacts.get(id) else {
                continue;
            };
            let path = render_path(&artifact.path, options, renderer)?;
            if artifacts.iter().any(|spec| spec.path == path) {
                continue;
            }
            let mut flags = flags;
            for fragment in &artifact.fragments {
                for flag in fragment.when.flags() {
                    if !flags.contains(&flag) {
                        flags.push(flag);
                    }
                }
            }
            artifacts.push(PathSpec { path, flags, disposition: Disposition::Regenerate });
        }

        Ok(Self { placeholders, leaks, artifacts })
    }

    /// All specs in pipeline order.
    pub fn specs(&self) -> impl Iterator<Item = &PathSpec> {
        self.placeholders.iter().chain(self.leaks.iter()).chain(self.artifacts.iter())
    }

    pub fn removals(&self) -> impl Iterator<Item = &PathSpec> {
        self.placeholders.iter().filter(|spec| spec.disposition == Disposition::Remove)
    }
}
