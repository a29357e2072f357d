//! Leak reconciliation.
//!
//! When a conditional directory name such as `{% if api_auth %}auth{% endif %}`
//! renders empty, its contents are written into the parent directory instead
//! of being skipped. Each leak rule names the entries that belong to the
//! collapsed directory and the parent artifacts the leak may have overwritten.

use log::{debug, info};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::filesystem::remove_path;
use crate::manifest::{render_path, LeakRule, Manifest};
use crate::options::Options;
use crate::regenerate::Regenerator;
use crate::renderer::TemplateRenderer;

/// Outcome of one reconciliation pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Reconciled {
    pub removed: Vec<PathBuf>,
    pub regenerated: Vec<PathBuf>,
}

pub struct Reconciler<'a> {
    manifest: &'a Manifest,
    options: &'a Options,
    renderer: &'a dyn TemplateRenderer,
    regenerator: &'a Regenerator<'a>,
}

impl<'a> Reconciler<'a> {
    pub fn new(
        manifest: &'a Manifest,
        options: &'a Options,
        renderer: &'a dyn TemplateRenderer,
        regenerator: &'a Regenerator<'a>,
    ) -> Self {
        Self { manifest, options, renderer, regenerator }
    }

    /// Applies every active leak rule in manifest order.
    pub fn reconcile(&self, root: &Path) -> Result<Reconciled> {
        let mut outcome = Reconciled::default();
        for rule in self.manifest.leaks.iter().filter(|r| r.when.holds(self.options)) {
            self.apply(root, rule, &mut outcome)?;
        }
        Ok(outcome)
    }

    /// Deletes the rule's leaked entries, then rebuilds the artifacts the leak
    /// overwrote. A rule whose parent does not exist is a no-op.
    fn apply(&self, root: &Path, rule: &LeakRule, outcome: &mut Reconciled) -> Result<()> {
        let parent = root.join(render_path(&rule.parent, self.options, self.renderer)?);
        if !parent.is_dir() {
            debug!("Skipping leak rule '{}': '{}' does not exist", rule.name, parent.display());
            return Ok(());
        }

        info!("Reconciling '{}' leaks in '{}'", rule.name, parent.display());
        for entry in &rule.entries {
            let leaked = parent.join(entry);
            if remove_path(&leaked)? {
                outcome.removed.push(leaked);
            }
        }

        for id in &rule.regenerates {
            let path = self.regenerator.regenerate(root, id)?;
            if !outcome.regenerated.contains(&path) {
                outcome.regenerated.push(path);
            }
        }
        Ok(())
    }
}
