//! Artifact regeneration.
//!
//! Some files cannot be fixed by deleting leaks: a leaked sibling overwrote
//! them, or their content depends on a combination of flags. These are
//! rebuilt from scratch out of flag-gated fragments. Rendering depends only
//! on the options; the file being replaced is never read.

use log::debug;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::filesystem::write_file;
use crate::manifest::{render_path, Artifact, Manifest};
use crate::options::Options;
use crate::renderer::TemplateRenderer;

pub struct Regenerator<'a> {
    manifest: &'a Manifest,
    options: &'a Options,
    renderer: &'a dyn TemplateRenderer,
}

impl<'a> Regenerator<'a> {
    pub fn new(
        manifest: &'a Manifest,
        options: &'a Options,
        renderer: &'a dyn TemplateRenderer,
    ) -> Self {
        Self { manifest, options, renderer }
    }

    fn artifact(&self, id: &str) -> Result<&'a Artifact> {
        self.manifest
            .artifacts
            .get(id)
            .ok_or_else(|| Error::ConfigError(format!("unknown artifact '{id}'")))
    }

    /// Renders the final content of an artifact: every fragment whose
    /// condition holds, concatenated in manifest order.
    pub fn render(&self, id: &str) -> Result<String> {
        let artifact = self.artifact(id)?;
        let context = self.options.to_context();

        let mut content = String::new();
        for fragment in artifact.fragments.iter().filter(|f| f.when.holds(self.options)) {
            content.push_str(&self.renderer.render(&fragment.template, &context)?);
        }
        Ok(content)
    }

    /// Project-relative path the artifact is written to.
    pub fn path(&self, id: &str) -> Result<PathBuf> {
        render_path(&self.artifact(id)?.path, self.options, self.renderer)
    }

    /// Writes the artifact under `root`, replacing whatever is there.
    pub fn regenerate(&self, root: &Path, id: &str) -> Result<PathBuf> {
        let content = self.render(id)?;
        let path = root.join(self.path(id)?);
        write_file(&path, &content)?;
        debug!("Regenerated '{}' ({id})", path.display());
        Ok(path)
    }
}
