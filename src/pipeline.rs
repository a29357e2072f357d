//! The reconciliation pipeline.
//!
//! Runs once per generated project, strictly in order:
//! resolve options, prune placeholders, reconcile leaks, regenerate
//! artifacts, set executable bits. A failing stage aborts the run; whatever
//! was already removed stays removed. Once the run is done the tree is
//! audited for leftover sentinels.

use log::info;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::audit::audit;
use crate::error::{Error, Result};
use crate::manifest::Manifest;
use crate::options::{Options, RawContext};
use crate::permissions::make_executable;
use crate::plan::Plan;
use crate::prune::prune;
use crate::reconcile::Reconciler;
use crate::regenerate::Regenerator;
use crate::renderer::TemplateRenderer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ResolveOptions,
    PrunePlaceholders,
    ReconcileLeaks,
    RegenerateArtifacts,
    SetExecutableBits,
    Done,
}

impl Stage {
    pub fn next(self) -> Stage {
        match self {
            Stage::ResolveOptions => Stage::PrunePlaceholders,
            Stage::PrunePlaceholders => Stage::ReconcileLeaks,
            Stage::ReconcileLeaks => Stage::RegenerateArtifacts,
            Stage::RegenerateArtifacts => Stage::SetExecutableBits,
            Stage::SetExecutableBits | Stage::Done => Stage::Done,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::ResolveOptions => "Resolving options",
            Stage::PrunePlaceholders => "Pruning placeholders",
            Stage::ReconcileLeaks => "Reconciling leaks",
            Stage::RegenerateArtifacts => "Regenerating artifacts",
            Stage::SetExecutableBits => "Setting executable bits",
            Stage::Done => "Done",
        };
        f.write_str(name)
    }
}

/// What a run changed on disk.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Report {
    pub removed: Vec<PathBuf>,
    pub regenerated: Vec<PathBuf>,
    pub executables: Vec<PathBuf>,
    /// Sentinel paths still present after the run.
    pub leftovers: Vec<PathBuf>,
}

pub struct Pipeline<'a> {
    root: PathBuf,
    manifest: &'a Manifest,
    renderer: &'a dyn TemplateRenderer,
    strict: bool,
}

impl<'a> Pipeline<'a> {
    pub fn new<P: AsRef<Path>>(
        root: P,
        manifest: &'a Manifest,
        renderer: &'a dyn TemplateRenderer,
    ) -> Self {
        Self { root: root.as_ref().to_path_buf(), manifest, renderer, strict: false }
    }

    /// Fail the run when sentinel paths survive it.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Resolves options and computes the plan without touching the tree.
    pub fn plan(&self, raw: &RawContext) -> Result<(Options, Plan)> {
        let options = at(Stage::ResolveOptions, self.resolve(raw))?;
        let plan = at(Stage::ResolveOptions, Plan::build(self.manifest, &options, self.renderer))?;
        Ok((options, plan))
    }

    fn resolve(&self, raw: &RawContext) -> Result<Options> {
        self.manifest.validate()?;
        let options = Options::resolve(raw)?;
        options.warn_inconsistencies(&self.manifest.dependencies);
        Ok(options)
    }

    /// Runs every stage in order.
    pub fn run(&self, raw: &RawContext) -> Result<Report> {
        let root = self.root.as_path();
        let mut report = Report::default();
        let mut stage = Stage::ResolveOptions;

        info!("{stage} for '{}'", root.display());
        let (options, plan) = self.plan(raw)?;
        let regenerator = Regenerator::new(self.manifest, &options, self.renderer);

        stage = stage.next();
        info!("{stage}");
        report.removed.extend(at(stage, prune(root, &plan.placeholders))?);

        stage = stage.next();
        info!("{stage}");
        let reconciled = at(
            stage,
            Reconciler::new(self.manifest, &options, self.renderer, &regenerator).reconcile(root),
        )?;
        report.removed.extend(reconciled.removed);
        report.regenerated.extend(reconciled.regenerated);

        stage = stage.next();
        info!("{stage}");
        for id in &self.manifest.regenerate {
            let path = at(stage, regenerator.regenerate(root, id))?;
            if !report.regenerated.contains(&path) {
                report.regenerated.push(path);
            }
        }

        stage = stage.next();
        info!("{stage}");
        report.executables = at(stage, make_executable(root, &self.manifest.executables))?;

        stage = stage.next();
        info!("{stage}, auditing for leftover placeholders");
        report.leftovers = audit(root, &self.manifest.sentinel_patterns)?;
        if self.strict && !report.leftovers.is_empty() {
            return Err(Error::LeftoverSentinels(report.leftovers));
        }

        info!(
            "Removed {} paths, regenerated {} files, updated {} scripts",
            report.removed.len(),
            report.regenerated.len(),
            report.executables.len()
        );
        Ok(report)
    }
}

/// Tags an error with the stage it happened in.
fn at<T>(stage: Stage, result: Result<T>) -> Result<T> {
    result.map_err(|source| match source {
        err @ Error::StageError { .. } => err,
        err => Error::StageError { stage, source: Box::new(err) },
    })
}
