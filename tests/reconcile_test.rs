mod common;

use common::{options, touch};
use postgen::manifest::{Artifact, Condition, Fragment, LeakRule, Manifest};
use postgen::reconcile::{Reconciled, Reconciler};
use postgen::regenerate::Regenerator;
use postgen::renderer::MiniJinjaRenderer;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_missing_parent_is_noop() {
    let temp_dir = TempDir::new().unwrap();
    let manifest = Manifest::builtin();
    let renderer = MiniJinjaRenderer::new();
    let opts = options(&[("api", "false"), ("api_auth", "false")]);
    let regenerator = Regenerator::new(&manifest, &opts, &renderer);

    let outcome = Reconciler::new(&manifest, &opts, &renderer, &regenerator)
        .reconcile(temp_dir.path())
        .unwrap();
    assert_eq!(outcome, Reconciled::default());
}

#[test]
fn test_auth_leak_restores_api_init() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    touch(root, "src/demo_api/__init__.py", "from demo_api.auth.jwt import create_token\n");
    touch(root, "src/demo_api/jwt.py", "leaked");
    touch(root, "src/demo_api/main.py", "app = None\n");
    touch(root, "src/demo_api/routers/auth.py", "leaked");

    let manifest = Manifest::builtin();
    let renderer = MiniJinjaRenderer::new();
    let opts = options(&[("api", "true"), ("api_auth", "false"), ("api_versioning", "true")]);
    let regenerator = Regenerator::new(&manifest, &opts, &renderer);
    let outcome = Reconciler::new(&manifest, &opts, &renderer, &regenerator)
        .reconcile(root)
        .unwrap();

    assert!(!root.join("src/demo_api/jwt.py").exists());
    assert!(!root.join("src/demo_api/routers/auth.py").exists());
    assert!(root.join("src/demo_api/main.py").exists());
    assert_eq!(outcome.regenerated, vec![root.join("src/demo_api/__init__.py")]);
    let init = fs::read_to_string(root.join("src/demo_api/__init__.py")).unwrap();
    assert!(!init.contains("auth"));
}

#[test]
fn test_shared_artifact_last_regeneration_wins() {
    let mut manifest = Manifest {
        version: 1,
        dependencies: Default::default(),
        placeholders: vec![],
        leaks: vec![],
        artifacts: Default::default(),
        regenerate: vec![],
        executables: vec![],
        sentinel_patterns: vec![],
    };
    manifest.artifacts.insert(
        "marker".to_string(),
        Artifact {
            path: "pkg/__init__.py".to_string(),
            fragments: vec![
                Fragment { when: Condition::Always, template: "base\n".to_string() },
                Fragment { when: Condition::disabled("b"), template: "no-b\n".to_string() },
            ],
        },
    );
    for (name, entry) in [("a", "a.py"), ("b", "b.py")] {
        manifest.leaks.push(LeakRule {
            name: name.to_string(),
            when: Condition::disabled(name),
            parent: "pkg".to_string(),
            entries: vec![entry.to_string()],
            regenerates: vec!["marker".to_string()],
        });
    }

    let mut reversed_manifest = manifest.clone();
    reversed_manifest.leaks.reverse();

    let renderer = MiniJinjaRenderer::new();
    let opts = options(&[]);

    let forward = TempDir::new().unwrap();
    touch(forward.path(), "pkg/__init__.py", "overwritten by a\n");
    let regenerator = Regenerator::new(&manifest, &opts, &renderer);
    Reconciler::new(&manifest, &opts, &renderer, &regenerator)
        .reconcile(forward.path())
        .unwrap();

    let reversed = TempDir::new().unwrap();
    touch(reversed.path(), "pkg/__init__.py", "overwritten by b\n");
    let regenerator = Regenerator::new(&reversed_manifest, &opts, &renderer);
    Reconciler::new(&reversed_manifest, &opts, &renderer, &regenerator)
        .reconcile(reversed.path())
        .unwrap();

    let expected = "base\nno-b\n";
    assert_eq!(fs::read_to_string(forward.path().join("pkg/__init__.py")).unwrap(), expected);
    assert_eq!(fs::read_to_string(reversed.path().join("pkg/__init__.py")).unwrap(), expected);
}
