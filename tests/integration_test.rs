/// Integration tests for the collection pipeline
mod test_utilities;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use test_utilities::mocks::*;
use tokio_util::sync::CancellationToken;
use bom_harvest::prelude::*;

fn write(root: &Path, relative: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, "").unwrap();
}

fn builtin_use_case<FT: FileTree>(
    tree: FT,
    tool: Arc<MockBomTool>,
    runner: Arc<MockCommandRunner>,
    enabled: &[&str],
) -> (
    CollectBomUseCase<FT, PurlCpeResolver, MockProgressReporter>,
    MockProgressReporter,
) {
    let enabled: Vec<String> = enabled.iter().map(|s| s.to_string()).collect();
    let registry = CollectorFactory::builtin(tool, runner, ToolOptions::json(), &enabled).unwrap();
    let reporter = MockProgressReporter::new();
    let use_case = CollectBomUseCase::new(
        registry,
        tree,
        PurlCpeResolver::new(),
        reporter.clone(),
        CancellationToken::new(),
    );
    (use_case, reporter)
}

fn names(bom: &Bom) -> Vec<&str> {
    bom.components.iter().map(|c| c.name.as_str()).collect()
}

#[tokio::test]
async fn test_manifest_and_nested_lockfile_become_two_roots() {
    let repo = TempDir::new().unwrap();
    write(repo.path(), "Cargo.toml");
    write(repo.path(), "sub/Cargo.lock");
    let tool = Arc::new(MockBomTool::new());
    let runner = Arc::new(MockCommandRunner::creating("Cargo.lock"));
    let (use_case, _) = builtin_use_case(LocalFileTree::new(), tool.clone(), runner.clone(), &["cargo"]);

    let outcome = use_case
        .execute(CollectRequest::new(repo.path().to_path_buf()))
        .await
        .unwrap();

    assert_eq!(
        tool.calls(),
        vec![
            (repo.path().to_path_buf(), "rust".to_string()),
            (repo.path().join("sub"), "rust".to_string()),
        ]
    );
    // Only the root without a lockfile is bootstrapped
    let calls = runner.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, repo.path());
    assert_eq!(calls[0].1, "cargo");
    assert_eq!(calls[0].2, vec!["generate-lockfile"]);

    let summary = outcome.summary().clone();
    assert_eq!(summary.roots_discovered, 2);
    assert_eq!(summary.boms_collected, 2);
    assert_eq!(outcome.bom().unwrap().component_count(), 2);
}

#[tokio::test]
async fn test_bootstrap_failure_drops_only_that_root() {
    let repo = TempDir::new().unwrap();
    write(repo.path(), "Cargo.toml");
    write(repo.path(), "sub/Cargo.lock");
    let tool = Arc::new(MockBomTool::new());
    let runner = Arc::new(MockCommandRunner::failing(101));
    let (use_case, reporter) =
        builtin_use_case(LocalFileTree::new(), tool.clone(), runner, &["cargo"]);

    let outcome = use_case
        .execute(CollectRequest::new(repo.path().to_path_buf()))
        .await
        .unwrap();

    assert_eq!(tool.calls(), vec![(repo.path().join("sub"), "rust".to_string())]);
    assert_eq!(outcome.summary().roots_dropped, 1);
    assert_eq!(names(outcome.bom().unwrap()), vec!["sub"]);
    assert!(reporter
        .errors()
        .iter()
        .any(|m| m.contains("Bootstrap failed for collector 'cargo'")));
}

#[tokio::test]
async fn test_lockfile_step_that_writes_nothing_drops_root() {
    let repo = TempDir::new().unwrap();
    write(repo.path(), "Gemfile");
    let tool = Arc::new(MockBomTool::new());
    let (use_case, _) = builtin_use_case(
        LocalFileTree::new(),
        tool.clone(),
        Arc::new(MockCommandRunner::new()),
        &["gem"],
    );

    let outcome = use_case
        .execute(CollectRequest::new(repo.path().to_path_buf()))
        .await
        .unwrap();

    assert!(outcome.is_unsupported());
    assert!(tool.calls().is_empty());
    assert_eq!(outcome.summary().roots_dropped, 1);
}

#[tokio::test]
async fn test_preferred_lockfile_yields_single_root() {
    let tree = InMemoryFileTree::new(&[
        "web/package.json",
        "web/package-lock.json",
        "web/node_modules/left-pad/package.json",
    ]);
    let tool = Arc::new(MockBomTool::new());
    let runner = Arc::new(MockCommandRunner::new());
    let (use_case, _) = builtin_use_case(tree, tool.clone(), runner.clone(), &["npm"]);

    let outcome = use_case
        .execute(CollectRequest::new(PathBuf::from("/repo")))
        .await
        .unwrap();

    assert_eq!(
        tool.calls(),
        vec![(PathBuf::from("/repo/web"), "npm".to_string())]
    );
    assert!(runner.calls().is_empty());
    assert_eq!(names(outcome.bom().unwrap()), vec!["web"]);
}

#[tokio::test]
async fn test_ignored_and_excluded_directories_are_never_collected() {
    let tree = InMemoryFileTree::new(&[
        "go.mod",
        "tools/go.mod",
        "testdata/go.mod",
        ".git/go.mod",
        "third_party/lib/go.mod",
    ]);
    let tool = Arc::new(MockBomTool::new());
    let (use_case, reporter) = builtin_use_case(
        tree,
        tool.clone(),
        Arc::new(MockCommandRunner::new()),
        &["gomod"],
    );
    let request = CollectRequest::builder()
        .repository_root("/repo")
        .exclude_paths(vec!["third_party".to_string(), "*.bak".to_string()])
        .build();

    use_case.execute(request).await.unwrap();

    assert_eq!(
        tool.calls(),
        vec![
            (PathBuf::from("/repo"), "go".to_string()),
            (PathBuf::from("/repo/tools"), "go".to_string()),
        ]
    );
    assert!(reporter
        .errors()
        .iter()
        .any(|m| m.contains("Exclude pattern '*.bak' did not match any path")));
}

#[tokio::test]
async fn test_repository_without_manifests_is_unsupported() {
    let repo = TempDir::new().unwrap();
    write(repo.path(), "README.md");
    let tool = Arc::new(MockBomTool::new());
    let (use_case, _) = builtin_use_case(
        LocalFileTree::new(),
        tool.clone(),
        Arc::new(MockCommandRunner::new()),
        &[],
    );

    let outcome = use_case
        .execute(CollectRequest::new(repo.path().to_path_buf()))
        .await
        .unwrap();

    assert!(outcome.is_unsupported());
    assert!(outcome.bom().is_none());
    assert!(tool.calls().is_empty());
    assert_eq!(outcome.summary().boms_collected, 0);
    assert_eq!(
        outcome.summary().collectors_attempted,
        CollectorFactory::builtin_names().len()
    );
}

#[tokio::test]
async fn test_workflows_collected_repository_wide() {
    let repo = TempDir::new().unwrap();
    write(repo.path(), ".github/workflows/ci.yml");
    let tool = Arc::new(MockBomTool::new());
    let (use_case, _) = builtin_use_case(
        LocalFileTree::new(),
        tool.clone(),
        Arc::new(MockCommandRunner::new()),
        &["github-actions"],
    );

    let outcome = use_case
        .execute(CollectRequest::new(repo.path().to_path_buf()))
        .await
        .unwrap();

    assert_eq!(
        tool.calls(),
        vec![(repo.path().to_path_buf(), "github".to_string())]
    );
    assert_eq!(outcome.bom().unwrap().component_count(), 1);
}

#[tokio::test]
async fn test_tool_failure_in_one_root_keeps_the_rest() {
    let tree = InMemoryFileTree::new(&["a/go.mod", "b/go.mod"]);
    let tool = Arc::new(MockBomTool::new().failing_in("/repo/a"));
    let (use_case, reporter) = builtin_use_case(
        tree,
        tool,
        Arc::new(MockCommandRunner::new()),
        &["gomod"],
    );

    let outcome = use_case
        .execute(CollectRequest::new(PathBuf::from("/repo")))
        .await
        .unwrap();

    assert_eq!(names(outcome.bom().unwrap()), vec!["b"]);
    assert_eq!(outcome.summary().generation_failures, 1);
    assert!(reporter
        .errors()
        .iter()
        .any(|m| m.contains("External tool 'mock-tool' failed")));
}

#[tokio::test]
async fn test_merged_output_is_stamped_and_encodable() {
    let tree = InMemoryFileTree::new(&["a/go.mod", "b/go.mod"]);
    let (use_case, _) = builtin_use_case(
        tree,
        Arc::new(MockBomTool::new()),
        Arc::new(MockCommandRunner::new()),
        &["gomod"],
    );
    let request = CollectRequest::builder()
        .repository_root("/repo")
        .attach_cpe(true)
        .tags(vec!["release".to_string()])
        .build();

    let bom = use_case.execute(request).await.unwrap().into_bom().unwrap();

    assert!(bom
        .serial_number
        .as_deref()
        .is_some_and(|s| s.starts_with("urn:uuid:")));
    assert_eq!(bom.metadata.tools[0].name, "bom-harvest");
    assert!(bom.components.iter().all(|c| c.cpe.is_some()));
    assert_eq!(
        bom.metadata.properties,
        vec![Property::new(TAG_PROPERTY, "release")]
    );

    for format in [BomFormat::Json, BomFormat::Xml] {
        let encoded = CodecFactory::create(format).encode(&bom).unwrap();
        let decoded = CodecFactory::decode(encoded.as_bytes()).unwrap();
        assert_eq!(decoded.components, bom.components);
        assert_eq!(decoded.metadata.properties, bom.metadata.properties);
    }
}

#[tokio::test]
async fn test_cancelled_run_returns_cancelled() {
    let tree = InMemoryFileTree::new(&["go.mod"]);
    let registry = CollectorFactory::builtin(
        Arc::new(MockBomTool::new()),
        Arc::new(MockCommandRunner::new()),
        ToolOptions::json(),
        &[],
    )
    .unwrap();
    let cancel = CancellationToken::new();
    cancel.cancel();
    let use_case = CollectBomUseCase::new(
        registry,
        tree,
        PurlCpeResolver::new(),
        MockProgressReporter::new(),
        cancel,
    );

    let err = use_case
        .execute(CollectRequest::new(PathBuf::from("/repo")))
        .await
        .unwrap_err();

    assert!(err
        .downcast_ref::<SbomError>()
        .is_some_and(SbomError::is_cancelled));
}

mod merge_properties {
    use super::*;

    fn lib(name: &str, version: &str) -> Component {
        Component::library(name, version, &format!("pkg:npm/{}@{}", name, version))
    }

    fn decoded(json: &str) -> Bom {
        CodecFactory::decode(json.as_bytes()).unwrap()
    }

    #[test]
    fn test_merge_is_order_independent_for_component_set() {
        let a = Bom::with_components(vec![lib("left-pad", "1.3.0"), lib("chalk", "5.0.0")]);
        let b = Bom::with_components(vec![lib("zod", "3.22.0"), lib("chalk", "5.0.0")]);

        let forward = BomMerger::merge(&[a.clone(), b.clone()]).unwrap();
        let backward = BomMerger::merge(&[b, a]).unwrap();

        assert_eq!(forward.components, backward.components);
        assert_eq!(forward.component_count(), 3);
    }

    #[test]
    fn test_merge_of_merged_output_is_stable() {
        let a = Bom::with_components(vec![lib("left-pad", "1.3.0")]);
        let b = Bom::with_components(vec![lib("chalk", "5.0.0")]);

        let once = BomMerger::merge(&[a, b]).unwrap();
        let twice = BomMerger::merge(std::slice::from_ref(&once)).unwrap();

        assert_eq!(once.components, twice.components);
        assert_ne!(once.serial_number, twice.serial_number);
    }

    #[test]
    fn test_merge_rejects_empty_input() {
        let err = BomMerger::merge(&[]).unwrap_err();
        assert!(matches!(err, SbomError::MergeRejected { .. }));
    }

    #[test]
    fn test_json_and_xml_partials_merge_together() {
        let json = decoded(
            r#"{"bomFormat":"CycloneDX","specVersion":"1.4","version":1,
                "components":[{"type":"library","name":"left-pad","version":"1.3.0",
                "purl":"pkg:npm/left-pad@1.3.0","licenses":[{"license":{"id":"MIT"}}]}]}"#,
        );
        let xml = decoded(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<bom xmlns="http://cyclonedx.org/schema/bom/1.5" version="1">
  <components>
    <component type="library">
      <name>left-pad</name>
      <version>1.3.0</version>
      <description>String padding</description>
      <purl>pkg:npm/left-pad@1.3.0</purl>
    </component>
  </components>
</bom>"#,
        );

        let merged = BomMerger::merge(&[json, xml]).unwrap();

        assert_eq!(merged.component_count(), 1);
        let component = &merged.components[0];
        assert_eq!(component.description.as_deref(), Some("String padding"));
        assert_eq!(component.licenses, vec![LicenseChoice::spdx("MIT")]);
    }
}
