//! End-to-end bundle assembly against temporary source trees.

mod common;

use common::{TableLocator, Workspace, archive_entries, archive_members};
use qubic_build::bundler::{self, BundleDefinition};
use std::collections::HashMap;

#[tokio::test]
async fn literal_root_stages_at_top_level_and_names_archive() {
    let ws = Workspace::new();
    ws.checkout("oxford_asl");
    ws.file("build/oxford_asl/README.md", "readme");
    let literal_root = ws.build_dir().join("oxford_asl");

    let bundle = BundleDefinition::new("oxford_asl")
        .source(literal_root.to_str().unwrap(), ["README.md"]);
    let artifact = ws
        .assembler("v1.2.3", TableLocator::default())
        .assemble(&bundle)
        .await
        .unwrap();

    assert_eq!(artifact.version, "1.2.3");
    assert_eq!(
        artifact.archive,
        ws.package_dir().join("oxford_asl-1.2.3-linux18.tar.gz")
    );
    assert!(ws.package_dir().join("oxford_asl/README.md").is_file());
    assert_eq!(
        archive_members(&artifact.archive),
        ["oxford_asl", "oxford_asl/README.md"]
    );
}

#[tokio::test]
async fn describe_output_keeps_numeric_build_number() {
    let ws = Workspace::new();
    ws.checkout("oxford_asl");

    let bundle = BundleDefinition::new("oxford_asl");
    let artifact = ws
        .assembler("v1.2.3-4-g abcdef-dirty", TableLocator::default())
        .assemble(&bundle)
        .await
        .unwrap();

    assert_eq!(artifact.version, "1.2.3-4");
    assert!(
        ws.package_dir()
            .join("oxford_asl-1.2.3-4-linux18.tar.gz")
            .is_file()
    );
}

#[tokio::test]
async fn glob_matches_land_under_pattern_directory() {
    let ws = Workspace::new();
    ws.checkout("fabber_core");
    ws.file("install/fsldev/bin/fabber_asl", "asl");
    ws.file("install/fsldev/bin/fabber_dsc", "dsc");
    ws.file("install/fsldev/bin/mvntool", "mvn");

    let bundle = BundleDefinition::new("fabber")
        .version_source("fabber_core")
        .source("${FSLDEVDIR}", ["bin/fabber*"]);
    let artifact = ws
        .assembler("v2.0.1", TableLocator::default())
        .assemble(&bundle)
        .await
        .unwrap();

    let staging = ws.package_dir().join("fabber");
    assert!(staging.join("bin/fabber_asl").is_file());
    assert!(staging.join("bin/fabber_dsc").is_file());
    assert!(!staging.join("bin/mvntool").exists());
    assert!(!staging.join("bin/fabber*").exists());
    assert_eq!(artifact.staged, 2);
    assert_eq!(
        archive_members(&artifact.archive),
        ["fabber", "fabber/bin", "fabber/bin/fabber_asl", "fabber/bin/fabber_dsc"]
    );
}

#[tokio::test]
async fn multi_segment_items_keep_their_directory() {
    let ws = Workspace::new();
    ws.checkout("ENABLE");
    ws.file("install/fsldev/python/asl/preproc.py", "pre");
    ws.file("install/fsldev/python/asl/enable.py", "en");
    ws.file("install/fsldev/include/fabber_core/fabber_core.h", "h");

    let bundle = BundleDefinition::new("ENABLE")
        .source("${FSLDEVDIR}/python", ["asl/preproc.py", "asl/enable.py"])
        .source("${FSLDEVDIR}", ["include/fabber_core"]);
    ws.assembler("1.0.0", TableLocator::default())
        .assemble(&bundle)
        .await
        .unwrap();

    let staging = ws.package_dir().join("ENABLE");
    assert_eq!(
        std::fs::read_to_string(staging.join("asl/preproc.py")).unwrap(),
        "pre"
    );
    assert!(staging.join("asl/enable.py").is_file());
    assert!(staging.join("include/fabber_core/fabber_core.h").is_file());
}

#[tokio::test]
async fn no_matches_still_produces_an_archive() {
    let ws = Workspace::new();
    ws.checkout("verbena");

    let bundle = BundleDefinition::new("verbena")
        .source("${BUILDDIR}/verbena", ["CITE", "README.md", "LICENSE"])
        .source("${FSLDEVDIR}/bin", ["verbena", "fabber_dsc*"]);
    let artifact = ws
        .assembler("v0.1.0", TableLocator::default())
        .assemble(&bundle)
        .await
        .unwrap();

    assert_eq!(artifact.staged, 0);
    assert_eq!(archive_members(&artifact.archive), ["verbena"]);
}

#[tokio::test]
async fn unparseable_version_aborts_before_archiving() {
    let ws = Workspace::new();
    ws.checkout("oxasl");
    ws.file("build/oxasl/README.md", "r");

    let bundle = BundleDefinition::new("oxasl").source("${BUILDDIR}/oxasl", ["README.md"]);
    let err = ws
        .assembler("nightly-build-7", TableLocator::default())
        .assemble(&bundle)
        .await
        .unwrap_err();

    assert!(matches!(err, bundler::Error::VersionParse { ref raw } if raw == "nightly-build-7"));
    // Staging is left behind, no archive is written.
    assert!(ws.package_dir().join("oxasl/README.md").is_file());
    let archives: Vec<_> = std::fs::read_dir(ws.package_dir())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tar.gz"))
        .collect();
    assert!(archives.is_empty());
}

#[tokio::test]
async fn missing_version_checkout_is_an_error() {
    let ws = Workspace::new();
    let bundle = BundleDefinition::new("fabber").version_source("fabber_core");
    let err = ws
        .assembler("v1.0.0", TableLocator::default())
        .assemble(&bundle)
        .await
        .unwrap_err();
    assert_eq!(err.tool_exit_code(), Some(128));
}

#[tokio::test]
async fn platform_override_replaces_detected_tag() {
    let ws = Workspace::new();
    ws.checkout("docs");
    let bundle = BundleDefinition::new("docs").platform("noarch");
    let artifact = ws
        .assembler("v3.0.0", TableLocator::default())
        .assemble(&bundle)
        .await
        .unwrap();
    assert_eq!(artifact.platform, "noarch");
    assert!(
        ws.package_dir()
            .join("docs-3.0.0-noarch.tar.gz")
            .is_file()
    );
}

#[tokio::test]
async fn python_modules_are_copied_whole() {
    let ws = Workspace::new();
    ws.checkout("oxasl");
    ws.file("site-packages/oxasl/__init__.py", "init");
    ws.file("site-packages/oxasl/reg/core.py", "core");
    let locator = TableLocator(HashMap::from([(
        "oxasl".to_string(),
        ws.tmp.path().join("site-packages/oxasl"),
    )]));

    let bundle = BundleDefinition::new("oxasl").source("${PYTHON}", ["oxasl"]);
    ws.assembler("v0.9.0", locator)
        .assemble(&bundle)
        .await
        .unwrap();

    let staging = ws.package_dir().join("oxasl");
    assert!(staging.join("oxasl/__init__.py").is_file());
    assert!(staging.join("oxasl/reg/core.py").is_file());
}

#[cfg(unix)]
#[tokio::test]
async fn symlinked_module_files_ship_their_contents() {
    let ws = Workspace::new();
    ws.checkout("oxasl");
    ws.file("site-packages/oxasl/__init__.py", "init");
    let outside = ws.file("elsewhere/data.bin", "payload");
    let module = ws.tmp.path().join("site-packages/oxasl");
    std::os::unix::fs::symlink(&outside, module.join("data.bin")).unwrap();
    let locator = TableLocator(HashMap::from([("oxasl".to_string(), module)]));

    let bundle = BundleDefinition::new("oxasl").source("${PYTHON}", ["oxasl"]);
    let artifact = ws
        .assembler("v0.9.0", locator)
        .assemble(&bundle)
        .await
        .unwrap();

    let staged = ws.package_dir().join("oxasl/oxasl/data.bin");
    assert!(!std::fs::symlink_metadata(&staged).unwrap().file_type().is_symlink());

    let entries = archive_entries(&artifact.archive);
    let (_, contents) = entries
        .iter()
        .find(|(path, _)| path == "oxasl/oxasl/data.bin")
        .unwrap();
    assert_eq!(contents, b"payload");
}

#[tokio::test]
async fn unlocatable_python_module_fails_the_bundle() {
    let ws = Workspace::new();
    ws.checkout("oxasl");
    let bundle = BundleDefinition::new("oxasl").source("${PYTHON}", ["fsl"]);
    let err = ws
        .assembler("v0.9.0", TableLocator::default())
        .assemble(&bundle)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("fsl"));
}

#[tokio::test]
async fn unknown_placeholder_fails_resolution() {
    let ws = Workspace::new();
    ws.checkout("b");
    let bundle = BundleDefinition::new("b").source("${FSLDEVDRI}/bin", ["x"]);
    let err = ws
        .assembler("v1.0.0", TableLocator::default())
        .assemble(&bundle)
        .await
        .unwrap_err();
    assert!(matches!(err, bundler::Error::UnknownPlaceholder { .. }));
}

#[tokio::test]
async fn rerun_replaces_stale_staging_and_is_repeatable() {
    let ws = Workspace::new();
    ws.checkout("oxford_asl");
    ws.file("build/oxford_asl/README.md", "readme");
    ws.file("build/oxford_asl/LICENSE", "license");
    ws.file("packages/oxford_asl/stale.txt", "old");

    let bundle = BundleDefinition::new("oxford_asl")
        .source("${BUILDDIR}/oxford_asl", ["README.md", "LICENSE"]);
    let assembler = ws.assembler("v1.2.3", TableLocator::default());

    let first = assembler.assemble(&bundle).await.unwrap();
    let first_entries = archive_entries(&first.archive);
    assert!(!ws.package_dir().join("oxford_asl/stale.txt").exists());

    let second = assembler.assemble(&bundle).await.unwrap();
    assert_eq!(first.archive, second.archive);
    assert_eq!(first_entries, archive_entries(&second.archive));
    assert_eq!(
        archive_members(&second.archive),
        ["oxford_asl", "oxford_asl/LICENSE", "oxford_asl/README.md"]
    );
}

#[tokio::test]
async fn directory_staged_twice_fails() {
    let ws = Workspace::new();
    ws.checkout("fabber");
    ws.file("install/fsldev/include/fabber_core/a.h", "a");

    let bundle = BundleDefinition::new("fabber")
        .source("${FSLDEVDIR}", ["include/fabber_core"])
        .source("${FSLDEVDIR}/include", ["fabber_core"]);
    // Different destinations: include/fabber_core and fabber_core.
    ws.assembler("v1.0.0", TableLocator::default())
        .assemble(&bundle)
        .await
        .unwrap();

    let dup = BundleDefinition::new("fabber").source(
        "${FSLDEVDIR}",
        ["include/fabber_core", "include/fabber_core"],
    );
    let err = ws
        .assembler("v1.0.0", TableLocator::default())
        .assemble(&dup)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("already exists"));
}
