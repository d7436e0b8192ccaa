//! Integration tests for descriptor install/remove

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use nativesvc::commands::{self, Verb};
use nativesvc::{Platform, ServiceAdapter, ServiceConfig, ServiceError};

static TEST_COUNTER: AtomicU32 = AtomicU32::new(0);

fn unique_test_dir() -> PathBuf {
    let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
    let dir = PathBuf::from(format!("/tmp/nativesvc-test-{}-{}", std::process::id(), id));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

/// Adapter rooted in a fresh directory with the platform's descriptor dir created
fn rooted_adapter(platform: Platform, name: &str) -> (PathBuf, ServiceAdapter) {
    let root = unique_test_dir();
    let dir = root.join(platform.descriptor_dir().strip_prefix("/").unwrap());
    fs::create_dir_all(&dir).unwrap();

    let config = ServiceConfig::builder(name)
        .working_directory(format!("/opt/{}", name))
        .display_name("Test Service")
        .long_description("Integration test service")
        .build()
        .unwrap();

    let adapter = ServiceAdapter::new(platform, Arc::new(config)).with_root(&root);
    (root, adapter)
}

fn cleanup(root: &Path) {
    let _ = fs::remove_dir_all(root);
}

#[tokio::test]
async fn test_install_writes_rendered_descriptor() {
    let (root, adapter) = rooted_adapter(Platform::Upstart, "svc1");

    let path = adapter.install().await.unwrap();

    assert_eq!(path, root.join("etc/init/svc1.conf"));
    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(content, adapter.render());
    assert!(content.lines().any(|l| l == "exec /opt/svc1/svc1"));

    cleanup(&root);
}

#[tokio::test]
async fn test_second_install_fails() {
    let (root, adapter) = rooted_adapter(Platform::Upstart, "twice");

    adapter.install().await.unwrap();
    let err = adapter.install().await.unwrap_err();

    match err {
        ServiceError::AlreadyInstalled(path) => assert_eq!(path, adapter.descriptor_path()),
        other => panic!("expected AlreadyInstalled, got {:?}", other),
    }

    cleanup(&root);
}

#[tokio::test]
async fn test_install_after_remove_succeeds() {
    let (root, adapter) = rooted_adapter(Platform::Systemd, "cycle");

    adapter.install().await.unwrap();
    assert!(adapter.is_installed());

    adapter.remove().await.unwrap();
    assert!(!adapter.is_installed());

    adapter.install().await.unwrap();
    assert!(adapter.is_installed());

    cleanup(&root);
}

#[tokio::test]
async fn test_existing_foreign_file_blocks_install() {
    let (root, adapter) = rooted_adapter(Platform::Upstart, "taken");
    fs::write(adapter.descriptor_path(), "hand written\n").unwrap();

    assert!(matches!(
        adapter.install().await,
        Err(ServiceError::AlreadyInstalled(_))
    ));
    assert_eq!(
        fs::read_to_string(adapter.descriptor_path()).unwrap(),
        "hand written\n"
    );

    cleanup(&root);
}

#[tokio::test]
async fn test_remove_missing_descriptor_fails() {
    let (root, adapter) = rooted_adapter(Platform::Upstart, "ghost");

    match adapter.remove().await {
        Err(ServiceError::NotInstalled(path)) => assert_eq!(path, adapter.descriptor_path()),
        other => panic!("expected NotInstalled, got {:?}", other),
    }

    cleanup(&root);
}

#[tokio::test]
async fn test_remove_deletes_only_its_descriptor() {
    let (root, adapter) = rooted_adapter(Platform::Upstart, "mine");
    let neighbour = adapter.descriptor_path().with_file_name("other.conf");
    fs::write(&neighbour, "# other job\n").unwrap();

    adapter.install().await.unwrap();
    adapter.remove().await.unwrap();

    assert!(!adapter.descriptor_path().exists());
    assert!(neighbour.exists());

    cleanup(&root);
}

#[tokio::test]
async fn test_launchd_install_and_remove() {
    let (root, adapter) = rooted_adapter(Platform::Launchd, "mac");

    adapter.install().await.unwrap();
    let content = fs::read_to_string(adapter.descriptor_path()).unwrap();
    assert!(content.contains("<string>/opt/mac/mac</string>"));

    adapter.remove().await.unwrap();
    assert!(!adapter.is_installed());

    cleanup(&root);
}

#[tokio::test]
async fn test_install_into_missing_directory_is_io_error() {
    let root = unique_test_dir();
    let config = ServiceConfig::builder("nodir").build().unwrap();
    let adapter = ServiceAdapter::new(Platform::Upstart, Arc::new(config)).with_root(&root);

    assert!(matches!(
        adapter.install().await,
        Err(ServiceError::Io { .. })
    ));

    cleanup(&root);
}

#[tokio::test]
async fn test_execute_install_and_remove_verbs() {
    let (root, adapter) = rooted_adapter(Platform::Upstart, "verbs");

    tokio_test::assert_ok!(commands::execute(&adapter, Some(Verb::Install)).await);
    assert!(adapter.is_installed());

    tokio_test::assert_err!(commands::execute(&adapter, Some(Verb::Install)).await);

    tokio_test::assert_ok!(commands::execute(&adapter, Some(Verb::Remove)).await);
    assert!(!adapter.is_installed());

    tokio_test::assert_err!(commands::execute(&adapter, Some(Verb::Remove)).await);

    cleanup(&root);
}
