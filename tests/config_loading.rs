use cere_gallery::{Config, ConfigError, gallery::FolderLayout, startup_checks};
use tempfile::TempDir;

#[tokio::test]
async fn test_load_config_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[server]
host = "0.0.0.0"
port = 8080

[app]
name = "Arhiv"

[store]
api_key = "test-key"
root_folder_id = "folder-abc"
cache_ttl_seconds = 60

[gallery]
layout = "packed"
max_concurrent_listings = 2

[proxy]
allowed_hosts = ["lh3.googleusercontent.com"]
allowed_host_suffixes = []
browser_max_age = 60
"#,
    )
    .unwrap();

    let config = Config::load_from_file(&path).await.unwrap();
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.app.name, "Arhiv");
    assert_eq!(config.store.resolved_api_key().as_deref(), Some("test-key"));
    assert_eq!(
        config.store.resolved_root_folder_id().as_deref(),
        Some("folder-abc")
    );
    assert_eq!(config.store.cache_ttl_seconds, 60);
    assert_eq!(config.gallery.layout, FolderLayout::Packed);
    assert_eq!(config.gallery.max_concurrent_listings, 2);
    assert_eq!(config.proxy.allowed_hosts, vec!["lh3.googleusercontent.com"]);
    assert!(config.proxy.allowed_host_suffixes.is_empty());
    assert_eq!(config.proxy.browser_max_age, 60);
    assert_eq!(config.proxy.edge_max_age, 86400);

    assert!(startup_checks::perform_startup_checks(&config).await.is_ok());
}

#[tokio::test]
async fn test_missing_file_is_io_error() {
    let temp_dir = TempDir::new().unwrap();
    let result = Config::load_from_file(&temp_dir.path().join("absent.toml")).await;
    assert!(matches!(result, Err(ConfigError::IoError(_))));
}

#[tokio::test]
async fn test_malformed_file_is_toml_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(&path, "[gallery]\nlayout = \"sideways\"\n").unwrap();

    let result = Config::load_from_file(&path).await;
    assert!(matches!(result, Err(ConfigError::TomlError(_))));
}

#[tokio::test]
async fn test_unused_app_keys_are_ignored() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(
        &path,
        "[app]\nname = \"Arhiv\"\nbase_url = \"https://arhiv.example\"\n",
    )
    .unwrap();

    let config = Config::load_from_file(&path).await.unwrap();
    assert_eq!(config.app.name, "Arhiv");
}
