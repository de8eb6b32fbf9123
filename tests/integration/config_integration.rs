//! Configuration layering: defaults, files and environment overrides

use hashaudit::config::ConfigLoader;
use hashaudit::error::ApiError;
use hashaudit::tree::walker::UnreadablePolicy;
use hashaudit::types::HashAlgorithm;
use std::path::PathBuf;
use std::sync::Mutex;
use tempfile::TempDir;

// Serializes tests that mutate process environment
static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn with_env<F: FnOnce()>(vars: &[(&str, &str)], f: F) {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let saved: Vec<(String, Option<String>)> = vars
        .iter()
        .map(|(k, _)| (k.to_string(), std::env::var(k).ok()))
        .collect();
    for (k, v) in vars {
        std::env::set_var(k, v);
    }

    f();

    for (k, original) in saved {
        match original {
            Some(value) => std::env::set_var(&k, value),
            None => std::env::remove_var(&k),
        }
    }
}

#[test]
fn test_environment_overrides_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("hashaudit.toml");
    std::fs::write(&config_file, "[scan]\nalgorithm = \"sha512\"\nmax_depth = 8\n").unwrap();

    with_env(&[("HASHAUDIT__SCAN__ALGORITHM", "blake3")], || {
        let config = ConfigLoader::load_from_file(&config_file).unwrap();
        assert_eq!(config.scan.algorithm, "blake3");
        assert_eq!(config.scan.max_depth, 8);
    });
}

#[test]
fn test_explicit_file_replaces_global_file() {
    let xdg = TempDir::new().unwrap();
    let global_dir = xdg.path().join("hashaudit");
    std::fs::create_dir_all(&global_dir).unwrap();
    std::fs::write(
        global_dir.join("config.toml"),
        "[store]\npath = \"/from/global.db\"\n",
    )
    .unwrap();

    let explicit = xdg.path().join("explicit.toml");
    std::fs::write(&explicit, "[scan]\nfollow_symlinks = false\n").unwrap();

    with_env(&[("XDG_CONFIG_HOME", xdg.path().to_str().unwrap())], || {
        let global = ConfigLoader::resolve(None).unwrap();
        assert_eq!(global.store.path, PathBuf::from("/from/global.db"));

        let config = ConfigLoader::resolve(Some(&explicit)).unwrap();
        assert_eq!(config.store.path, PathBuf::from("hashaudit.db"));
        assert!(!config.scan.follow_symlinks);
    });
}

#[test]
fn test_walker_config_from_settings() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("hashaudit.toml");
    std::fs::write(
        &config_file,
        "[scan]\nalgorithm = \"SHA-512\"\nchunk_size = 1024\non_unreadable = \"skip\"\n",
    )
    .unwrap();

    with_env(&[], || {
        let config = ConfigLoader::load_from_file(&config_file).unwrap();
        let walker = config.scan.walker_config().unwrap();
        assert_eq!(walker.algorithm, HashAlgorithm::Sha512);
        assert_eq!(walker.chunk_size, 1024);
        assert_eq!(walker.on_unreadable, UnreadablePolicy::Skip);
    });
}

#[test]
fn test_invalid_settings_fail_validation() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("hashaudit.toml");
    std::fs::write(&config_file, "[scan]\nchunk_size = 0\n").unwrap();

    with_env(&[], || {
        let result = ConfigLoader::load_from_file(&config_file).unwrap().validated();
        assert!(matches!(result, Err(ApiError::ConfigError(_))));
    });
}
