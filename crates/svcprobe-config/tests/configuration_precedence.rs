//! Layering tests for configuration files, environment, and CLI flags.

use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use once_cell::sync::Lazy;
use ortho_config::OrthoConfig;
use svcprobe_config::{BusScope, Config, LogFormat};
use tempfile::TempDir;

static ENV_MUTEX: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

/// Serialises environment mutation and restores the previous values on drop.
struct EnvGuard {
    previous: Vec<(&'static str, Option<OsString>)>,
    _lock: MutexGuard<'static, ()>,
}

impl EnvGuard {
    fn acquire() -> Self {
        let lock = ENV_MUTEX
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        Self {
            previous: Vec::new(),
            _lock: lock,
        }
    }

    fn set(&mut self, key: &'static str, value: impl AsRef<OsStr>) {
        self.previous.push((key, std::env::var_os(key)));
        // Environment mutation is unsafe on newer toolchains; the guard
        // restores every override in `Drop`.
        unsafe { std::env::set_var(key, value) };
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, previous) in self.previous.drain(..).rev() {
            match previous {
                Some(value) => unsafe { std::env::set_var(key, value) },
                None => unsafe { std::env::remove_var(key) },
            }
        }
    }
}

fn write_config(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("svcprobe.toml");
    fs::write(&path, contents).expect("write configuration file");
    path
}

fn args_with_config(path: &PathBuf, extra: &[&str]) -> Vec<OsString> {
    let mut args = vec![
        OsString::from("client"),
        OsString::from("--config-path"),
        path.clone().into_os_string(),
    ];
    args.extend(extra.iter().map(OsString::from));
    args
}

#[test]
fn file_values_override_defaults() {
    let _env = EnvGuard::acquire();
    let dir = TempDir::new().expect("temp dir");
    let path = write_config(
        &dir,
        "bus = \"system\"\ncall_timeout_ms = 500\nlog_format = \"json\"\n",
    );

    let config = Config::load_from_iter(args_with_config(&path, &[])).expect("config loads");

    assert_eq!(config.bus(), BusScope::System);
    assert_eq!(config.call_timeout_ms(), 500);
    assert_eq!(config.log_format(), LogFormat::Json);
    assert_eq!(config.log_filter(), svcprobe_config::DEFAULT_LOG_FILTER);
}

#[test]
fn environment_overrides_file() {
    let mut env = EnvGuard::acquire();
    let dir = TempDir::new().expect("temp dir");
    let path = write_config(&dir, "call_timeout_ms = 500\n");
    env.set("SVCPROBE_CALL_TIMEOUT_MS", "750");

    let config = Config::load_from_iter(args_with_config(&path, &[])).expect("config loads");

    assert_eq!(config.call_timeout_ms(), 750);
}

#[test]
fn cli_flags_override_environment() {
    let mut env = EnvGuard::acquire();
    let dir = TempDir::new().expect("temp dir");
    let path = write_config(&dir, "call_timeout_ms = 500\n");
    env.set("SVCPROBE_CALL_TIMEOUT_MS", "750");

    let config = Config::load_from_iter(args_with_config(
        &path,
        &["--call-timeout-ms", "900", "--bus", "system"],
    ))
    .expect("config loads");

    assert_eq!(config.call_timeout_ms(), 900);
    assert_eq!(config.bus(), BusScope::System);
}

#[test]
fn malformed_file_is_reported() {
    let _env = EnvGuard::acquire();
    let dir = TempDir::new().expect("temp dir");
    let path = write_config(&dir, "call_timeout_ms = \"soon\"\n");

    let error = Config::load_from_iter(args_with_config(&path, &[]))
        .expect_err("non-numeric timeout must fail");

    assert!(
        !error.to_string().is_empty(),
        "configuration errors carry a description"
    );
}
