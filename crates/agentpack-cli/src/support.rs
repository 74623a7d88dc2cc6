use agentpack_kernel::{DEFAULT_CONFIG_FILE, EngineConfig, EngineContext, LogFormat};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, fmt};

pub const LOG_ENV_VAR: &str = "AGENTPACK_LOG";
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Resolved per-invocation state shared by every subcommand.
pub struct Session {
    pub root: PathBuf,
    pub ctx: EngineContext,
}

/// Load config, install logging and build the engine context. Exits with
/// status 2 on any failure.
pub fn open_session(root: &str, config: Option<&str>, log_level: Option<&str>) -> Session {
    let root = PathBuf::from(root);
    let config_path = resolve_config_path(&root, config);
    let config = match config_path.as_deref() {
        Some(path) => EngineConfig::load(path).unwrap_or_else(|err| {
            eprintln!("error: {err}");
            std::process::exit(2);
        }),
        None => EngineConfig::default(),
    };

    let env_level = std::env::var(LOG_ENV_VAR).ok();
    let level = resolve_log_level(
        log_level,
        env_level.as_deref(),
        config.logging.level.as_deref(),
    );
    init_logging(&level, config.logging.format);

    let base_dir = config_path
        .as_deref()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .unwrap_or_else(|| root.clone());
    let ctx = EngineContext::from_config(&config, &base_dir).unwrap_or_else(|err| {
        eprintln!("error: {err}");
        std::process::exit(2);
    });
    tracing::debug!(
        root = %root.display(),
        config = ?config_path,
        documents_with_contract = ctx.required_keys.len(),
        "session ready"
    );
    Session { root, ctx }
}

/// `--config` when given, else `<root>/agentpack.toml` if it exists.
pub fn resolve_config_path(root: &Path, explicit: Option<&str>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(PathBuf::from(path));
    }
    let candidate = root.join(DEFAULT_CONFIG_FILE);
    candidate.is_file().then_some(candidate)
}

/// Flag, then environment, then config file, then `warn`. Blank values
/// fall through.
pub fn resolve_log_level(
    flag: Option<&str>,
    env: Option<&str>,
    config: Option<&str>,
) -> String {
    [flag, env, config]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|level| !level.is_empty())
        .unwrap_or(DEFAULT_LOG_LEVEL)
        .to_string()
}

pub fn init_logging(level: &str, format: LogFormat) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|err| {
        eprintln!("warning: invalid log filter `{level}` ({err}); using `{DEFAULT_LOG_LEVEL}`");
        EnvFilter::new(DEFAULT_LOG_LEVEL)
    });
    let builder = fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false);
    let installed = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    if let Err(err) = installed {
        eprintln!("warning: logging not initialized: {err}");
    }
}

pub fn print_json_or_exit<T: Serialize>(value: &T, what: &str) {
    let rendered = serde_json::to_string_pretty(value).unwrap_or_else(|err| {
        eprintln!("error: failed to render {what} JSON: {err}");
        std::process::exit(2);
    });
    println!("{rendered}");
}

pub fn pass_fail(passed: bool) -> &'static str {
    if passed { "pass" } else { "FAIL" }
}
