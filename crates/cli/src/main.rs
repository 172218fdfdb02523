mod config;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{Parser, ValueEnum};

use arjun_server::{
    DEFAULT_EDITOR_HOST, DEFAULT_EDITOR_PORT, DEFAULT_FETCH_TIMEOUT, EditorConfig, HttpLinkFetcher, Router, RuntimeMode,
    ScanMode, bind_available, detect_content_dir, detect_framework, serve,
};
use config::{CONFIG_FILE_NAME, FileConfig};

#[derive(Parser, Debug)]
#[command(
    name = "arjun",
    version,
    about = "Development-only block editor for the markdown files in a project"
)]
struct Cli {
    /// Content directory (default: scan the entire project)
    content_dir: Option<PathBuf>,

    /// Content directory, same as the positional argument
    #[arg(short = 'c', long = "content")]
    content: Option<PathBuf>,

    /// Preferred port; the next free one is used when it is busy
    #[arg(short, long)]
    port: Option<u16>,

    /// Where markdown files are looked up
    #[arg(long, value_enum)]
    scan: Option<ScanArg>,

    /// Interface to listen on
    #[arg(long)]
    host: Option<String>,

    /// Config file
    #[arg(long, default_value = CONFIG_FILE_NAME)]
    config: PathBuf,

    /// Worker threads handling requests
    #[arg(long, default_value_t = 4)]
    workers: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ScanArg {
    ProjectWide,
    ContentOnly,
}

impl From<ScanArg> for ScanMode {
    fn from(arg: ScanArg) -> Self {
        match arg {
            ScanArg::ProjectWide => ScanMode::ProjectWide,
            ScanArg::ContentOnly => ScanMode::ContentOnly,
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mode = RuntimeMode::from_env();
    if mode.is_production() {
        bail!("arjun only runs in development; production environment detected");
    }

    let file = FileConfig::load_from_path(&cli.config)?.unwrap_or_default();
    let project_root = PathBuf::from(".");
    let mut config = editor_config(&cli, &file, &project_root);
    config.framework = detect_framework(&project_root);
    if let Some(framework) = config.framework {
        log::info!("detected {} project", framework.name());
    }

    let host = config.editor_host.clone();
    let preferred = config.editor_port;
    let (listener, port) = bind_available(&host, preferred)
        .with_context(|| format!("no port available from {preferred}"))?;
    if port != preferred {
        log::warn!("port {preferred} was busy, using {port} instead");
    }
    config.editor_port = port;

    match config.scan_mode {
        ScanMode::ProjectWide => log::info!("scanning entire project for markdown files"),
        ScanMode::ContentOnly => {
            log::info!("using content directory {}", config.content_dir.display())
        }
    }
    log::info!("editor dashboard: http://{host}:{port}");
    log::info!("edit a file at http://{host}:{port}/<slug>{}", config.editor_path);
    log::info!("widget script: http://{host}:{port}/widget.js");

    let fetcher = HttpLinkFetcher::new(DEFAULT_FETCH_TIMEOUT)?;
    let router = Arc::new(Router::new(config, mode, fetcher));
    serve(router, listener, cli.workers)?;
    Ok(())
}

/// Merges arguments over the config file over defaults.
fn editor_config(cli: &Cli, file: &FileConfig, project_root: &Path) -> EditorConfig {
    let requested = cli
        .content_dir
        .clone()
        .or_else(|| cli.content.clone())
        .or_else(|| file.content_dir.clone());
    let forced = cli.scan.map(ScanMode::from).or(file.scan);
    let scan_mode = resolve_scan_mode(forced, requested.as_deref());
    if let (Some(dir), ScanMode::ProjectWide) = (&requested, scan_mode) {
        if !dir.is_dir() {
            log::warn!(
                "content directory {} not found, scanning entire project",
                dir.display()
            );
        }
    }

    let defaults = EditorConfig::default();
    EditorConfig {
        content_dir: requested.unwrap_or_else(|| detect_content_dir(project_root)),
        project_root: project_root.to_path_buf(),
        editor_path: file.editor_path.clone().unwrap_or(defaults.editor_path),
        allowed_extensions: file
            .allowed_extensions
            .clone()
            .unwrap_or(defaults.allowed_extensions),
        framework: None,
        editor_host: cli
            .host
            .clone()
            .or_else(|| file.host.clone())
            .unwrap_or_else(|| DEFAULT_EDITOR_HOST.to_string()),
        editor_port: cli.port.or(file.port).unwrap_or(DEFAULT_EDITOR_PORT),
        scan_mode,
        auto_save: file.auto_save.unwrap_or(defaults.auto_save),
        save_delay_ms: file.save_delay.unwrap_or(defaults.save_delay_ms),
    }
}

/// Content-only needs an existing directory; a forced project-wide scan
/// always wins; otherwise an existing directory selects content-only.
fn resolve_scan_mode(forced: Option<ScanMode>, content_dir: Option<&Path>) -> ScanMode {
    let dir_exists = content_dir.is_some_and(Path::is_dir);
    match forced {
        Some(ScanMode::ProjectWide) => ScanMode::ProjectWide,
        _ if dir_exists => ScanMode::ContentOnly,
        _ => ScanMode::ProjectWide,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("arjun").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn scan_mode_resolution() {
        let dir = TempDir::new().unwrap();
        let existing = Some(dir.path());
        let missing = Some(Path::new("/no/such/dir"));

        assert_eq!(
            resolve_scan_mode(Some(ScanMode::ContentOnly), existing),
            ScanMode::ContentOnly
        );
        assert_eq!(
            resolve_scan_mode(Some(ScanMode::ContentOnly), missing),
            ScanMode::ProjectWide
        );
        assert_eq!(
            resolve_scan_mode(Some(ScanMode::ProjectWide), existing),
            ScanMode::ProjectWide
        );
        assert_eq!(resolve_scan_mode(None, existing), ScanMode::ContentOnly);
        assert_eq!(resolve_scan_mode(None, missing), ScanMode::ProjectWide);
        assert_eq!(resolve_scan_mode(None, None), ScanMode::ProjectWide);
    }

    #[test]
    fn parses_arguments() {
        let parsed = cli(&["docs", "-p", "4000", "--scan", "content-only", "--host", "0.0.0.0"]);
        assert_eq!(parsed.content_dir, Some(PathBuf::from("docs")));
        assert_eq!(parsed.port, Some(4000));
        assert_eq!(parsed.scan, Some(ScanArg::ContentOnly));
        assert_eq!(parsed.host.as_deref(), Some("0.0.0.0"));
        assert_eq!(parsed.config, PathBuf::from("arjun.toml"));
    }

    #[test]
    fn arguments_override_config_file() {
        let dir = TempDir::new().unwrap();
        let content = dir.path().join("content");
        std::fs::create_dir_all(&content).unwrap();

        let file = FileConfig {
            content_dir: Some(PathBuf::from("/from/file")),
            port: Some(5000),
            host: Some("127.0.0.1".to_string()),
            auto_save: Some(false),
            ..FileConfig::default()
        };
        let args = cli(&["-c", content.to_str().unwrap(), "--port", "4100"]);
        let config = editor_config(&args, &file, dir.path());

        assert_eq!(config.content_dir, content);
        assert_eq!(config.editor_port, 4100);
        assert_eq!(config.editor_host, "127.0.0.1");
        assert_eq!(config.scan_mode, ScanMode::ContentOnly);
        assert!(!config.auto_save);
        assert_eq!(config.save_delay_ms, 50);
    }

    #[test]
    fn defaults_scan_the_project() {
        let dir = TempDir::new().unwrap();
        let config = editor_config(&cli(&[]), &FileConfig::default(), dir.path());
        assert_eq!(config.scan_mode, ScanMode::ProjectWide);
        assert_eq!(config.root_dir(), dir.path());
        assert_eq!(config.editor_port, DEFAULT_EDITOR_PORT);
        assert_eq!(config.editor_host, "localhost");
        assert_eq!(config.content_dir, dir.path().join("content"));
    }
}
