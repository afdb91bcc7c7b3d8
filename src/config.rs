/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::PathBuf;

// ── Public Config Struct ──

#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    pub trolls: usize,
    pub seed: Option<u64>,
    pub maze_file: Option<PathBuf>,
    pub log: LogConfig,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LogConfig {
    /// Log destination. `None` disables logging (the terminal belongs to the renderer).
    pub file: Option<PathBuf>,
    pub level: String,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    game: TomlGame,
    #[serde(default)]
    log: TomlLog,
}

#[derive(Deserialize, Debug)]
struct TomlGame {
    #[serde(default = "default_trolls")]
    trolls: usize,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    maze_file: Option<String>,
}

#[derive(Deserialize, Debug)]
struct TomlLog {
    #[serde(default)]
    file: Option<String>,
    #[serde(default = "default_log_level")]
    level: String,
}

// ── Defaults ──

fn default_trolls() -> usize { 3 }
fn default_log_level() -> String { "info".into() }

impl Default for TomlGame {
    fn default() -> Self {
        TomlGame {
            trolls: default_trolls(),
            seed: None,
            maze_file: None,
        }
    }
}

impl Default for TomlLog {
    fn default() -> Self {
        TomlLog {
            file: None,
            level: default_log_level(),
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig::from_toml(TomlConfig::default(), &[])
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        let toml_cfg = load_toml(&search_dirs);
        GameConfig::from_toml(toml_cfg, &search_dirs)
    }

    /// Parse config text directly. Errors fall back to defaults.
    #[cfg(test)]
    pub fn parse(text: &str) -> Self {
        match toml::from_str::<TomlConfig>(text) {
            Ok(cfg) => GameConfig::from_toml(cfg, &[]),
            Err(e) => {
                eprintln!("Warning: config parse error: {e}");
                GameConfig::default()
            }
        }
    }

    fn from_toml(cfg: TomlConfig, search_dirs: &[PathBuf]) -> Self {
        GameConfig {
            trolls: cfg.game.trolls,
            seed: cfg.game.seed,
            maze_file: cfg.game.maze_file.map(|p| resolve_path(&p, search_dirs)),
            log: LogConfig {
                file: cfg.log.file.map(PathBuf::from),
                level: cfg.log.level,
            },
        }
    }
}

/// Absolute paths are kept; relative ones are looked up in the candidate
/// dirs and default to CWD-relative.
fn resolve_path(path: &str, search_dirs: &[PathBuf]) -> PathBuf {
    let p = PathBuf::from(path);
    if p.is_absolute() {
        return p;
    }
    search_dirs.iter()
        .map(|d| d.join(path))
        .find(|c| c.is_file())
        .unwrap_or(p)
}

/// Candidate directories to search: exe dir + CWD + data home (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    // 3. XDG data home (~/.local/share/trollmaze)
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/trollmaze");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        eprintln!("Warning: config.toml parse error: {e}");
                        eprintln!("Using default settings.");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    eprintln!("Warning: could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}
