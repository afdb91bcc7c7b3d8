/// Maze sources.
///
/// ## Sources (priority order):
///   1. `game.maze_file` from config, if the file exists
///   2. The built-in dungeon
///
/// ## Maze format:
///   Fixed-width rows, blank lines ignored.
///   ' ' = Empty    '#' = Wall (pushable)    'X' = Exit (exactly one)

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::GameConfig;
use crate::domain::grid::{Grid, MazeError};

/// Built-in 73x23 dungeon. The exit sits in the bottom-left corner.
pub const DUNGEON: &str = r"
#########################################################################
#   #               #               #           #                   #   #
#   #   #########   #   #####   #########   #####   #####   #####   #   #
#               #       #   #           #           #   #   #       #   #
#########   #   #########   #########   #####   #   #   #   #########   #
#       #   #               #           #   #   #   #   #           #   #
#   #   #############   #   #   #########   #####   #   #########   #   #
#   #               #   #   #       #           #           #       #   #
#   #############   #####   #####   #   #####   #########   #   #####   #
#           #       #   #       #   #       #           #   #           #
#   #####   #####   #   #####   #   #########   #   #   #   #############
#       #       #   #   #       #       #       #   #   #       #       #
#############   #   #   #   #########   #   #####   #   #####   #####   #
#           #   #           #       #   #       #   #       #           #
#   #####   #   #########   #####   #   #####   #####   #############   #
#   #       #           #           #       #   #   #               #   #
#   #   #########   #   #####   #########   #   #   #############   #   #
#   #           #   #   #   #   #           #               #   #       #
#   #########   #   #   #   #####   #########   #########   #   #########
#   #       #   #   #           #           #   #       #               #
#   #   #####   #####   #####   #########   #####   #   #########   #   #
#   #                   #           #               #               #   #
# X #####################################################################
";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MazeSource {
    Embedded,
    File(PathBuf),
}

impl MazeSource {
    /// Pick the source named by config, falling back to the built-in dungeon
    /// when the configured file is missing.
    pub fn from_config(config: &GameConfig) -> MazeSource {
        match &config.maze_file {
            Some(path) if path.is_file() => MazeSource::File(path.clone()),
            Some(path) => {
                warn!(path = %path.display(), "maze file not found; using built-in dungeon");
                MazeSource::Embedded
            }
            None => MazeSource::Embedded,
        }
    }

    pub fn name(&self) -> String {
        match self {
            MazeSource::Embedded => "Built-in Dungeon".to_string(),
            MazeSource::File(path) => path
                .file_stem()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string(),
        }
    }
}

/// Read and parse the maze from `source`.
pub fn load_maze(source: &MazeSource) -> Result<Grid, MazeError> {
    let grid = match source {
        MazeSource::Embedded => Grid::parse(DUNGEON)?,
        MazeSource::File(path) => load_from_file(path)?,
    };
    info!(source = %source.name(), width = grid.width(), height = grid.height(), "maze loaded");
    Ok(grid)
}

fn load_from_file(path: &Path) -> Result<Grid, MazeError> {
    let text = std::fs::read_to_string(path).map_err(|source| MazeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Grid::parse(&text)
}
