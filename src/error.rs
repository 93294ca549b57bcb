// ============================================
// Errors - Ошибки по слоям
// ============================================

use thiserror::Error;

use crate::grid::Axis;

/// Ошибки построения и валидации решётки
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    #[error("Dimension must be 1..=3, got {0}")]
    InvalidDimension(u8),

    #[error("Branch factor must be 2 or 3, got {0}")]
    InvalidBranchFactor(u8),

    #[error("Grid size along axis {axis} must be at least 1")]
    EmptyAxis { axis: usize },

    /// Корневые индексы адресуются через u32
    #[error("Grid {grid_size:?} has more root cells than u32 can address")]
    GridTooLarge { grid_size: [usize; 3] },

    /// Ось, не участвующая в размерности, должна иметь одну ячейку
    #[error("Axis {axis} is outside dimension {dimension} but has {cells} cells")]
    UnusedAxisRefined { axis: usize, dimension: u8, cells: usize },

    #[error("Axis {axis} expects {expected} coordinates, got {actual}")]
    CoordinateLength { axis: usize, expected: usize, actual: usize },

    #[error("Coordinates along axis {axis} are not strictly monotonic at position {position}")]
    NonMonotonicCoordinates { axis: usize, position: usize },

    #[error("Tree index {index} out of range (root cells: {count})")]
    TreeIndexOutOfRange { index: usize, count: usize },

    #[error("Root ({i}, {j}, {k}) outside grid {size:?}")]
    RootOutOfRange { i: usize, j: usize, k: usize, size: [usize; 3] },

    #[error("Tree has {actual} children per branch, grid expects {expected}")]
    ChildCountMismatch { expected: usize, actual: usize },

    #[error("Node {node} is not a leaf and cannot be subdivided")]
    AlreadySubdivided { node: u32 },

    #[error("Node {node} does not exist")]
    UnknownNode { node: u32 },

    #[error("Invalid tree shape: {0}")]
    InvalidShape(String),
}

/// Ошибки кодирования топологии.
///
/// Все структурные: ввод-вывода нет, повтор не имеет смысла.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("Tree index {index} is invalid (root cells: {count})")]
    InvalidIndex { index: usize, count: usize },

    #[error("Tree {tree}: node at depth {depth} is a leaf and has no children")]
    NotABranch { tree: usize, depth: usize },

    #[error("Tree {tree}: child slot {slot} out of range at depth {depth} ({child_count} children)")]
    InvalidChildSlot { tree: usize, depth: usize, slot: usize, child_count: usize },

    #[error("Tree {tree}: depth {depth} exceeds declared level count {max_levels}")]
    LevelOverflow { tree: usize, depth: usize, max_levels: usize },

    #[error("Corrupt symbol {symbol:#04x} at descriptor position {position}")]
    CorruptSymbol { position: usize, symbol: u8 },
}

/// Ошибки записи контейнера
#[derive(Error, Debug)]
pub enum WriteError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Serialize error: {0}")]
    Serialize(String),

    #[error("Deserialize error: {0}")]
    Deserialize(String),

    #[error("Compression error: {0}")]
    Compression(String),

    #[error("Invalid magic number")]
    InvalidMagic,

    #[error("Unsupported snapshot version {0}")]
    UnsupportedVersion(u32),

    /// Ось с одной координатой: нет ни начала, ни шага
    #[error("Axis {axis:?} needs at least two coordinates")]
    MissingCoordinates { axis: Axis },

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// Ошибки загрузки конфигурации и описания леса
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Grid(#[from] GridError),
}

pub type GridResult<T> = std::result::Result<T, GridError>;
pub type EncodeResult<T> = std::result::Result<T, EncodeError>;
pub type WriteResult<T> = std::result::Result<T, WriteError>;
