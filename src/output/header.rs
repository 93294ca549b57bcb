// ============================================
// Snapshot Header - Заголовок бинарного снапшота
// ============================================

use serde::{Deserialize, Serialize};

/// Магическое число "VHTG" в ASCII
pub const MAGIC_NUMBER: [u8; 4] = [0x56, 0x48, 0x54, 0x47];

/// Версия формата снапшота
pub const SNAPSHOT_VERSION: u32 = 1;

/// Заголовок фиксированного размера (bincode)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotHeader {
    /// Магическое число для валидации
    pub magic: [u8; 4],
    /// Версия формата
    pub version: u32,
    pub dimension: u8,
    pub branch_factor: u8,
    pub transposed_root_indexing: bool,
    /// Корневые ячейки по X, Y, Z
    pub grid_size: [u64; 3],
}

impl SnapshotHeader {
    pub fn new(dimension: u8, branch_factor: u8, transposed_root_indexing: bool, grid_size: [usize; 3]) -> Self {
        Self {
            magic: MAGIC_NUMBER,
            version: SNAPSHOT_VERSION,
            dimension,
            branch_factor,
            transposed_root_indexing,
            grid_size: grid_size.map(|n| n as u64),
        }
    }

    /// Проверка валидности заголовка
    pub fn is_valid(&self) -> bool {
        self.magic == MAGIC_NUMBER && self.version == SNAPSHOT_VERSION
    }
}

impl Default for SnapshotHeader {
    fn default() -> Self {
        Self::new(1, 2, false, [1, 1, 1])
    }
}
