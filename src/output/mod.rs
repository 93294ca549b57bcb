// ============================================
// Output - Контейнеры для дескриптора
// ============================================
// XML (.vhg) и бинарный снапшот (.vhgz).
// Оба сохраняют дескриптор побитно в одном и том же порядке.

mod header;
mod snapshot;
mod xml;

pub use header::{SnapshotHeader, MAGIC_NUMBER, SNAPSHOT_VERSION};
pub use snapshot::{LoadedSnapshot, SnapshotFile};
pub use xml::{VhgWriter, DATA_SET_NAME};

use std::path::Path;

use crate::config::{OutputFormat, WriterConfig};
use crate::error::{EncodeResult, WriteResult};
use crate::grid::TreeSource;
use crate::topology::{Descriptor, TopologyEncoder};

/// Дескриптор с учётом настроек (политика маски, параллельность)
pub(crate) fn encode_with<G: TreeSource + Sync>(config: &WriterConfig, grid: &G) -> EncodeResult<Descriptor> {
    let encoder = TopologyEncoder::from_config(config);
    if config.parallel {
        encoder.encode_parallel(grid)
    } else {
        encoder.encode(grid)
    }
}

/// Записать решётку в формате из настроек
pub fn write_grid<G: TreeSource + Sync>(
    grid: &G,
    path: impl AsRef<Path>,
    config: &WriterConfig,
) -> WriteResult<Descriptor> {
    match config.format {
        OutputFormat::Xml => VhgWriter::new(config.clone()).write(grid, path),
        OutputFormat::Snapshot => SnapshotFile::save(path, grid, config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{GridParams, HyperTree, HyperTreeGrid};

    #[test]
    fn test_both_formats_store_same_descriptor() {
        let mut grid = HyperTreeGrid::new(GridParams::uniform(2, 3, [2, 2, 1])).unwrap();
        for index in 0..4 {
            grid.set_tree(index, HyperTree::uniform(9, 1 + index % 2)).unwrap();
        }

        let dir = tempfile::tempdir().unwrap();
        let xml_path = dir.path().join("grid.vhg");
        let snapshot_path = dir.path().join("grid.vhgz");

        let xml_config = WriterConfig::default();
        let snapshot_config = WriterConfig {
            format: OutputFormat::Snapshot,
            parallel: true,
            ..WriterConfig::default()
        };

        let from_xml = write_grid(&grid, &xml_path, &xml_config).unwrap();
        let from_snapshot = write_grid(&grid, &snapshot_path, &snapshot_config).unwrap();
        assert_eq!(from_xml, from_snapshot);
        assert_eq!(SnapshotFile::load(&snapshot_path).unwrap().descriptor, from_xml);
        assert!(xml_path.exists());
    }
}
