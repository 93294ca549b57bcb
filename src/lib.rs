// ============================================
// HyperTree Writer - Сериализация леса гипердеревьев
// ============================================
//
// Поток данных в одну сторону:
// grid (лес) -> topology (дескриптор) -> output (контейнер)

pub mod config;
pub mod error;
pub mod grid;
pub mod output;
pub mod topology;

pub use config::{MaskPolicy, OutputFormat, WriterConfig};
pub use error::{ConfigError, EncodeError, GridError, WriteError};
pub use grid::{
    Axis, FieldArray, ForestDescription, GridParams, HyperTree, HyperTreeCursor, HyperTreeGrid,
    RootIndexing, TreeCursor, TreeSource,
};
pub use output::{write_grid, SnapshotFile, VhgWriter};
pub use topology::{encode, Descriptor, TopologyEncoder};
