// ============================================
// Snapshot File - Бинарный контейнер .vhgz
// ============================================
// Заголовок bincode, затем тело bincode, сжатое ZSTD.
// Дескриптор хранится упакованным (старший бит первым) + длина в битах.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::WriterConfig;
use crate::error::{WriteError, WriteResult};
use crate::grid::{Axis, FieldArray, TreeSource};
use crate::topology::Descriptor;

use super::encode_with;
use super::header::{SnapshotHeader, MAGIC_NUMBER, SNAPSHOT_VERSION};

pub const DEFAULT_EXTENSION: &str = "vhgz";

/// Тело файла (сжимается ZSTD)
#[derive(Debug, Serialize, Deserialize)]
struct SnapshotBody {
    coordinates: [Vec<f64>; 3],
    material_mask_index: Option<Vec<u64>>,
    /// Длина дескриптора в битах
    descriptor_len: u64,
    level_sizes: Vec<u64>,
    descriptor: Vec<u8>,
    #[serde(default)]
    point_data: Vec<FieldArray>,
    #[serde(default)]
    field_data: Vec<FieldArray>,
}

/// Результат загрузки снапшота (без восстановления деревьев)
#[derive(Debug)]
pub struct LoadedSnapshot {
    pub header: SnapshotHeader,
    pub coordinates: [Vec<f64>; 3],
    pub material_mask_index: Option<Vec<u64>>,
    pub descriptor: Descriptor,
    pub point_data: Vec<FieldArray>,
    pub field_data: Vec<FieldArray>,
}

pub struct SnapshotFile;

impl SnapshotFile {
    /// Сохранить решётку в файл
    pub fn save<G: TreeSource + Sync>(
        path: impl AsRef<Path>,
        grid: &G,
        config: &WriterConfig,
    ) -> WriteResult<Descriptor> {
        // 1. Кодируем до открытия файла
        let descriptor = encode_with(config, grid)?;

        let path = path.as_ref();
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        // 2. Заголовок
        let header = SnapshotHeader::new(
            grid.dimension(),
            grid.branch_factor(),
            grid.transposed_root_indexing(),
            grid.grid_size(),
        );
        let header_bytes = bincode::serialize(&header)
            .map_err(|e| WriteError::Serialize(e.to_string()))?;
        writer.write_all(&header_bytes)?;

        // 3. Тело
        let body = SnapshotBody {
            coordinates: Axis::ALL.map(|axis| grid.coordinates(axis).to_vec()),
            material_mask_index: grid.material_mask_index().map(<[u64]>::to_vec),
            descriptor_len: descriptor.len() as u64,
            level_sizes: descriptor.level_sizes().iter().map(|&n| n as u64).collect(),
            descriptor: descriptor.to_packed_bytes(),
            point_data: grid.point_data().to_vec(),
            field_data: grid.field_data().to_vec(),
        };
        let body_bytes = bincode::serialize(&body)
            .map_err(|e| WriteError::Serialize(e.to_string()))?;

        let compressed = zstd::encode_all(&body_bytes[..], config.compression_level)
            .map_err(|e| WriteError::Compression(e.to_string()))?;
        writer.write_all(&compressed)?;

        writer.flush()?;
        log::info!(
            "Wrote snapshot {} ({} descriptor bits, {} compressed bytes)",
            path.display(),
            descriptor.len(),
            compressed.len()
        );
        Ok(descriptor)
    }

    /// Загрузить снапшот
    pub fn load(path: impl AsRef<Path>) -> WriteResult<LoadedSnapshot> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);

        // 1. Заголовок
        let header_size = bincode::serialized_size(&SnapshotHeader::default())
            .map_err(|e| WriteError::Deserialize(e.to_string()))? as usize;
        let mut header_bytes = vec![0u8; header_size];
        reader.read_exact(&mut header_bytes)?;

        let header: SnapshotHeader = bincode::deserialize(&header_bytes)
            .map_err(|e| WriteError::Deserialize(e.to_string()))?;

        if header.magic != MAGIC_NUMBER {
            return Err(WriteError::InvalidMagic);
        }
        if header.version != SNAPSHOT_VERSION {
            return Err(WriteError::UnsupportedVersion(header.version));
        }

        // 2. Тело
        let mut compressed = Vec::new();
        reader.read_to_end(&mut compressed)?;

        let body_bytes = zstd::decode_all(&compressed[..])
            .map_err(|e| WriteError::Compression(e.to_string()))?;

        let body: SnapshotBody = bincode::deserialize(&body_bytes)
            .map_err(|e| WriteError::Deserialize(e.to_string()))?;

        let descriptor_len = to_usize(body.descriptor_len)?;
        let level_sizes = body
            .level_sizes
            .iter()
            .map(|&n| to_usize(n))
            .collect::<WriteResult<Vec<_>>>()?;
        let descriptor = Descriptor::from_packed_bytes(&body.descriptor, descriptor_len, level_sizes)
            .ok_or_else(|| WriteError::Deserialize("descriptor length mismatch".to_string()))?;

        Ok(LoadedSnapshot {
            header,
            coordinates: body.coordinates,
            material_mask_index: body.material_mask_index,
            descriptor,
            point_data: body.point_data,
            field_data: body.field_data,
        })
    }
}

fn to_usize(value: u64) -> WriteResult<usize> {
    usize::try_from(value)
        .map_err(|_| WriteError::Deserialize(format!("size {} does not fit in usize", value)))
}
