// ============================================
// Writer Config - Настройки записи из JSON
// ============================================

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Что делать с деревьями, отсутствующими в MaterialMaskIndex
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaskPolicy {
    /// Обходить все хранимые деревья (маска только передаётся дальше)
    #[default]
    Traverse,
    /// Кодировать только деревья из индекса маски
    Skip,
}

/// Формат контейнера
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// XML документ .vhg
    #[default]
    Xml,
    /// bincode + zstd
    Snapshot,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Xml => "vhg",
            OutputFormat::Snapshot => "vhgz",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterConfig {
    pub mask_policy: MaskPolicy,
    pub format: OutputFormat,
    /// Уровень ZSTD для снапшотов
    pub compression_level: i32,
    /// Строить дескриптор на пуле rayon
    pub parallel: bool,
    /// Ширина отступа в XML
    pub indent: usize,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            mask_policy: MaskPolicy::Traverse,
            format: OutputFormat::Xml,
            compression_level: 3,
            parallel: false,
            indent: 2,
        }
    }
}

impl WriterConfig {
    /// Загрузить настройки из JSON строки
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Загрузить настройки из файла
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = WriterConfig::from_json_str(r#"{ "mask_policy": "skip", "parallel": true }"#).unwrap();
        assert_eq!(config.mask_policy, MaskPolicy::Skip);
        assert!(config.parallel);
        assert_eq!(config.format, OutputFormat::Xml);
        assert_eq!(config.compression_level, 3);
        assert_eq!(config.indent, 2);
    }

    #[test]
    fn test_unknown_policy_rejected() {
        let err = WriterConfig::from_json_str(r#"{ "mask_policy": "drop" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("writer.json");
        fs::write(&path, r#"{ "format": "snapshot", "compression_level": 9 }"#).unwrap();

        let config = WriterConfig::load(&path).unwrap();
        assert_eq!(config.format, OutputFormat::Snapshot);
        assert_eq!(config.format.extension(), "vhgz");
        assert_eq!(config.compression_level, 9);
    }
}
