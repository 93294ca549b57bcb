// ============================================
// Level Accumulators - Символы по уровням глубины
// ============================================

use crate::error::{EncodeError, EncodeResult};

/// Символ ветви
pub const BRANCH: u8 = b'1';
/// Символ листа
pub const LEAF: u8 = b'0';

/// Буфер символов на каждый уровень.
///
/// Создаётся заново на каждый вызов кодирования.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelAccumulators {
    levels: Vec<Vec<u8>>,
}

impl LevelAccumulators {
    pub fn new(max_levels: usize) -> Self {
        Self {
            levels: vec![Vec::new(); max_levels],
        }
    }

    /// Добавить символ узла дерева `tree` на глубине `depth`
    pub fn push(&mut self, tree: usize, depth: usize, symbol: u8) -> EncodeResult<()> {
        let max_levels = self.levels.len();
        let level = self.levels.get_mut(depth).ok_or(EncodeError::LevelOverflow {
            tree,
            depth,
            max_levels,
        })?;
        level.push(symbol);
        Ok(())
    }

    pub fn level(&self, depth: usize) -> &[u8] {
        self.levels.get(depth).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Дописать символы другого дерева в конец каждого уровня
    pub fn append(&mut self, other: LevelAccumulators) {
        if self.levels.len() < other.levels.len() {
            self.levels.resize(other.levels.len(), Vec::new());
        }
        for (level, mut symbols) in self.levels.iter_mut().zip(other.levels) {
            level.append(&mut symbols);
        }
    }

    pub fn level_sizes(&self) -> Vec<usize> {
        self.levels.iter().map(Vec::len).collect()
    }

    pub fn total_len(&self) -> usize {
        self.levels.iter().map(Vec::len).sum()
    }

    /// Склеить уровни по возрастанию глубины
    pub fn concat(&self) -> Vec<u8> {
        self.levels.concat()
    }
}
