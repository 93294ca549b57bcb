// ============================================
// Descriptor - Один бит на узел леса
// ============================================
//
// 1 = ветвь, 0 = лист. Уровни по возрастанию глубины,
// внутри уровня деревья по возрастанию индекса.

use vob::Vob;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    bits: Vob,
    /// Число узлов на каждом уровне
    level_sizes: Vec<usize>,
}

impl Descriptor {
    pub(crate) fn new(bits: Vob, level_sizes: Vec<usize>) -> Self {
        debug_assert_eq!(bits.len(), level_sizes.iter().sum::<usize>());
        Self { bits, level_sizes }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<bool> {
        self.bits.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.bits.iter()
    }

    pub fn to_vec(&self) -> Vec<bool> {
        self.iter().collect()
    }

    pub fn as_vob(&self) -> &Vob {
        &self.bits
    }

    /// Число ветвей (единичных бит)
    pub fn branch_count(&self) -> usize {
        self.iter().filter(|&bit| bit).count()
    }

    #[inline]
    pub fn level_count(&self) -> usize {
        self.level_sizes.len()
    }

    pub fn level_sizes(&self) -> &[usize] {
        &self.level_sizes
    }

    /// Биты одного уровня
    pub fn level(&self, depth: usize) -> Option<Vec<bool>> {
        let size = *self.level_sizes.get(depth)?;
        let start: usize = self.level_sizes[..depth].iter().sum();
        Some((start..start + size).filter_map(|i| self.bits.get(i)).collect())
    }

    /// Упаковка в байты, старший бит первым, хвост добит нулями
    pub fn to_packed_bytes(&self) -> Vec<u8> {
        let mut bytes = vec![0u8; (self.len() + 7) / 8];
        for (i, bit) in self.iter().enumerate() {
            if bit {
                bytes[i / 8] |= 0x80 >> (i % 8);
            }
        }
        bytes
    }

    /// Обратно из байтов. None если размеры не сходятся.
    pub fn from_packed_bytes(bytes: &[u8], len: usize, level_sizes: Vec<usize>) -> Option<Self> {
        let byte_len = len.checked_add(7)? / 8;
        let total = level_sizes
            .iter()
            .try_fold(0usize, |acc, &size| acc.checked_add(size))?;
        if bytes.len() != byte_len || total != len {
            return None;
        }
        // from_bytes читает старший бит первым, как и to_packed_bytes
        let mut bits = Vob::from_bytes(bytes);
        bits.truncate(len);
        Some(Self::new(bits, level_sizes))
    }
}
