// ============================================
// Bit Packer - Символы '1'/'0' в биты
// ============================================

use vob::Vob;

use crate::error::{EncodeError, EncodeResult};

use super::levels::{BRANCH, LEAF};

/// Упаковать последовательность символов.
///
/// Построитель пишет только BRANCH и LEAF, всё остальное значит
/// повреждённый буфер.
pub fn pack(symbols: &[u8]) -> EncodeResult<Vob> {
    let mut bits = Vob::with_capacity(symbols.len());
    for (position, &symbol) in symbols.iter().enumerate() {
        match symbol {
            BRANCH => bits.push(true),
            LEAF => bits.push(false),
            _ => return Err(EncodeError::CorruptSymbol { position, symbol }),
        }
    }
    Ok(bits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_symbols() {
        let bits = pack(b"10010").unwrap();
        assert_eq!(bits.len(), 5);
        assert_eq!(bits.iter().collect::<Vec<_>>(), vec![true, false, false, true, false]);
        assert!(pack(b"").unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_symbol() {
        assert_eq!(
            pack(b"1.0").unwrap_err(),
            EncodeError::CorruptSymbol { position: 1, symbol: b'.' }
        );
    }
}
