// ============================================
// Root Indexing - Линейный индекс <-> (i, j, k)
// ============================================
//
// Без транспонирования быстрее всего меняется i (ось X),
// с транспонированием быстрее всего меняется k (ось Z).

use ndshape::{RuntimeShape, Shape};

use crate::error::{GridError, GridResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RootIndexing {
    grid_size: [u32; 3],
    transposed: bool,
}

impl RootIndexing {
    /// Ошибка, если число ячеек по оси или всего не влезает в u32
    pub fn new(grid_size: [usize; 3], transposed: bool) -> GridResult<Self> {
        let too_large = GridError::GridTooLarge { grid_size };
        let [nx, ny, nz] = grid_size;
        let sizes = [
            u32::try_from(nx).map_err(|_| too_large.clone())?,
            u32::try_from(ny).map_err(|_| too_large.clone())?,
            u32::try_from(nz).map_err(|_| too_large.clone())?,
        ];
        sizes
            .iter()
            .try_fold(1u32, |acc, &n| acc.checked_mul(n))
            .ok_or(too_large)?;
        Ok(Self {
            grid_size: sizes,
            transposed,
        })
    }

    #[inline]
    fn shape(&self) -> RuntimeShape<u32, 3> {
        let [nx, ny, nz] = self.grid_size;
        if self.transposed {
            RuntimeShape::<u32, 3>::new([nz, ny, nx])
        } else {
            RuntimeShape::<u32, 3>::new([nx, ny, nz])
        }
    }

    /// Общее число корневых ячеек
    #[inline]
    pub fn root_count(&self) -> usize {
        self.grid_size.iter().map(|&n| n as usize).product()
    }

    /// (i, j, k) по линейному индексу
    pub fn to_ijk(&self, index: usize) -> Option<[usize; 3]> {
        if index >= self.root_count() {
            return None;
        }
        let p = self.shape().delinearize(index as u32);
        let [i, j, k] = if self.transposed { [p[2], p[1], p[0]] } else { p };
        Some([i as usize, j as usize, k as usize])
    }

    /// Линейный индекс по (i, j, k)
    pub fn to_index(&self, ijk: [usize; 3]) -> Option<usize> {
        let inside = ijk
            .iter()
            .zip(self.grid_size.iter())
            .all(|(&c, &n)| c < n as usize);
        if !inside {
            return None;
        }
        let [i, j, k] = ijk.map(|c| c as u32);
        let p = if self.transposed { [k, j, i] } else { [i, j, k] };
        Some(self.shape().linearize(p) as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_x_fastest_by_default() {
        let indexing = RootIndexing::new([3, 2, 2], false).unwrap();
        assert_eq!(indexing.root_count(), 12);
        assert_eq!(indexing.to_ijk(0), Some([0, 0, 0]));
        assert_eq!(indexing.to_ijk(1), Some([1, 0, 0]));
        assert_eq!(indexing.to_ijk(3), Some([0, 1, 0]));
        assert_eq!(indexing.to_ijk(7), Some([1, 0, 1]));
        assert_eq!(indexing.to_index([2, 1, 1]), Some(11));
        assert_eq!(indexing.to_ijk(12), None);
    }

    #[test]
    fn test_transposed_is_z_fastest() {
        let indexing = RootIndexing::new([3, 2, 2], true).unwrap();
        assert_eq!(indexing.to_ijk(1), Some([0, 0, 1]));
        assert_eq!(indexing.to_ijk(2), Some([0, 1, 0]));
        assert_eq!(indexing.to_ijk(4), Some([1, 0, 0]));
        assert_eq!(indexing.to_index([2, 1, 1]), Some(11));
        assert_eq!(indexing.to_index([1, 0, 1]), Some(5));
    }

    #[test]
    fn test_out_of_range_coordinates() {
        let indexing = RootIndexing::new([2, 1, 1], false).unwrap();
        assert_eq!(indexing.to_index([2, 0, 0]), None);
        assert_eq!(indexing.to_index([0, 1, 0]), None);
        for index in 0..indexing.root_count() {
            let ijk = indexing.to_ijk(index).unwrap();
            assert_eq!(indexing.to_index(ijk), Some(index));
        }
    }

    #[test]
    fn test_sizes_beyond_u32_rejected() {
        let wide = u32::MAX as usize + 1;
        assert_eq!(
            RootIndexing::new([wide, 1, 1], false),
            Err(GridError::GridTooLarge { grid_size: [wide, 1, 1] })
        );
        assert_eq!(
            RootIndexing::new([1, 1, wide], true),
            Err(GridError::GridTooLarge { grid_size: [1, 1, wide] })
        );
        // Каждая ось влезает, произведение нет
        assert_eq!(
            RootIndexing::new([65536, 65536, 1], false),
            Err(GridError::GridTooLarge { grid_size: [65536, 65536, 1] })
        );
        assert!(RootIndexing::new([65536, 65535, 1], false).is_ok());
    }
}
