// ============================================
// Topology Encoder - Обход всего леса
// ============================================
//
// Деревья обходятся по возрастанию индекса в общие аккумуляторы.
// Параллельный вариант строит каждое дерево отдельно и сливает
// результаты строго по возрастанию индекса: иначе дескриптор
// испортится без каких-либо признаков при записи.

use std::collections::HashSet;

use rayon::prelude::*;

use crate::config::{MaskPolicy, WriterConfig};
use crate::error::EncodeResult;
use crate::grid::TreeSource;

use super::builder::build_descriptor;
use super::descriptor::Descriptor;
use super::levels::LevelAccumulators;
use super::packer::pack;

#[derive(Debug, Clone, Copy, Default)]
pub struct TopologyEncoder {
    mask_policy: MaskPolicy,
}

impl TopologyEncoder {
    pub fn new(mask_policy: MaskPolicy) -> Self {
        Self { mask_policy }
    }

    pub fn from_config(config: &WriterConfig) -> Self {
        Self::new(config.mask_policy)
    }

    /// Построить дескриптор. Любая ошибка отменяет результат целиком.
    pub fn encode<G: TreeSource>(&self, grid: &G) -> EncodeResult<Descriptor> {
        let max_levels = grid.number_of_levels();
        let trees = self.selected_trees(grid);
        let mut levels = LevelAccumulators::new(max_levels);

        for &tree_index in &trees {
            log::trace!("Encoding tree {}", tree_index);
            let cursor = grid.cursor_at_root(tree_index)?;
            build_descriptor(&cursor, 0, &mut levels)?;
        }

        Self::finish(levels, trees.len())
    }

    /// То же самое на пуле rayon. Результат побитно совпадает с encode().
    pub fn encode_parallel<G: TreeSource + Sync>(&self, grid: &G) -> EncodeResult<Descriptor> {
        let max_levels = grid.number_of_levels();
        let trees = self.selected_trees(grid);

        // collect сохраняет порядок входа
        let partials: Vec<LevelAccumulators> = trees
            .par_iter()
            .map(|&tree_index| -> EncodeResult<LevelAccumulators> {
                let mut own = LevelAccumulators::new(max_levels);
                let cursor = grid.cursor_at_root(tree_index)?;
                build_descriptor(&cursor, 0, &mut own)?;
                Ok(own)
            })
            .collect::<EncodeResult<_>>()?;

        let mut levels = LevelAccumulators::new(max_levels);
        for partial in partials {
            levels.append(partial);
        }

        Self::finish(levels, trees.len())
    }

    fn finish(levels: LevelAccumulators, tree_count: usize) -> EncodeResult<Descriptor> {
        let level_sizes = levels.level_sizes();
        let bits = pack(&levels.concat())?;
        let descriptor = Descriptor::new(bits, level_sizes);

        log::debug!(
            "Encoded {} trees over {} levels into {} bits",
            tree_count,
            descriptor.level_count(),
            descriptor.len()
        );
        Ok(descriptor)
    }

    /// Индексы деревьев для кодирования с учётом политики маски
    fn selected_trees<G: TreeSource>(&self, grid: &G) -> Vec<usize> {
        match (self.mask_policy, grid.material_mask_index()) {
            (MaskPolicy::Skip, Some(mask)) => {
                let active: HashSet<u64> = mask.iter().copied().collect();
                grid.iterate_trees()
                    .filter(|&index| active.contains(&(index as u64)))
                    .collect()
            }
            (MaskPolicy::Skip, None) => {
                log::warn!("Mask policy is `skip` but the grid has no material mask index, encoding every tree");
                grid.iterate_trees().collect()
            }
            (MaskPolicy::Traverse, _) => grid.iterate_trees().collect(),
        }
    }
}

/// Дескриптор с политикой по умолчанию (обходить все деревья)
pub fn encode<G: TreeSource>(grid: &G) -> EncodeResult<Descriptor> {
    TopologyEncoder::default().encode(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EncodeError;
    use crate::grid::{GridParams, HyperTree, HyperTreeGrid};

    fn grid_2d(cells: [usize; 3]) -> HyperTreeGrid {
        HyperTreeGrid::new(GridParams::uniform(2, 2, cells)).unwrap()
    }

    #[test]
    fn test_single_leaf_forest() {
        let mut grid = grid_2d([1, 1, 1]);
        grid.set_tree(0, grid.new_tree()).unwrap();

        let descriptor = encode(&grid).unwrap();
        assert_eq!(descriptor.len(), 1);
        assert_eq!(descriptor.to_vec(), vec![false]);
    }

    #[test]
    fn test_uniform_one_level_refinement() {
        let mut grid = grid_2d([1, 1, 1]);
        grid.set_tree(0, HyperTree::uniform(4, 2)).unwrap();

        let descriptor = encode(&grid).unwrap();
        assert_eq!(descriptor.to_vec(), vec![true, false, false, false, false]);
        assert_eq!(descriptor.level_sizes(), &[1, 4]);
    }

    #[test]
    fn test_multi_tree_ordering() {
        let mut grid = grid_2d([2, 1, 1]);
        grid.set_tree(0, grid.new_tree()).unwrap();
        grid.set_tree(1, HyperTree::uniform(4, 2)).unwrap();

        let descriptor = encode(&grid).unwrap();
        // уровень 0: лист дерева 0, затем корень дерева 1
        assert_eq!(descriptor.level(0), Some(vec![false, true]));
        // уровень 1 целиком из детей дерева 1
        assert_eq!(descriptor.level(1), Some(vec![false; 4]));
        assert_eq!(descriptor.to_vec(), vec![false, true, false, false, false, false]);
    }

    #[test]
    fn test_levels_interleave_across_trees() {
        // Дерево 0 глубже дерева 1: уровень 1 = дети 0, затем дети 1
        let mut grid = grid_2d([2, 1, 1]);
        let mut deep = grid.new_tree();
        let first = deep.subdivide(HyperTree::ROOT).unwrap();
        deep.subdivide(first + 3).unwrap();
        grid.set_tree(0, deep).unwrap();
        grid.set_tree(1, HyperTree::uniform(4, 2)).unwrap();

        let descriptor = encode(&grid).unwrap();
        assert_eq!(descriptor.level_sizes(), &[2, 8, 4]);
        assert_eq!(
            descriptor.level(1),
            Some(vec![false, false, false, true, false, false, false, false])
        );
    }

    #[test]
    fn test_bit_count_matches_nodes_and_levels() {
        let mut grid = grid_2d([2, 2, 1]);
        grid.set_tree(0, HyperTree::uniform(4, 3)).unwrap();
        let mut sparse = grid.new_tree();
        let first = sparse.subdivide(HyperTree::ROOT).unwrap();
        let second = sparse.subdivide(first).unwrap();
        sparse.subdivide(second + 2).unwrap();
        grid.set_tree(2, sparse).unwrap();
        grid.set_tree(3, grid.new_tree()).unwrap();

        let descriptor = encode(&grid).unwrap();
        assert_eq!(descriptor.len(), grid.node_count());

        // Разбиение по уровням совпадает с прямым подсчётом по глубине
        let mut expected = vec![0; 4];
        for index in [0, 2, 3] {
            for (depth, count) in grid.tree(index).unwrap().nodes_per_level().into_iter().enumerate() {
                expected[depth] += count;
            }
        }
        assert_eq!(descriptor.level_sizes(), expected.as_slice());

        let branches: usize = [0, 2, 3]
            .iter()
            .map(|&i| {
                let tree = grid.tree(i).unwrap();
                tree.node_count() - tree.leaf_count()
            })
            .sum();
        assert_eq!(descriptor.branch_count(), branches);
    }

    #[test]
    fn test_depth_overflow_rejected() {
        let mut grid = grid_2d([2, 1, 1]);
        grid.set_tree(0, grid.new_tree()).unwrap();
        grid.set_tree(1, HyperTree::uniform(4, 3)).unwrap();
        grid.set_number_of_levels(2);

        let err = encode(&grid).unwrap_err();
        assert_eq!(err, EncodeError::LevelOverflow { tree: 1, depth: 2, max_levels: 2 });
        assert_eq!(
            TopologyEncoder::default().encode_parallel(&grid).unwrap_err(),
            err
        );
    }

    #[test]
    fn test_deterministic_and_parallel_identical() {
        let mut grid = grid_2d([3, 3, 1]);
        for index in 0..9 {
            let tree = HyperTree::uniform(4, 1 + index % 3);
            grid.set_tree(index, tree).unwrap();
        }
        grid.remove_tree(4);

        let encoder = TopologyEncoder::default();
        let first = encoder.encode(&grid).unwrap();
        let second = encoder.encode(&grid).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.to_packed_bytes(), second.to_packed_bytes());
        assert_eq!(encoder.encode_parallel(&grid).unwrap(), first);
    }

    #[test]
    fn test_mask_policy() {
        let mut grid = grid_2d([2, 1, 1]);
        grid.set_tree(0, HyperTree::uniform(4, 2)).unwrap();
        grid.set_tree(1, grid.new_tree()).unwrap();

        // Без маски skip ведёт себя как traverse
        let skip = TopologyEncoder::new(MaskPolicy::Skip);
        assert_eq!(skip.encode(&grid).unwrap().len(), 6);

        grid.set_material_mask_index(vec![1]);
        assert_eq!(skip.encode(&grid).unwrap().to_vec(), vec![false]);
        assert_eq!(skip.encode_parallel(&grid).unwrap().to_vec(), vec![false]);

        let traverse = TopologyEncoder::new(MaskPolicy::Traverse);
        assert_eq!(traverse.encode(&grid).unwrap().len(), 6);
    }

    #[test]
    fn test_empty_forest() {
        let grid = grid_2d([2, 1, 1]);
        let descriptor = encode(&grid).unwrap();
        assert!(descriptor.is_empty());
        assert_eq!(descriptor.level_count(), 0);
    }
}
