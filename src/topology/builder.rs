// ============================================
// Descriptor Builder - Обход в глубину, запись по уровням
// ============================================
//
// Узел пишет свой символ на свой уровень ДО спуска к детям,
// дети обходятся строго в порядке слотов. Поэтому на каждом уровне
// символы идут слева направо, как при обходе в ширину, без очереди.
// Глубина рекурсии ограничена числом уровней (LevelOverflow).

use crate::error::EncodeResult;
use crate::grid::HyperTreeCursor;

use super::levels::{LevelAccumulators, BRANCH, LEAF};

/// Записать поддерево под курсором в общие аккумуляторы
pub fn build_descriptor<C: HyperTreeCursor>(
    cursor: &C,
    depth: usize,
    levels: &mut LevelAccumulators,
) -> EncodeResult<()> {
    if cursor.is_leaf() {
        return levels.push(cursor.tree_index(), depth, LEAF);
    }

    levels.push(cursor.tree_index(), depth, BRANCH)?;

    for slot in 0..cursor.child_count() {
        let child = cursor.descend(slot)?;
        build_descriptor(&child, depth + 1, levels)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EncodeError;
    use crate::grid::{HyperTree, TreeCursor};

    #[test]
    fn test_sibling_order_ignores_subtree_depth() {
        // Корень -> [A лист, B ветвь с двумя листьями], 1D, branch factor 2
        let mut tree = HyperTree::new(2);
        let first = tree.subdivide(HyperTree::ROOT).unwrap();
        tree.subdivide(first + 1).unwrap();

        let mut levels = LevelAccumulators::new(3);
        build_descriptor(&TreeCursor::new(&tree, 0), 0, &mut levels).unwrap();

        assert_eq!(levels.level(0), b"1");
        assert_eq!(levels.level(1), b"01");
        assert_eq!(levels.level(2), b"00");
    }

    #[test]
    fn test_deep_left_sibling_does_not_reorder_right() {
        // Левый ребенок уходит на 3 уровня вниз, правый ветвится один раз
        let mut tree = HyperTree::new(2);
        let a = tree.subdivide(HyperTree::ROOT).unwrap();
        let aa = tree.subdivide(a).unwrap();
        tree.subdivide(aa + 1).unwrap();
        tree.subdivide(a + 1).unwrap();

        let mut levels = LevelAccumulators::new(4);
        build_descriptor(&TreeCursor::new(&tree, 0), 0, &mut levels).unwrap();

        assert_eq!(levels.level(1), b"11");
        // дети A (0, 1), затем дети B (0, 0)
        assert_eq!(levels.level(2), b"0100");
        assert_eq!(levels.level(3), b"00");
    }

    #[test]
    fn test_overflow_reports_tree_and_depth() {
        let tree = HyperTree::uniform(2, 3);
        let mut levels = LevelAccumulators::new(2);
        let err = build_descriptor(&TreeCursor::new(&tree, 5), 0, &mut levels).unwrap_err();
        assert_eq!(err, EncodeError::LevelOverflow { tree: 5, depth: 2, max_levels: 2 });
    }
}
