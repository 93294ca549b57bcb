// ============================================
// HyperTree - Плоское хранение одного дерева
// ============================================
//
// Все узлы в одном Vec, ссылки через u32 индексы.
// Дети ветви идут подряд: first_child, first_child+1, ..., first_child+N-1.
// Порядок слотов 0..N-1 и есть канонический порядок детей.

use crate::error::{GridError, GridResult};

/// Невалидный индекс (аналог null)
pub const INVALID_INDEX: u32 = u32::MAX;

/// Узел дерева
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TreeNode {
    /// Глубина (0 = корень)
    pub depth: u32,
    /// Индекс первого ребенка, INVALID_INDEX у листа
    pub first_child: u32,
}

impl TreeNode {
    #[inline]
    pub fn leaf(depth: u32) -> Self {
        Self {
            depth,
            first_child: INVALID_INDEX,
        }
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.first_child == INVALID_INDEX
    }
}

/// Дерево с фиксированным числом детей у каждой ветви
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HyperTree {
    nodes: Vec<TreeNode>,
    /// branch_factor ^ dimension
    child_count: usize,
    /// Наибольшая глубина среди узлов
    max_depth: u32,
}

impl HyperTree {
    /// Корень всегда на индексе 0
    pub const ROOT: u32 = 0;

    /// Дерево из одного листа
    pub fn new(child_count: usize) -> Self {
        let mut nodes = Vec::with_capacity(1 + child_count);
        nodes.push(TreeNode::leaf(0));
        Self {
            nodes,
            child_count,
            max_depth: 0,
        }
    }

    /// Равномерно разбитое дерево: все узлы до глубины `levels - 1` ветви
    pub fn uniform(child_count: usize, levels: usize) -> Self {
        let mut tree = Self::new(child_count);
        let mut frontier = vec![Self::ROOT];
        for _ in 1..levels {
            let mut next = Vec::with_capacity(frontier.len() * child_count);
            for node in frontier {
                // Узлы фронта всегда листья, ошибка невозможна
                if let Ok(first) = tree.subdivide(node) {
                    next.extend(first..first + child_count as u32);
                }
            }
            frontier = next;
        }
        tree
    }

    #[inline]
    pub fn child_count(&self) -> usize {
        self.child_count
    }

    #[inline]
    pub fn node(&self, idx: u32) -> Option<&TreeNode> {
        self.nodes.get(idx as usize)
    }

    /// Индекс ребенка по слоту
    #[inline]
    pub fn child(&self, idx: u32, slot: usize) -> Option<u32> {
        let node = self.node(idx)?;
        if node.is_leaf() || slot >= self.child_count {
            return None;
        }
        Some(node.first_child + slot as u32)
    }

    /// Разбить лист на child_count детей. Возвращает индекс первого ребенка.
    pub fn subdivide(&mut self, idx: u32) -> GridResult<u32> {
        let node = *self.node(idx).ok_or(GridError::UnknownNode { node: idx })?;
        if !node.is_leaf() {
            return Err(GridError::AlreadySubdivided { node: idx });
        }

        let first = self.nodes.len() as u32;
        let child = TreeNode::leaf(node.depth + 1);
        self.nodes.extend(std::iter::repeat(child).take(self.child_count));
        self.nodes[idx as usize].first_child = first;
        self.max_depth = self.max_depth.max(child.depth);
        Ok(first)
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Число уровней (максимальная глубина + 1)
    #[inline]
    pub fn level_count(&self) -> usize {
        self.max_depth as usize + 1
    }

    /// Число узлов на каждой глубине
    pub fn nodes_per_level(&self) -> Vec<usize> {
        let mut counts = vec![0; self.level_count()];
        for node in &self.nodes {
            counts[node.depth as usize] += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subdivide_appends_contiguous_children() {
        let mut tree = HyperTree::new(4);
        let first = tree.subdivide(HyperTree::ROOT).unwrap();
        assert_eq!(first, 1);
        assert_eq!(tree.node_count(), 5);
        assert_eq!(tree.child(HyperTree::ROOT, 3), Some(4));
        assert_eq!(tree.child(HyperTree::ROOT, 4), None);
        assert_eq!(tree.node(4).unwrap().depth, 1);

        let grandchild = tree.subdivide(2).unwrap();
        assert_eq!(grandchild, 5);
        assert_eq!(tree.level_count(), 3);
        assert_eq!(tree.nodes_per_level(), vec![1, 4, 4]);
        assert_eq!(tree.leaf_count(), 7);
    }

    #[test]
    fn test_level_count_follows_deepest_subdivide() {
        let mut tree = HyperTree::new(2);
        assert_eq!(tree.level_count(), 1);

        let first = tree.subdivide(HyperTree::ROOT).unwrap();
        let deep = tree.subdivide(first + 1).unwrap();
        assert_eq!(tree.level_count(), 3);

        // Разбиение мельче текущего максимума уровни не меняет
        tree.subdivide(first).unwrap();
        assert_eq!(tree.level_count(), 3);

        tree.subdivide(deep).unwrap();
        assert_eq!(tree.level_count(), 4);
        assert_eq!(tree.nodes_per_level(), vec![1, 2, 4, 2]);
    }

    #[test]
    fn test_subdivide_rejects_branch_and_unknown() {
        let mut tree = HyperTree::new(2);
        tree.subdivide(HyperTree::ROOT).unwrap();
        assert_eq!(
            tree.subdivide(HyperTree::ROOT),
            Err(GridError::AlreadySubdivided { node: 0 })
        );
        assert_eq!(tree.subdivide(42), Err(GridError::UnknownNode { node: 42 }));
    }

    #[test]
    fn test_uniform_tree() {
        let tree = HyperTree::uniform(8, 3);
        assert_eq!(tree.nodes_per_level(), vec![1, 8, 64]);
        assert_eq!(tree.leaf_count(), 64);

        let single = HyperTree::uniform(8, 1);
        assert_eq!(single.node_count(), 1);
        assert!(single.node(HyperTree::ROOT).unwrap().is_leaf());
    }
}
