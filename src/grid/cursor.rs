// ============================================
// Cursor - Навигация по дереву только на чтение
// ============================================
//
// Курсор не владеет деревом. descend() возвращает новый курсор,
// так что ветви обхода не мешают друг другу.

use crate::error::{EncodeError, EncodeResult};

use super::tree::HyperTree;

/// Позиция внутри одного дерева леса
pub trait HyperTreeCursor: Clone {
    /// Индекс дерева в лесу
    fn tree_index(&self) -> usize;

    /// Глубина текущего узла (0 = корень)
    fn depth(&self) -> usize;

    fn is_leaf(&self) -> bool;

    /// Число детей ветви, 0 у листа
    fn child_count(&self) -> usize;

    /// Курсор на ребенка в слоте `slot` (канонический порядок)
    fn descend(&self, slot: usize) -> EncodeResult<Self>;
}

/// Курсор по плоскому HyperTree
#[derive(Clone, Copy, Debug)]
pub struct TreeCursor<'a> {
    tree: &'a HyperTree,
    tree_index: usize,
    node: u32,
    depth: usize,
}

impl<'a> TreeCursor<'a> {
    /// Курсор на корне дерева
    pub fn new(tree: &'a HyperTree, tree_index: usize) -> Self {
        Self {
            tree,
            tree_index,
            node: HyperTree::ROOT,
            depth: 0,
        }
    }

    /// Индекс узла в плоском массиве дерева
    #[inline]
    pub fn node(&self) -> u32 {
        self.node
    }
}

impl HyperTreeCursor for TreeCursor<'_> {
    #[inline]
    fn tree_index(&self) -> usize {
        self.tree_index
    }

    #[inline]
    fn depth(&self) -> usize {
        self.depth
    }

    #[inline]
    fn is_leaf(&self) -> bool {
        self.tree.node(self.node).map_or(true, |n| n.is_leaf())
    }

    #[inline]
    fn child_count(&self) -> usize {
        if self.is_leaf() {
            0
        } else {
            self.tree.child_count()
        }
    }

    fn descend(&self, slot: usize) -> EncodeResult<Self> {
        if self.is_leaf() {
            return Err(EncodeError::NotABranch {
                tree: self.tree_index,
                depth: self.depth,
            });
        }

        let child = self.tree.child(self.node, slot).ok_or(EncodeError::InvalidChildSlot {
            tree: self.tree_index,
            depth: self.depth,
            slot,
            child_count: self.tree.child_count(),
        })?;

        Ok(Self {
            node: child,
            depth: self.depth + 1,
            ..*self
        })
    }
}
