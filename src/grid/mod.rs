// ============================================
// Grid Module - Лес гипердеревьев
// ============================================
//
// - HyperTree: плоское дерево (дети подряд)
// - HyperTreeGrid: решётка корней + параметры + атрибуты
// - TreeCursor: курсор только на чтение
// - TreeSource: граница, через которую читает кодировщик

mod cursor;
mod description;
mod forest;
mod indexing;
mod source;
mod tree;

pub use cursor::{HyperTreeCursor, TreeCursor};
pub use description::{ForestDescription, NodeShape, TreeEntry};
pub use forest::{Axis, FieldArray, GridParams, HyperTreeGrid};
pub use indexing::RootIndexing;
pub use source::TreeSource;
pub use tree::{HyperTree, TreeNode, INVALID_INDEX};
