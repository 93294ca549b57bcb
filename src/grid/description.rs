// ============================================
// Forest Description - Лес из JSON
// ============================================
// Форма дерева: 0 = лист, массив = ветвь с детьми в каноническом порядке.
//
// {
//   "dimension": 2, "branch_factor": 2, "grid_size": [2, 1, 1],
//   "coordinates": [[0, 1, 2], [0, 1], [0, 1]],
//   "trees": [ { "index": 0, "shape": 0 }, { "root": [1, 0, 0], "shape": [0, 0, [0, 0, 0, 0], 0] } ]
// }

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, GridError, GridResult};

use super::forest::{FieldArray, GridParams, HyperTreeGrid};
use super::tree::HyperTree;

/// Форма узла
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeShape {
    Leaf(u8),
    Branch(Vec<NodeShape>),
}

/// Одно дерево: индекс корня либо (i, j, k)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<[usize; 3]>,
    pub shape: NodeShape,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestDescription {
    #[serde(flatten)]
    pub params: GridParams,
    #[serde(default)]
    pub number_of_levels: Option<usize>,
    #[serde(default)]
    pub material_mask_index: Option<Vec<u64>>,
    #[serde(default)]
    pub point_data: Vec<FieldArray>,
    #[serde(default)]
    pub field_data: Vec<FieldArray>,
    #[serde(default)]
    pub trees: Vec<TreeEntry>,
}

impl ForestDescription {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Построить решётку со всеми деревьями
    pub fn into_grid(self) -> GridResult<HyperTreeGrid> {
        let mut grid = HyperTreeGrid::new(self.params)?;

        for entry in self.trees {
            let mut tree = grid.new_tree();
            grow(&mut tree, HyperTree::ROOT, &entry.shape)?;
            match (entry.index, entry.root) {
                (Some(index), None) => grid.set_tree(index, tree)?,
                (None, Some(ijk)) => grid.set_tree_at(ijk, tree)?,
                _ => {
                    return Err(GridError::InvalidShape(
                        "tree entry needs exactly one of `index` or `root`".to_string(),
                    ))
                }
            }
        }

        if let Some(levels) = self.number_of_levels {
            grid.set_number_of_levels(levels);
        }
        if let Some(mask) = self.material_mask_index {
            grid.set_material_mask_index(mask);
        }
        for array in self.point_data {
            grid.add_point_data(array);
        }
        for array in self.field_data {
            grid.add_field_data(array);
        }
        Ok(grid)
    }
}

/// Разбить узел согласно форме
fn grow(tree: &mut HyperTree, node: u32, shape: &NodeShape) -> GridResult<()> {
    match shape {
        NodeShape::Leaf(0) => Ok(()),
        NodeShape::Leaf(other) => Err(GridError::InvalidShape(format!(
            "leaf must be 0, got {}",
            other
        ))),
        NodeShape::Branch(children) => {
            if children.len() != tree.child_count() {
                return Err(GridError::ChildCountMismatch {
                    expected: tree.child_count(),
                    actual: children.len(),
                });
            }
            let first = tree.subdivide(node)?;
            for (slot, child) in children.iter().enumerate() {
                grow(tree, first + slot as u32, child)?;
            }
            Ok(())
        }
    }
}
