// ============================================
// HyperTreeGrid - Лес деревьев на грубой решётке
// ============================================
//
// Одна корневая ячейка = одно (необязательное) дерево.
// Решётка хранит параметры, координаты, маску и атрибуты как есть.

use serde::{Deserialize, Serialize};

use crate::error::{EncodeError, EncodeResult, GridError, GridResult};

use super::cursor::TreeCursor;
use super::indexing::RootIndexing;
use super::source::TreeSource;
use super::tree::HyperTree;

/// Ось решётки
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Параметры решётки
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridParams {
    pub dimension: u8,
    pub branch_factor: u8,
    /// Число корневых ячеек по X, Y, Z
    pub grid_size: [usize; 3],
    #[serde(default)]
    pub transposed_root_indexing: bool,
    /// Координаты узлов решётки по X, Y, Z
    pub coordinates: [Vec<f64>; 3],
}

impl GridParams {
    /// Решётка с единичным шагом и началом в нуле
    pub fn uniform(dimension: u8, branch_factor: u8, grid_size: [usize; 3]) -> Self {
        let coordinates = grid_size.map(|n| (0..=n).map(|c| c as f64).collect());
        Self {
            dimension,
            branch_factor,
            grid_size,
            transposed_root_indexing: false,
            coordinates,
        }
    }

    pub fn validate(&self) -> GridResult<()> {
        if !(1..=3).contains(&self.dimension) {
            return Err(GridError::InvalidDimension(self.dimension));
        }
        if !(2..=3).contains(&self.branch_factor) {
            return Err(GridError::InvalidBranchFactor(self.branch_factor));
        }
        // До проверки координат: cells + 1 не должно переполняться
        RootIndexing::new(self.grid_size, self.transposed_root_indexing)?;

        for axis in 0..3 {
            let cells = self.grid_size[axis];
            if cells == 0 {
                return Err(GridError::EmptyAxis { axis });
            }
            if axis >= self.dimension as usize && cells != 1 {
                return Err(GridError::UnusedAxisRefined {
                    axis,
                    dimension: self.dimension,
                    cells,
                });
            }

            let coords = &self.coordinates[axis];
            if coords.len() != cells + 1 {
                return Err(GridError::CoordinateLength {
                    axis,
                    expected: cells + 1,
                    actual: coords.len(),
                });
            }
            check_monotonic(axis, coords)?;
        }
        Ok(())
    }
}

/// Строгая монотонность (в любую сторону)
fn check_monotonic(axis: usize, coords: &[f64]) -> GridResult<()> {
    let ascending = coords[1] > coords[0];
    for (position, pair) in coords.windows(2).enumerate() {
        let ok = if ascending { pair[1] > pair[0] } else { pair[1] < pair[0] };
        if !ok {
            return Err(GridError::NonMonotonicCoordinates {
                axis,
                position: position + 1,
            });
        }
    }
    Ok(())
}

/// Именованный массив атрибутов, передаётся без изменений
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldArray {
    pub name: String,
    #[serde(default = "default_components")]
    pub number_of_components: usize,
    pub values: Vec<f64>,
}

fn default_components() -> usize {
    1
}

impl FieldArray {
    pub fn scalars(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            number_of_components: 1,
            values,
        }
    }

    /// Число кортежей
    pub fn tuple_count(&self) -> usize {
        self.values.len() / self.number_of_components.max(1)
    }
}

/// Лес гипердеревьев
#[derive(Debug, Clone)]
pub struct HyperTreeGrid {
    params: GridParams,
    indexing: RootIndexing,
    /// None = дерево в этой ячейке не хранится
    trees: Vec<Option<HyperTree>>,
    /// Максимум (глубина + 1) по вставленным деревьям
    tracked_levels: usize,
    /// Явно объявленное число уровней
    declared_levels: Option<usize>,
    material_mask_index: Option<Vec<u64>>,
    point_data: Vec<FieldArray>,
    /// Атрибуты всей решётки (не по узлам)
    field_data: Vec<FieldArray>,
}

impl HyperTreeGrid {
    pub fn new(params: GridParams) -> GridResult<Self> {
        params.validate()?;
        let indexing = RootIndexing::new(params.grid_size, params.transposed_root_indexing)?;
        let trees = vec![None; indexing.root_count()];
        Ok(Self {
            params,
            indexing,
            trees,
            tracked_levels: 0,
            declared_levels: None,
            material_mask_index: None,
            point_data: Vec::new(),
            field_data: Vec::new(),
        })
    }

    #[inline]
    pub fn params(&self) -> &GridParams {
        &self.params
    }

    #[inline]
    pub fn indexing(&self) -> &RootIndexing {
        &self.indexing
    }

    /// Пустое дерево (один лист) с правильным числом детей
    pub fn new_tree(&self) -> HyperTree {
        HyperTree::new(self.number_of_children())
    }

    /// Поместить дерево в корневую ячейку
    pub fn set_tree(&mut self, index: usize, tree: HyperTree) -> GridResult<()> {
        let count = self.trees.len();
        if index >= count {
            return Err(GridError::TreeIndexOutOfRange { index, count });
        }
        let expected = self.number_of_children();
        if tree.child_count() != expected {
            return Err(GridError::ChildCountMismatch {
                expected,
                actual: tree.child_count(),
            });
        }

        let levels = tree.level_count();
        let replaced = self.trees[index].replace(tree);
        match replaced {
            // Заменили самое глубокое дерево более мелким: пересчёт
            Some(old) if old.level_count() == self.tracked_levels && levels < self.tracked_levels => {
                self.retrack_levels()
            }
            _ => self.tracked_levels = self.tracked_levels.max(levels),
        }
        Ok(())
    }

    /// Поместить дерево по координатам корня
    pub fn set_tree_at(&mut self, ijk: [usize; 3], tree: HyperTree) -> GridResult<()> {
        let [i, j, k] = ijk;
        let index = self.indexing.to_index(ijk).ok_or(GridError::RootOutOfRange {
            i,
            j,
            k,
            size: self.params.grid_size,
        })?;
        self.set_tree(index, tree)
    }

    pub fn remove_tree(&mut self, index: usize) -> Option<HyperTree> {
        let removed = self.trees.get_mut(index)?.take();
        if removed.as_ref().map(HyperTree::level_count) == Some(self.tracked_levels) {
            self.retrack_levels();
        }
        removed
    }

    pub fn tree(&self, index: usize) -> Option<&HyperTree> {
        self.trees.get(index)?.as_ref()
    }

    /// Число реально хранимых деревьев
    pub fn stored_tree_count(&self) -> usize {
        self.trees.iter().flatten().count()
    }

    /// Всего узлов во всех деревьях
    pub fn node_count(&self) -> usize {
        self.trees.iter().flatten().map(HyperTree::node_count).sum()
    }

    fn retrack_levels(&mut self) {
        self.tracked_levels = self
            .trees
            .iter()
            .flatten()
            .map(HyperTree::level_count)
            .max()
            .unwrap_or(0);
    }

    /// Переопределить объявленное число уровней
    pub fn set_number_of_levels(&mut self, levels: usize) {
        self.declared_levels = Some(levels);
    }

    pub fn set_material_mask_index(&mut self, index: Vec<u64>) {
        self.material_mask_index = Some(index);
    }

    pub fn add_point_data(&mut self, array: FieldArray) {
        self.point_data.push(array);
    }

    pub fn add_field_data(&mut self, array: FieldArray) {
        self.field_data.push(array);
    }

    /// (i, j, k) корня дерева
    pub fn root_coordinates(&self, index: usize) -> GridResult<[usize; 3]> {
        self.indexing.to_ijk(index).ok_or(GridError::TreeIndexOutOfRange {
            index,
            count: self.trees.len(),
        })
    }

    /// Границы корневой ячейки по каждой оси
    pub fn root_bounds(&self, index: usize) -> GridResult<[(f64, f64); 3]> {
        let ijk = self.root_coordinates(index)?;
        Ok(Axis::ALL.map(|axis| {
            let a = axis.index();
            let coords = &self.params.coordinates[a];
            (coords[ijk[a]], coords[ijk[a] + 1])
        }))
    }
}

impl TreeSource for HyperTreeGrid {
    type Cursor<'a> = TreeCursor<'a>;

    fn dimension(&self) -> u8 {
        self.params.dimension
    }

    fn branch_factor(&self) -> u8 {
        self.params.branch_factor
    }

    fn grid_size(&self) -> [usize; 3] {
        self.params.grid_size
    }

    fn transposed_root_indexing(&self) -> bool {
        self.params.transposed_root_indexing
    }

    fn coordinates(&self, axis: Axis) -> &[f64] {
        &self.params.coordinates[axis.index()]
    }

    fn tree_count(&self) -> usize {
        self.trees.len()
    }

    fn iterate_trees(&self) -> Box<dyn Iterator<Item = usize> + '_> {
        Box::new(
            self.trees
                .iter()
                .enumerate()
                .filter_map(|(index, tree)| tree.as_ref().map(|_| index)),
        )
    }

    fn number_of_levels(&self) -> usize {
        self.declared_levels.unwrap_or(self.tracked_levels)
    }

    fn material_mask_index(&self) -> Option<&[u64]> {
        self.material_mask_index.as_deref()
    }

    fn cursor_at_root(&self, tree_index: usize) -> EncodeResult<TreeCursor<'_>> {
        let tree = self.tree(tree_index).ok_or(EncodeError::InvalidIndex {
            index: tree_index,
            count: self.trees.len(),
        })?;
        Ok(TreeCursor::new(tree, tree_index))
    }

    fn point_data(&self) -> &[FieldArray] {
        &self.point_data
    }

    fn field_data(&self) -> &[FieldArray] {
        &self.field_data
    }
}
