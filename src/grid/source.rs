// ============================================
// Tree Source - Что кодировщик читает из решётки
// ============================================

use crate::error::EncodeResult;

use super::cursor::HyperTreeCursor;
use super::forest::{Axis, FieldArray};

/// Лес гипердеревьев, доступный только на чтение.
///
/// Кодировщику нужны лишь порядок деревьев, объявленное число уровней
/// и курсоры. Остальное читают писатели контейнеров.
pub trait TreeSource {
    type Cursor<'a>: HyperTreeCursor
    where
        Self: 'a;

    fn dimension(&self) -> u8;

    fn branch_factor(&self) -> u8;

    /// Число корневых ячеек по осям
    fn grid_size(&self) -> [usize; 3];

    fn transposed_root_indexing(&self) -> bool;

    /// Монотонные координаты вдоль оси, длина = ячейки + 1
    fn coordinates(&self, axis: Axis) -> &[f64];

    /// Всего корневых ячеек (включая пустые)
    fn tree_count(&self) -> usize;

    /// Индексы хранимых деревьев по возрастанию
    fn iterate_trees(&self) -> Box<dyn Iterator<Item = usize> + '_>;

    /// Объявленное число уровней. Предусловие, не пересчитывается.
    fn number_of_levels(&self) -> usize;

    fn material_mask_index(&self) -> Option<&[u64]>;

    fn cursor_at_root(&self, tree_index: usize) -> EncodeResult<Self::Cursor<'_>>;

    /// Атрибуты узлов, пишутся как есть
    fn point_data(&self) -> &[FieldArray] {
        &[]
    }

    /// Атрибуты решётки целиком (время, шаг и т.п.)
    fn field_data(&self) -> &[FieldArray] {
        &[]
    }

    #[inline]
    fn number_of_children(&self) -> usize {
        (self.branch_factor() as usize).pow(self.dimension() as u32)
    }
}
