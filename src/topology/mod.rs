// ============================================
// Topology Module - Дескриптор формы леса
// ============================================
//
// encoder -> (на каждое дерево) builder -> levels -> packer -> Descriptor
// Ничего не знает о формате контейнера.

mod builder;
mod descriptor;
mod encoder;
mod levels;
mod packer;

pub use builder::build_descriptor;
pub use descriptor::Descriptor;
pub use encoder::{encode, TopologyEncoder};
pub use levels::{LevelAccumulators, BRANCH, LEAF};
pub use packer::pack;
