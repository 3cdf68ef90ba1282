pub mod nearest_neighbor;

pub use nearest_neighbor::construct;
