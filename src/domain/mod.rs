pub mod ai;
pub mod entity;
pub mod grid;
pub mod position;
pub mod tile;
