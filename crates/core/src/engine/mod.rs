//! Position evaluation

pub mod material;

pub use material::{material_balance, piece_value, relative_balance, BestMove, MaterialEngine};
