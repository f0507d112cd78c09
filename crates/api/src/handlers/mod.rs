pub mod inference;
pub mod nodes;
pub mod training;
