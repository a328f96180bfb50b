//! SeaORM entities for the kitchen schema.
//!
//! `dish_type`, `ingredient`, `cook` and `dish` are the records users manage;
//! `dish_ingredient` and `dish_cook` are the join tables behind the two
//! many-to-many relations of a dish.

pub mod cook;
pub mod dish;
pub mod dish_cook;
pub mod dish_ingredient;
pub mod dish_type;
pub mod ingredient;

pub mod prelude;

pub use sea_orm;
