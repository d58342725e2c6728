pub mod ingredient;
pub mod recipe;
pub mod recipe_mark;
pub mod subscription;
pub mod tag;
pub mod user;
