pub mod ingredient;
pub mod recipe;
pub mod shopping_list;
pub mod subscription;
pub mod tag;
pub mod user;
