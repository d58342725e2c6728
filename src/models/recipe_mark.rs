use diesel::prelude::*;

#[derive(Insertable)]
#[diesel(table_name = crate::schema::favorites)]
pub struct NewFavorite {
    pub user_id: i32,
    pub recipe_id: i32,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::shopping_carts)]
pub struct NewShoppingCartItem {
    pub user_id: i32,
    pub recipe_id: i32,
}
