use diesel::prelude::*;

#[derive(Insertable)]
#[diesel(table_name = crate::schema::subscriptions)]
pub struct NewSubscription {
    pub subscriber_id: i32,
    pub author_id: i32,
}
