use chrono::{Local, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::user::{NewUser as DomainNewUser, User as DomainUser};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::users)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser<'a> {
    pub email: &'a str,
    pub username: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub updated_at: NaiveDateTime,
}

impl From<User> for DomainUser {
    fn from(value: User) -> Self {
        Self {
            email: value.email,
            id: value.id,
            username: value.username,
            first_name: value.first_name,
            last_name: value.last_name,
        }
    }
}

impl<'a> From<&'a DomainNewUser> for NewUser<'a> {
    fn from(value: &'a DomainNewUser) -> Self {
        Self {
            email: value.email.as_str(),
            username: value.username.as_str(),
            first_name: value.first_name.as_str(),
            last_name: value.last_name.as_str(),
            updated_at: Local::now().naive_utc(),
        }
    }
}
