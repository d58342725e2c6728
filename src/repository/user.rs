use diesel::prelude::*;
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::{
    domain::user::{NewUser as DomainNewUser, User as DomainUser, UserListQuery},
    models::user::{NewUser as DbNewUser, User as DbUser},
    repository::{DieselRepository, UserReader, UserWriter, page_window},
};

impl UserReader for DieselRepository {
    fn get_user_by_id(&self, id: i32) -> RepositoryResult<Option<DomainUser>> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let user = users::table
            .filter(users::id.eq(id))
            .first::<DbUser>(&mut conn)
            .optional()?;

        Ok(user.map(Into::into))
    }

    fn get_user_by_email(&self, email: &str) -> RepositoryResult<Option<DomainUser>> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let user = users::table
            .filter(users::email.eq(email.to_lowercase()))
            .first::<DbUser>(&mut conn)
            .optional()?;

        Ok(user.map(Into::into))
    }

    fn list_users(&self, query: UserListQuery) -> RepositoryResult<(usize, Vec<DomainUser>)> {
        use crate::schema::users;

        let mut conn = self.conn()?;

        let total = users::table.count().get_result::<i64>(&mut conn)? as usize;

        let mut items = users::table
            .order(users::id.asc())
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(pagination) = &query.pagination {
            let (offset, limit) = page_window(pagination);
            items = items.offset(offset).limit(limit);
        }

        let db_users = items.load::<DbUser>(&mut conn)?;

        Ok((total, db_users.into_iter().map(Into::into).collect()))
    }
}

impl UserWriter for DieselRepository {
    fn create_user(&self, new_user: &DomainNewUser) -> RepositoryResult<DomainUser> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let db_new = DbNewUser::from(new_user);

        // A concurrent request may have provisioned the same email first.
        let user = conn.transaction::<DbUser, RepositoryError, _>(|conn| {
            diesel::insert_or_ignore_into(users::table)
                .values(&db_new)
                .execute(conn)?;

            Ok(users::table
                .filter(users::email.eq(db_new.email))
                .first::<DbUser>(conn)?)
        })?;

        Ok(user.into())
    }
}
