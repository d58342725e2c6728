use std::collections::HashSet;

use diesel::prelude::*;
use pushkind_common::repository::errors::RepositoryResult;

use crate::{
    domain::subscription::SubscriptionListQuery,
    domain::user::User as DomainUser,
    models::subscription::NewSubscription,
    models::user::User as DbUser,
    repository::{DieselRepository, SubscriptionReader, SubscriptionWriter, page_window},
};

impl SubscriptionReader for DieselRepository {
    fn subscribed_author_ids(
        &self,
        subscriber_id: i32,
        author_ids: &[i32],
    ) -> RepositoryResult<HashSet<i32>> {
        use crate::schema::subscriptions;

        if author_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let mut conn = self.conn()?;

        let followed = subscriptions::table
            .filter(subscriptions::subscriber_id.eq(subscriber_id))
            .filter(subscriptions::author_id.eq_any(author_ids))
            .select(subscriptions::author_id)
            .load::<i32>(&mut conn)?;

        Ok(followed.into_iter().collect())
    }

    fn list_subscriptions(
        &self,
        query: SubscriptionListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainUser>)> {
        use crate::schema::{subscriptions, users};

        let mut conn = self.conn()?;

        let total = subscriptions::table
            .filter(subscriptions::subscriber_id.eq(query.subscriber_id))
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        let followed = subscriptions::table
            .filter(subscriptions::subscriber_id.eq(query.subscriber_id))
            .select(subscriptions::author_id);

        let mut items = users::table
            .filter(users::id.eq_any(followed))
            .order((users::username.asc(), users::id.asc()))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(pagination) = &query.pagination {
            let (offset, limit) = page_window(pagination);
            items = items.offset(offset).limit(limit);
        }

        let authors = items.load::<DbUser>(&mut conn)?;

        Ok((total, authors.into_iter().map(Into::into).collect()))
    }
}

impl SubscriptionWriter for DieselRepository {
    fn subscribe(&self, subscriber_id: i32, author_id: i32) -> RepositoryResult<bool> {
        use crate::schema::subscriptions;

        let mut conn = self.conn()?;

        let inserted = diesel::insert_or_ignore_into(subscriptions::table)
            .values(&NewSubscription {
                subscriber_id,
                author_id,
            })
            .execute(&mut conn)?;

        Ok(inserted > 0)
    }

    fn unsubscribe(&self, subscriber_id: i32, author_id: i32) -> RepositoryResult<bool> {
        use crate::schema::subscriptions;

        let mut conn = self.conn()?;

        let deleted = diesel::delete(
            subscriptions::table
                .filter(subscriptions::subscriber_id.eq(subscriber_id))
                .filter(subscriptions::author_id.eq(author_id)),
        )
        .execute(&mut conn)?;

        Ok(deleted > 0)
    }
}
