use diesel::prelude::*;
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::domain::tag::{NewTag as DomainNewTag, Tag as DomainTag};
use crate::models::tag::{NewTag as DbNewTag, Tag as DbTag};
use crate::repository::{DieselRepository, TagReader, TagWriter};

impl TagReader for DieselRepository {
    fn get_tag_by_id(&self, id: i32) -> RepositoryResult<Option<DomainTag>> {
        use crate::schema::tags;

        let mut conn = self.conn()?;
        let tag = tags::table
            .filter(tags::id.eq(id))
            .first::<DbTag>(&mut conn)
            .optional()?;

        Ok(tag.map(Into::into))
    }

    fn list_tags(&self) -> RepositoryResult<Vec<DomainTag>> {
        use crate::schema::tags;

        let mut conn = self.conn()?;
        let db_tags = tags::table
            .order((tags::name.asc(), tags::id.asc()))
            .load::<DbTag>(&mut conn)?;

        Ok(db_tags.into_iter().map(DomainTag::from).collect())
    }
}

impl TagWriter for DieselRepository {
    fn create_tags(&self, new_tags: &[DomainNewTag]) -> RepositoryResult<usize> {
        use crate::schema::tags;

        let mut conn = self.conn()?;

        conn.transaction::<usize, RepositoryError, _>(|conn| {
            let mut inserted = 0;

            for new_tag in new_tags {
                let insertable = DbNewTag::from(new_tag);
                inserted += diesel::insert_or_ignore_into(tags::table)
                    .values(&insertable)
                    .execute(conn)?;
            }

            Ok(inserted)
        })
    }
}
