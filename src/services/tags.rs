use crate::domain::tag::Tag;
use crate::repository::TagReader;
use crate::services::{ServiceError, ServiceResult};

/// Every tag, ordered by name.
pub fn list_tags<R>(repo: &R) -> ServiceResult<Vec<Tag>>
where
    R: TagReader + ?Sized,
{
    repo.list_tags().map_err(ServiceError::from)
}

pub fn get_tag<R>(repo: &R, tag_id: i32) -> ServiceResult<Tag>
where
    R: TagReader + ?Sized,
{
    repo.get_tag_by_id(tag_id)?.ok_or(ServiceError::NotFound)
}
