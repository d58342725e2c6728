use pushkind_common::domain::auth::AuthenticatedUser;
use serde::Deserialize;

use crate::domain::subscription::{AuthorCard, SubscriptionListQuery};
use crate::domain::user::{NewUser, User, UserListQuery, UserProfile};
use crate::repository::{
    RecipeReader, SubscriptionReader, SubscriptionWriter, UserReader, UserWriter,
};
use crate::services::{
    Page, ServiceError, ServiceResult, ensure_page_exists, parse_page, parse_page_size,
    parse_positive,
};

/// Query parameters accepted by the user list.
#[derive(Debug, Default, Deserialize)]
pub struct UserQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// Query parameters accepted by the subscription list and the subscribe action.
#[derive(Debug, Default, Deserialize)]
pub struct SubscriptionQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    /// Maximum number of recipes embedded in each author card.
    pub recipes_limit: Option<String>,
}

/// Local account for the identity, provisioned on first sight.
pub fn current_user<R>(repo: &R, identity: &AuthenticatedUser) -> ServiceResult<User>
where
    R: UserReader + UserWriter + ?Sized,
{
    if let Some(user) = repo.get_user_by_email(&identity.email)? {
        return Ok(user);
    }

    let new_user = NewUser::from(identity);
    log::info!("Provisioning local account for {}", new_user.email);
    repo.create_user(&new_user).map_err(ServiceError::from)
}

/// Like [`current_user`] but fails with `Unauthorized` for anonymous requests.
pub(crate) fn require_user<R>(repo: &R, identity: Option<&AuthenticatedUser>) -> ServiceResult<User>
where
    R: UserReader + UserWriter + ?Sized,
{
    match identity {
        Some(identity) => current_user(repo, identity),
        None => Err(ServiceError::Unauthorized),
    }
}

/// Local id of the viewer, `None` for anonymous requests.
pub(crate) fn viewer_id<R>(repo: &R, identity: Option<&AuthenticatedUser>) -> ServiceResult<Option<i32>>
where
    R: UserReader + UserWriter + ?Sized,
{
    identity
        .map(|identity| current_user(repo, identity).map(|user| user.id))
        .transpose()
}

/// Attach `is_subscribed` for the viewer to each user.
fn profiles<R>(repo: &R, viewer_id: Option<i32>, users: Vec<User>) -> ServiceResult<Vec<UserProfile>>
where
    R: SubscriptionReader + ?Sized,
{
    let followed = match viewer_id {
        Some(viewer_id) => {
            let ids: Vec<i32> = users.iter().map(|user| user.id).collect();
            repo.subscribed_author_ids(viewer_id, &ids)?
        }
        None => Default::default(),
    };

    Ok(users
        .into_iter()
        .map(|user| {
            let is_subscribed = followed.contains(&user.id);
            UserProfile::new(user, is_subscribed)
        })
        .collect())
}

fn author_card<R>(
    repo: &R,
    profile: UserProfile,
    recipes_limit: Option<usize>,
) -> ServiceResult<AuthorCard>
where
    R: RecipeReader + ?Sized,
{
    let recipes = repo.list_author_recipes(profile.user.id, recipes_limit)?;
    let recipes_count = repo.count_author_recipes(profile.user.id)?;

    Ok(AuthorCard {
        profile,
        recipes,
        recipes_count,
    })
}

pub fn list_users<R>(
    repo: &R,
    identity: Option<&AuthenticatedUser>,
    query: UserQuery,
) -> ServiceResult<Page<UserProfile>>
where
    R: UserReader + UserWriter + SubscriptionReader + ?Sized,
{
    let page = parse_page(query.page.as_deref())?;
    let per_page = parse_page_size(query.limit.as_deref());
    let viewer_id = viewer_id(repo, identity)?;

    let (total, users) = repo.list_users(UserListQuery::new().paginate(page, per_page))?;
    ensure_page_exists(page, per_page, total)?;

    let results = profiles(repo, viewer_id, users)?;
    Ok(Page::new(total, page, per_page, results))
}

pub fn get_user<R>(
    repo: &R,
    identity: Option<&AuthenticatedUser>,
    user_id: i32,
) -> ServiceResult<UserProfile>
where
    R: UserReader + UserWriter + SubscriptionReader + ?Sized,
{
    let viewer_id = viewer_id(repo, identity)?;
    let user = repo.get_user_by_id(user_id)?.ok_or(ServiceError::NotFound)?;

    profiles(repo, viewer_id, vec![user])?
        .pop()
        .ok_or(ServiceError::NotFound)
}

/// Profile of the authenticated user. Nobody is subscribed to themselves.
pub fn me<R>(repo: &R, identity: Option<&AuthenticatedUser>) -> ServiceResult<UserProfile>
where
    R: UserReader + UserWriter + ?Sized,
{
    let user = require_user(repo, identity)?;
    Ok(UserProfile::new(user, false))
}

pub fn list_subscriptions<R>(
    repo: &R,
    identity: Option<&AuthenticatedUser>,
    query: SubscriptionQuery,
) -> ServiceResult<Page<AuthorCard>>
where
    R: UserReader + UserWriter + SubscriptionReader + RecipeReader + ?Sized,
{
    let user = require_user(repo, identity)?;
    let page = parse_page(query.page.as_deref())?;
    let per_page = parse_page_size(query.limit.as_deref());
    let recipes_limit = parse_positive(query.recipes_limit.as_deref());

    let list_query = SubscriptionListQuery::new(user.id).paginate(page, per_page);
    let (total, authors) = repo.list_subscriptions(list_query)?;
    ensure_page_exists(page, per_page, total)?;

    let cards = authors
        .into_iter()
        .map(|author| author_card(repo, UserProfile::new(author, true), recipes_limit))
        .collect::<ServiceResult<Vec<_>>>()?;

    Ok(Page::new(total, page, per_page, cards))
}

pub fn subscribe<R>(
    repo: &R,
    identity: Option<&AuthenticatedUser>,
    author_id: i32,
    query: SubscriptionQuery,
) -> ServiceResult<AuthorCard>
where
    R: UserReader + UserWriter + SubscriptionWriter + RecipeReader + ?Sized,
{
    let user = require_user(repo, identity)?;
    if user.id == author_id {
        return Err(ServiceError::Form("На себя подписаться нельзя.".to_string()));
    }

    let author = repo
        .get_user_by_id(author_id)?
        .ok_or(ServiceError::NotFound)?;

    if !repo.subscribe(user.id, author.id)? {
        return Err(ServiceError::Form(
            "Вы уже подписаны на этого пользователя.".to_string(),
        ));
    }

    let recipes_limit = parse_positive(query.recipes_limit.as_deref());
    author_card(repo, UserProfile::new(author, true), recipes_limit)
}

pub fn unsubscribe<R>(
    repo: &R,
    identity: Option<&AuthenticatedUser>,
    author_id: i32,
) -> ServiceResult<()>
where
    R: UserReader + UserWriter + SubscriptionWriter + ?Sized,
{
    let user = require_user(repo, identity)?;
    let author = repo
        .get_user_by_id(author_id)?
        .ok_or(ServiceError::NotFound)?;

    if !repo.unsubscribe(user.id, author.id)? {
        return Err(ServiceError::Form(
            "Вы не были подписаны на этого пользователя.".to_string(),
        ));
    }

    Ok(())
}
