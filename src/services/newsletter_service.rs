//! Newsletter Service - mailing list sign-ups

use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};

use super::keys::NEWSLETTER;
use crate::domain::DomainError;
use crate::infrastructure::AppState;
use crate::infrastructure::cache::QueryKey;
use crate::infrastructure::session::normalize_email;
use crate::models::newsletter_subscriber::{self as subscriber_model, Entity as Subscriber};
use crate::utils::text::optional;

pub const ALREADY_SUBSCRIBED: &str = "You're already subscribed";

/// Add an address to the list. A second sign-up with the same address is a conflict.
pub async fn subscribe(
    state: &AppState,
    email: &str,
    name: Option<String>,
) -> Result<subscriber_model::Model, DomainError> {
    let email = normalize_email(email)?;

    let model = subscriber_model::ActiveModel {
        email: Set(email),
        name: Set(optional(name)),
        subscribed_at: Set(chrono::Utc::now().to_rfc3339()),
        ..Default::default()
    }
    .insert(state.db())
    .await
    .map_err(|e| match DomainError::from(e) {
        DomainError::Conflict(_) => DomainError::Conflict(ALREADY_SUBSCRIBED.to_string()),
        other => other,
    })?;

    tracing::info!("Newsletter subscriber {} added", model.id);
    state.cache.invalidate(&QueryKey::new(NEWSLETTER));
    Ok(model)
}

/// Newest subscribers first
pub async fn list_subscribers(state: &AppState) -> Result<Vec<subscriber_model::Model>, DomainError> {
    let db = state.db().clone();
    state
        .cache
        .fetch(QueryKey::new(NEWSLETTER), move || async move {
            Ok(Subscriber::find()
                .order_by_desc(subscriber_model::Column::SubscribedAt)
                .all(&db)
                .await?)
        })
        .await
}

pub async fn delete_subscriber(state: &AppState, id: i32) -> Result<(), DomainError> {
    let result = Subscriber::delete_by_id(id).exec(state.db()).await?;
    if result.rows_affected == 0 {
        return Err(DomainError::NotFound);
    }
    tracing::info!("Newsletter subscriber {} removed", id);
    state.cache.invalidate(&QueryKey::new(NEWSLETTER));
    Ok(())
}
