//! Session handling: sign-up, sign-in, sign-out and per-request session restore.
//!
//! A [`SessionContext`] is rebuilt for every request from the bearer token.
//! The admin flag always comes from the `user_roles` table, never from the
//! token, and resolves to `false` when the lookup fails.

use axum::{
    Json, async_trait,
    extract::FromRequestParts,
    http::{StatusCode, header, request::Parts},
    response::{IntoResponse, Response},
};
use dashmap::DashMap;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set, TransactionTrait,
};
use serde::Serialize;
use serde_json::json;

use crate::domain::DomainError;
use crate::infrastructure::auth::{
    Claims, bearer_token, create_jwt, decode_jwt, hash_password, verify_password,
};
use crate::infrastructure::{AppState, cache::QueryCache};
use crate::models::{Role, user, user_role};

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SessionUser {
    pub id: i32,
    pub email: String,
    pub display_name: Option<String>,
}

impl From<user::Model> for SessionUser {
    fn from(u: user::Model) -> Self {
        Self {
            id: u.id,
            email: u.email,
            display_name: u.display_name,
        }
    }
}

/// Who is calling. Anonymous when `user` is `None`.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    pub user: Option<SessionUser>,
    pub is_admin: bool,
    claims: Option<Claims>,
}

impl SessionContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn user_id(&self) -> Option<i32> {
        self.user.as_ref().map(|u| u.id)
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }
}

/// Boolean role check against `user_roles`.
pub async fn has_role(db: &DatabaseConnection, user_id: i32, role: Role) -> Result<bool, DomainError> {
    let count = user_role::Entity::find()
        .filter(user_role::Column::UserId.eq(user_id))
        .filter(user_role::Column::Role.eq(role))
        .count(db)
        .await?;
    Ok(count > 0)
}

pub async fn grant_role(db: &DatabaseConnection, user_id: i32, role: Role) -> Result<(), DomainError> {
    if has_role(db, user_id, role).await? {
        return Ok(());
    }
    user_role::ActiveModel {
        user_id: Set(user_id),
        role: Set(role),
        created_at: Set(chrono::Utc::now().to_rfc3339()),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok(())
}

/// Issued on sign-up and sign-in.
#[derive(Debug, Clone, Serialize)]
pub struct AuthGrant {
    pub token: String,
    pub user: SessionUser,
    pub is_admin: bool,
}

/// Process-wide session bookkeeping: tokens revoked by sign-out.
#[derive(Default)]
pub struct SessionStore {
    /// jti -> token expiry (unix seconds)
    revoked: DashMap<String, usize>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the session for a bearer token. Bad tokens yield an anonymous session.
    pub async fn restore(&self, db: &DatabaseConnection, token: &str) -> SessionContext {
        let claims = match decode_jwt(token) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::debug!("Rejected token: {}", e);
                return SessionContext::anonymous();
            }
        };

        if self.revoked.contains_key(&claims.jti) {
            tracing::debug!("Token {} was signed out", claims.jti);
            return SessionContext::anonymous();
        }

        let Some(user_id) = claims.user_id() else {
            return SessionContext::anonymous();
        };

        let user = match user::Entity::find_by_id(user_id).one(db).await {
            Ok(Some(u)) => u,
            Ok(None) => return SessionContext::anonymous(),
            Err(e) => {
                tracing::warn!("Failed to load session user {}: {}", user_id, e);
                return SessionContext::anonymous();
            }
        };

        let is_admin = match has_role(db, user_id, Role::Admin).await {
            Ok(flag) => flag,
            Err(e) => {
                tracing::warn!("Role lookup failed for user {}, treating as non-admin: {}", user_id, e);
                false
            }
        };

        SessionContext {
            user: Some(SessionUser::from(user)),
            is_admin,
            claims: Some(claims),
        }
    }

    pub async fn sign_up(
        &self,
        db: &DatabaseConnection,
        email: &str,
        password: &str,
        display_name: Option<String>,
    ) -> Result<AuthGrant, DomainError> {
        let email = normalize_email(email)?;
        if password.len() < MIN_PASSWORD_LEN {
            return Err(DomainError::validation(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        let existing = user::Entity::find()
            .filter(user::Column::Email.eq(&email))
            .count(db)
            .await?;
        if existing > 0 {
            return Err(DomainError::Conflict("email is already registered".to_string()));
        }

        let password_hash = hash_password(password).map_err(DomainError::Internal)?;
        let now = chrono::Utc::now().to_rfc3339();

        let txn = db.begin().await?;
        let created = user::ActiveModel {
            email: Set(email),
            password_hash: Set(password_hash),
            display_name: Set(display_name.filter(|n| !n.trim().is_empty())),
            created_at: Set(now.clone()),
            updated_at: Set(now.clone()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        user_role::ActiveModel {
            user_id: Set(created.id),
            role: Set(Role::User),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;

        tracing::info!("Registered user {}", created.id);

        let token = create_jwt(created.id, &created.email).map_err(DomainError::Internal)?;
        Ok(AuthGrant {
            token,
            user: SessionUser::from(created),
            is_admin: false,
        })
    }

    pub async fn sign_in(
        &self,
        db: &DatabaseConnection,
        email: &str,
        password: &str,
    ) -> Result<AuthGrant, DomainError> {
        let email = email.trim().to_lowercase();
        tracing::info!("Login attempt for {}", email);

        let Some(found) = user::Entity::find()
            .filter(user::Column::Email.eq(&email))
            .one(db)
            .await?
        else {
            tracing::warn!("Unknown email at login: {}", email);
            return Err(DomainError::Unauthorized);
        };

        match verify_password(password, &found.password_hash) {
            Ok(true) => {}
            _ => {
                tracing::warn!("Password verification failed for user {}", found.id);
                return Err(DomainError::Unauthorized);
            }
        }

        let is_admin = has_role(db, found.id, Role::Admin).await.unwrap_or(false);
        let token = create_jwt(found.id, &found.email).map_err(DomainError::Internal)?;

        Ok(AuthGrant {
            token,
            user: SessionUser::from(found),
            is_admin,
        })
    }

    /// Revoke the session's token and drop everything cached for its user.
    pub fn sign_out(&self, cache: &QueryCache, session: &SessionContext) {
        let now = chrono::Utc::now().timestamp().max(0) as usize;
        self.revoked.retain(|_, exp| *exp > now);

        if let Some(claims) = &session.claims {
            self.revoked.insert(claims.jti.clone(), claims.exp);
        }
        if let Some(user_id) = session.user_id() {
            cache.invalidate_user(user_id);
            tracing::info!("User {} signed out", user_id);
        }
    }
}

pub(crate) fn normalize_email(email: &str) -> Result<String, DomainError> {
    let email = email.trim().to_lowercase();
    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if valid {
        Ok(email)
    } else {
        Err(DomainError::validation("a valid email address is required"))
    }
}

/// Why a gated request was refused. Carries the page to send the visitor to.
#[derive(Debug)]
pub enum SessionRejection {
    SignInRequired,
    AdminRequired,
}

impl IntoResponse for SessionRejection {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            SessionRejection::SignInRequired => (StatusCode::UNAUTHORIZED, "Sign in required"),
            SessionRejection::AdminRequired => (StatusCode::FORBIDDEN, "Admin access required"),
        };
        (status, Json(json!({ "error": message, "redirect": "/auth" }))).into_response()
    }
}

async fn session_from_parts(parts: &Parts, state: &AppState) -> SessionContext {
    let token = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(bearer_token);

    match token {
        Some(token) => state.sessions.restore(state.db(), token).await,
        None => SessionContext::anonymous(),
    }
}

/// Any caller; anonymous when no valid token is presented.
pub struct OptionalSession(pub SessionContext);

#[async_trait]
impl FromRequestParts<AppState> for OptionalSession {
    type Rejection = SessionRejection;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(OptionalSession(session_from_parts(parts, state).await))
    }
}

/// A signed-in user.
pub struct UserSession {
    pub user: SessionUser,
    pub context: SessionContext,
}

impl UserSession {
    pub fn user_id(&self) -> i32 {
        self.user.id
    }
}

#[async_trait]
impl FromRequestParts<AppState> for UserSession {
    type Rejection = SessionRejection;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let context = session_from_parts(parts, state).await;
        match context.user.clone() {
            Some(user) => Ok(UserSession { user, context }),
            None => Err(SessionRejection::SignInRequired),
        }
    }
}

/// A signed-in user holding the admin role.
pub struct AdminSession {
    pub user: SessionUser,
}

#[async_trait]
impl FromRequestParts<AppState> for AdminSession {
    type Rejection = SessionRejection;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let context = session_from_parts(parts, state).await;
        match (context.user, context.is_admin) {
            (Some(user), true) => Ok(AdminSession { user }),
            (Some(user), false) => {
                tracing::warn!("User {} denied admin access", user.id);
                Err(SessionRejection::AdminRequired)
            }
            (None, _) => Err(SessionRejection::SignInRequired),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emails_are_normalized() {
        assert_eq!(normalize_email("  Ada@Example.COM ").unwrap(), "ada@example.com");
        assert!(normalize_email("not-an-email").is_err());
        assert!(normalize_email("@example.com").is_err());
    }

    #[test]
    fn anonymous_session_has_no_admin_flag() {
        let session = SessionContext::anonymous();
        assert!(!session.is_signed_in());
        assert!(!session.is_admin);
        assert_eq!(session.user_id(), None);
    }
}
