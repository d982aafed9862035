use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, Set};
use tracing::{debug, info};

use crate::auth::oauth::GoogleProfile;
use crate::entities::users;
use crate::error::AppError;
use crate::infra::db_errors::map_db_err;
use crate::logging::pii::Redacted;

/// Build the insert for a first-time login from the provider profile.
/// Pure mapping; whether it runs is decided by [`ensure_user`].
pub fn user_from_profile(profile: &GoogleProfile) -> users::ActiveModel {
    users::ActiveModel {
        id: NotSet,
        google_sub: Set(profile.sub.clone()),
        email: Set(profile.email.clone()),
        name: Set(profile.name.clone()),
        picture: Set(profile.picture.clone()),
        created_at: Set(time::OffsetDateTime::now_utc()),
    }
}

pub async fn find_by_google_sub(
    conn: &impl ConnectionTrait,
    google_sub: &str,
) -> Result<Option<users::Model>, AppError> {
    users::Entity::find()
        .filter(users::Column::GoogleSub.eq(google_sub))
        .one(conn)
        .await
        .map_err(map_db_err)
}

/// Ensures a user exists for a verified Google profile, creating one on
/// first login. Idempotent: later logins with the same external id return
/// the stored row unchanged.
pub async fn ensure_user(
    conn: &impl ConnectionTrait,
    profile: &GoogleProfile,
) -> Result<users::Model, AppError> {
    if let Some(user) = find_by_google_sub(conn, &profile.sub).await? {
        debug!(
            user_id = user.id,
            email = %Redacted(&profile.email),
            "Repeat login for existing user"
        );
        return Ok(user);
    }

    let user = user_from_profile(profile)
        .insert(conn)
        .await
        .map_err(map_db_err)?;

    info!(
        user_id = user.id,
        email = %Redacted(&user.email),
        "First user creation"
    );

    Ok(user)
}

#[cfg(test)]
mod tests {
    use sea_orm::ActiveValue;

    use super::user_from_profile;
    use crate::auth::oauth::GoogleProfile;

    #[test]
    fn test_user_from_profile_maps_all_fields() {
        let profile = GoogleProfile {
            sub: "google-sub-1".to_string(),
            email: "ann@example.com".to_string(),
            name: Some("Ann".to_string()),
            picture: Some("https://example.com/ann.png".to_string()),
        };

        let active = user_from_profile(&profile);

        assert!(matches!(active.id, ActiveValue::NotSet));
        assert_eq!(active.google_sub, ActiveValue::Set("google-sub-1".to_string()));
        assert_eq!(active.email, ActiveValue::Set("ann@example.com".to_string()));
        assert_eq!(active.name, ActiveValue::Set(Some("Ann".to_string())));
        assert_eq!(
            active.picture,
            ActiveValue::Set(Some("https://example.com/ann.png".to_string()))
        );
    }

    #[test]
    fn test_user_from_profile_optional_fields_absent() {
        let profile = GoogleProfile {
            sub: "google-sub-2".to_string(),
            email: "bo@example.com".to_string(),
            name: None,
            picture: None,
        };

        let active = user_from_profile(&profile);

        assert_eq!(active.name, ActiveValue::Set(None));
        assert_eq!(active.picture, ActiveValue::Set(None));
    }
}
