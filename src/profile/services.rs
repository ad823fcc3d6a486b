use std::time::Duration;

use bytes::Bytes;
use tracing::{info, warn};
use uuid::Uuid;

use super::dto::{EditFieldRequest, RegisterProfileRequest};
use crate::{
    error::ServiceError,
    nutrition::{validate_field, validate_registration, ProfileData, ProfileField},
    state::AppState,
    storage::{ext_from_mime, profile_picture_key},
};

const PICTURE_URL_TTL: Duration = Duration::from_secs(30 * 60);

pub async fn get_profile(st: &AppState, user_id: Uuid) -> Result<ProfileData, ServiceError> {
    st.profiles
        .fetch_profile(user_id)
        .await?
        .ok_or(ServiceError::NotFound("profile"))
}

pub async fn register(
    st: &AppState,
    user_id: Uuid,
    req: RegisterProfileRequest,
) -> Result<ProfileData, ServiceError> {
    let profile = validate_registration(&req.name, req.age, &req.gender, req.weight, req.height)?;
    if !st.profiles.create_profile(user_id, profile.clone()).await? {
        return Err(ServiceError::Conflict("profile already exists"));
    }
    info!(%user_id, "profile registered");
    Ok(profile)
}

pub async fn edit_field(
    st: &AppState,
    user_id: Uuid,
    req: EditFieldRequest,
) -> Result<ProfileData, ServiceError> {
    let field: ProfileField = req.field.parse()?;
    let update = validate_field(field, &req.value.to_raw())?;
    let profile = st
        .profiles
        .update_profile(user_id, &update)
        .await?
        .ok_or(ServiceError::NotFound("profile"))?;
    info!(%user_id, field = field.as_str(), "profile updated");
    Ok(profile)
}

/// Stores a new picture and links it to the profile. The previous object, if
/// any, is removed afterwards. An object that could not be linked is removed
/// again. Failing to remove either only logs a warning.
pub async fn upload_picture(
    st: &AppState,
    user_id: Uuid,
    body: Bytes,
    content_type: &str,
) -> Result<ProfileData, ServiceError> {
    let ext = ext_from_mime(content_type).ok_or_else(|| {
        ServiceError::BadRequest(format!("unsupported picture type: {content_type}"))
    })?;
    if body.is_empty() {
        return Err(ServiceError::BadRequest("picture body is empty".into()));
    }
    let previous = get_profile(st, user_id).await?.profile_picture;

    let key = profile_picture_key(user_id, ext);
    st.storage.put_object(&key, body, content_type).await?;
    let profile = match st.profiles.set_picture(user_id, &key).await {
        Ok(Some(profile)) => profile,
        linked => {
            if let Err(e) = st.storage.delete_object(&key).await {
                warn!(error = %e, %key, "failed to delete unlinked picture");
            }
            return Err(match linked {
                Err(e) => e.into(),
                _ => ServiceError::NotFound("profile"),
            });
        }
    };
    info!(%user_id, %key, "profile picture stored");

    if let Some(old) = previous {
        if let Err(e) = st.storage.delete_object(&old).await {
            warn!(error = %e, key = %old, "failed to delete previous picture");
        }
    }
    Ok(profile)
}

/// Short-lived URL of the current picture.
pub async fn picture_url(st: &AppState, user_id: Uuid) -> Result<String, ServiceError> {
    let key = get_profile(st, user_id)
        .await?
        .profile_picture
        .ok_or(ServiceError::NotFound("profile picture"))?;
    Ok(st.storage.presign_get(&key, PICTURE_URL_TTL).await?)
}
