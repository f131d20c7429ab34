use actix_web::{get, post, web, HttpResponse};
use diesel::prelude::*;
use serde::Deserialize;
use validator::Validate;

use crate::envelope::ApiResponse;
use crate::errors::ApiError;
use crate::establish_connection;
use crate::extractors::auth::AuthUser;
use crate::helpers::requests::validation_error;
use crate::models::{
    get_safe_user_fields, CreatorProfile, CreatorSummary, NewCreatorProfile, NewVideo,
    ProfileWithUser, SafeUser, User, Video, VideoWithCreator,
};
use crate::schema::creator_profiles::dsl::creator_profiles;
use crate::schema::users::dsl::users;
use crate::schema::videos::dsl::videos;

#[derive(Deserialize, Validate)]
pub struct ProfileBody {
    bio: Option<String>,
    platform_links: Option<String>,
    #[validate(range(min = 0, message = "Audience size cannot be negative"))]
    audience_size: Option<i32>,
    category: Option<String>,
}

// Fields omitted from a profile re-submission keep their stored values.
fn merge_profile_field(requested: Option<&str>, current: Option<String>) -> Option<String> {
    match requested {
        Some(value) => Some(value.to_string()),
        None => current,
    }
}

#[post("/profile")]
pub async fn upsert_profile(
    user: AuthUser,
    data: web::Json<ProfileBody>,
) -> Result<HttpResponse, ApiError> {
    data.validate().map_err(|e| validation_error(&e))?;

    let mut db = establish_connection()?;

    // Promotion to CREATOR happens on submission, not on approval. Only
    // video creation checks the approved flag.
    diesel::update(users.find(user.id))
        .set(crate::schema::users::role.eq("CREATOR"))
        .execute(&mut db)?;

    let existing = creator_profiles
        .filter(crate::schema::creator_profiles::user_id.eq(user.id))
        .first::<CreatorProfile>(&mut db)
        .optional()?;

    let profile: CreatorProfile = match existing {
        Some(current) => {
            // A re-submission only touches the fields it sends; absent ones
            // keep their stored values. Audience size is always written,
            // defaulting to 0.
            diesel::update(creator_profiles.find(current.id))
                .set((
                    crate::schema::creator_profiles::bio
                        .eq(merge_profile_field(data.bio.as_deref(), current.bio)),
                    crate::schema::creator_profiles::platform_links.eq(merge_profile_field(
                        data.platform_links.as_deref(),
                        current.platform_links,
                    )),
                    crate::schema::creator_profiles::audience_size
                        .eq(data.audience_size.unwrap_or(0)),
                    crate::schema::creator_profiles::category
                        .eq(merge_profile_field(data.category.as_deref(), current.category)),
                ))
                .get_result(&mut db)?
        }
        None => {
            let new_profile = NewCreatorProfile {
                user_id: user.id,
                bio: data.bio.as_deref(),
                platform_links: data.platform_links.as_deref(),
                audience_size: data.audience_size.unwrap_or(0),
                category: data.category.as_deref(),
            };

            diesel::insert_into(creator_profiles)
                .values(&new_profile)
                .get_result(&mut db)?
        }
    };

    let db_user: User = users.find(user.id).first(&mut db)?;

    Ok(HttpResponse::Ok().json(ApiResponse::data(ProfileWithUser::new(
        profile,
        SafeUser::from(&db_user),
    ))))
}

#[get("/profile/me")]
pub async fn my_profile(user: AuthUser) -> Result<HttpResponse, ApiError> {
    let mut db = establish_connection()?;

    let profile: Option<ProfileWithUser> = creator_profiles
        .inner_join(users)
        .select((
            crate::schema::creator_profiles::id,
            crate::schema::creator_profiles::user_id,
            crate::schema::creator_profiles::bio,
            crate::schema::creator_profiles::platform_links,
            crate::schema::creator_profiles::audience_size,
            crate::schema::creator_profiles::category,
            crate::schema::creator_profiles::approved_by_admin,
            crate::schema::creator_profiles::created_at,
            get_safe_user_fields(),
        ))
        .filter(crate::schema::creator_profiles::user_id.eq(user.id))
        .first::<ProfileWithUser>(&mut db)
        .optional()?;

    let profile =
        profile.ok_or_else(|| ApiError::NotFound(String::from("Creator profile not found")))?;

    Ok(HttpResponse::Ok().json(ApiResponse::data(profile)))
}

#[derive(Deserialize)]
pub struct CreateVideoBody {
    title: String,
    description: Option<String>,
    video_url: String,
    thumbnail_url: Option<String>,
    tags: Option<Vec<String>>,
    status: Option<String>,
}

fn is_valid_status(status: &str) -> bool {
    matches!(status, "DRAFT" | "PUBLISHED")
}

fn can_create_video(profile: Option<&CreatorProfile>) -> bool {
    profile.map(|p| p.approved_by_admin).unwrap_or(false)
}

fn creator_summary(
    user: &AuthUser,
    bio: Option<String>,
    category: Option<String>,
) -> CreatorSummary {
    CreatorSummary {
        id: user.id,
        email: user.email.clone(),
        role: user.role.clone(),
        bio,
        category,
    }
}

#[post("/videos")]
pub async fn create_video(
    user: AuthUser,
    data: web::Json<CreateVideoBody>,
) -> Result<HttpResponse, ApiError> {
    if data.title.trim().is_empty() || data.video_url.trim().is_empty() {
        return Err(ApiError::InvalidInput(String::from(
            "Title and video URL are required",
        )));
    }

    let status = data.status.as_deref().unwrap_or("DRAFT");
    if !is_valid_status(status) {
        return Err(ApiError::InvalidInput(String::from(
            "Status must be DRAFT or PUBLISHED",
        )));
    }

    let mut db = establish_connection()?;

    let profile = creator_profiles
        .filter(crate::schema::creator_profiles::user_id.eq(user.id))
        .first::<CreatorProfile>(&mut db)
        .optional()?;

    if !can_create_video(profile.as_ref()) {
        return Err(ApiError::Forbidden(String::from(
            "Only approved creators can upload videos",
        )));
    }

    let (profile_bio, profile_category) = profile
        .map(|p| (p.bio, p.category))
        .unwrap_or((None, None));

    let new_video = NewVideo {
        creator_id: user.id,
        title: &data.title,
        description: data.description.as_deref(),
        video_url: &data.video_url,
        thumbnail_url: data.thumbnail_url.as_deref(),
        tags: data.tags.clone().unwrap_or_default(),
        status,
    };

    let video: Video = diesel::insert_into(videos)
        .values(&new_video)
        .get_result(&mut db)?;

    let creator = creator_summary(&user, profile_bio, profile_category);

    Ok(HttpResponse::Created().json(ApiResponse::data(VideoWithCreator::new(video, creator))))
}

#[get("/videos/me")]
pub async fn my_videos(user: AuthUser) -> Result<HttpResponse, ApiError> {
    let mut db = establish_connection()?;

    let items: Vec<Video> = videos
        .filter(crate::schema::videos::creator_id.eq(user.id))
        .order(crate::schema::videos::created_at.desc())
        .load::<Video>(&mut db)?;

    Ok(HttpResponse::Ok().json(ApiResponse::data(items)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn profile(approved: bool) -> CreatorProfile {
        CreatorProfile {
            id: 1,
            user_id: 42,
            bio: None,
            platform_links: None,
            audience_size: 0,
            category: None,
            approved_by_admin: approved,
            created_at: NaiveDateTime::from_timestamp_opt(0, 0).unwrap(),
        }
    }

    #[test]
    fn video_creation_requires_an_approved_profile() {
        assert!(!can_create_video(None));
        assert!(!can_create_video(Some(&profile(false))));
        assert!(can_create_video(Some(&profile(true))));
    }

    #[test]
    fn resubmission_keeps_fields_that_were_not_sent() {
        let stored = Some(String::from("I make videos"));
        assert_eq!(merge_profile_field(None, stored.clone()), stored);
        assert_eq!(
            merge_profile_field(Some("New bio"), stored),
            Some(String::from("New bio"))
        );
        assert_eq!(merge_profile_field(None, None), None);
    }

    #[test]
    fn creator_summary_uses_the_stored_role() {
        let admin = AuthUser {
            id: 1,
            email: String::from("admin@x.com"),
            role: String::from("ADMIN"),
        };
        let summary = creator_summary(&admin, None, None);
        assert_eq!(summary.role, "ADMIN");
        assert_eq!(summary.id, 1);
    }

    #[test]
    fn only_draft_and_published_are_valid_statuses() {
        assert!(is_valid_status("DRAFT"));
        assert!(is_valid_status("PUBLISHED"));
        assert!(!is_valid_status("READY"));
        assert!(!is_valid_status("draft"));
    }

    #[test]
    fn negative_audience_size_is_rejected() {
        let body = ProfileBody {
            bio: None,
            platform_links: None,
            audience_size: Some(-5),
            category: None,
        };
        assert!(body.validate().is_err());

        let body = ProfileBody {
            audience_size: Some(1200),
            ..body
        };
        assert!(body.validate().is_ok());
    }
}
