use actix_web::{delete, get, patch, web, HttpRequest, HttpResponse};
use diesel::prelude::*;
use serde::Deserialize;

use crate::envelope::ApiResponse;
use crate::errors::ApiError;
use crate::establish_connection;
use crate::extractors::auth::AuthUser;
use crate::helpers::requests::{client_ip, double_option};
use crate::models::{NewAnalyticsEvent, Video, VideoWithCreator};
use crate::schema::analytics_events::dsl::analytics_events;
use crate::schema::creator_profiles::dsl::creator_profiles;
use crate::schema::users::dsl::users;
use crate::schema::videos::columns::{created_at, id, status, views};
use crate::schema::videos::dsl::videos;

#[get("")]
pub async fn list_videos() -> Result<HttpResponse, ApiError> {
    let mut db = establish_connection()?;

    let items: Vec<VideoWithCreator> = videos
        .inner_join(users)
        .left_join(
            creator_profiles
                .on(crate::schema::creator_profiles::user_id.eq(crate::schema::users::id)),
        )
        .select((
            crate::schema::videos::id,
            crate::schema::videos::title,
            crate::schema::videos::description,
            crate::schema::videos::video_url,
            crate::schema::videos::thumbnail_url,
            crate::schema::videos::tags,
            crate::schema::videos::category,
            crate::schema::videos::status,
            crate::schema::videos::views,
            crate::schema::videos::created_at,
            (
                crate::schema::users::id,
                crate::schema::users::email,
                crate::schema::users::role,
                crate::schema::creator_profiles::bio.nullable(),
                crate::schema::creator_profiles::category.nullable(),
            ),
        ))
        .filter(status.eq("PUBLISHED"))
        .order(created_at.desc())
        .load::<VideoWithCreator>(&mut db)?;

    Ok(HttpResponse::Ok().json(ApiResponse::data(items)))
}

#[derive(Deserialize)]
pub struct VideoParams {
    pub video_id: i32,
}

#[get("/{video_id}")]
pub async fn get_video(
    params: web::Path<VideoParams>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let mut db = establish_connection()?;

    let result: Option<VideoWithCreator> = videos
        .inner_join(users)
        .left_join(
            creator_profiles
                .on(crate::schema::creator_profiles::user_id.eq(crate::schema::users::id)),
        )
        .select((
            crate::schema::videos::id,
            crate::schema::videos::title,
            crate::schema::videos::description,
            crate::schema::videos::video_url,
            crate::schema::videos::thumbnail_url,
            crate::schema::videos::tags,
            crate::schema::videos::category,
            crate::schema::videos::status,
            crate::schema::videos::views,
            crate::schema::videos::created_at,
            (
                crate::schema::users::id,
                crate::schema::users::email,
                crate::schema::users::role,
                crate::schema::creator_profiles::bio.nullable(),
                crate::schema::creator_profiles::category.nullable(),
            ),
        ))
        .filter(id.eq(params.video_id))
        .first::<VideoWithCreator>(&mut db)
        .optional()?;

    let video = result.ok_or_else(|| ApiError::NotFound(String::from("Video not found")))?;

    // Two independent best-effort writes. A lost play or analytics row is
    // tolerated; the fetch itself still succeeds.
    if let Err(err) = diesel::update(videos.find(params.video_id))
        .set(views.eq(views + 1))
        .execute(&mut db)
    {
        tracing::warn!(error = %err, video_id = params.video_id, "failed to increment view count");
    }

    let ip = client_ip(&req);
    let event = NewAnalyticsEvent {
        video_id: params.video_id,
        viewer_ip: &ip,
    };

    if let Err(err) = diesel::insert_into(analytics_events)
        .values(&event)
        .execute(&mut db)
    {
        tracing::warn!(error = %err, video_id = params.video_id, "failed to record view event");
    }

    Ok(HttpResponse::Ok().json(ApiResponse::data(video)))
}

#[derive(Deserialize)]
pub struct UpdateVideoBody {
    title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    category: Option<Option<String>>,
}

fn can_modify(video: &Video, caller: &AuthUser) -> bool {
    video.creator_id == caller.id || caller.role == "ADMIN"
}

// Title keeps its previous value when absent or blank.
fn merge_title(requested: Option<&str>, current: &str) -> String {
    match requested {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => current.to_string(),
    }
}

// Absent keeps the previous value; explicit null clears it.
fn merge_nullable(requested: Option<Option<String>>, current: Option<String>) -> Option<String> {
    match requested {
        Some(value) => value,
        None => current,
    }
}

#[patch("/{video_id}")]
pub async fn update_video(
    user: AuthUser,
    params: web::Path<VideoParams>,
    data: web::Json<UpdateVideoBody>,
) -> Result<HttpResponse, ApiError> {
    let mut db = establish_connection()?;

    let video = videos
        .find(params.video_id)
        .first::<Video>(&mut db)
        .optional()?
        .ok_or_else(|| ApiError::NotFound(String::from("Video not found")))?;

    if !can_modify(&video, &user) {
        return Err(ApiError::Forbidden(String::from(
            "You can only edit your own videos",
        )));
    }

    let new_title = merge_title(data.title.as_deref(), &video.title);
    let new_description = merge_nullable(data.description.clone(), video.description.clone());
    let new_category = merge_nullable(data.category.clone(), video.category.clone());

    let updated: Video = diesel::update(videos.find(params.video_id))
        .set((
            crate::schema::videos::title.eq(new_title),
            crate::schema::videos::description.eq(new_description),
            crate::schema::videos::category.eq(new_category),
        ))
        .get_result(&mut db)?;

    Ok(HttpResponse::Ok().json(ApiResponse::data(updated)))
}

#[delete("/{video_id}")]
pub async fn delete_video(
    user: AuthUser,
    params: web::Path<VideoParams>,
) -> Result<HttpResponse, ApiError> {
    let mut db = establish_connection()?;

    let video = videos
        .find(params.video_id)
        .first::<Video>(&mut db)
        .optional()?
        .ok_or_else(|| ApiError::NotFound(String::from("Video not found")))?;

    if !can_modify(&video, &user) {
        return Err(ApiError::Forbidden(String::from(
            "You can only delete your own videos",
        )));
    }

    // Analytics rows referencing the video are left in place.
    diesel::delete(videos.find(params.video_id)).execute(&mut db)?;

    Ok(HttpResponse::Ok().json(ApiResponse::message("Video deleted")))
}
