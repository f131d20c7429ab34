use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::Serialize;

use crate::schema::analytics_events;
use crate::schema::creator_profiles;
use crate::schema::users;
use crate::schema::users::columns::{created_at, email, id, is_verified, role};
use crate::schema::videos;
use crate::schema::waitlist_entries;

#[derive(Queryable, Serialize)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub is_verified: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = users)]
pub struct NewUser<'a> {
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: &'a str,
}

// Projection of a user that is safe to hand back to clients (no hash).
#[derive(Queryable, Serialize)]
pub struct SafeUser {
    pub id: i32,
    pub email: String,
    pub role: String,
    pub is_verified: bool,
    pub created_at: NaiveDateTime,
}

pub fn get_safe_user_fields() -> (id, email, role, is_verified, created_at) {
    (
        crate::schema::users::id,
        crate::schema::users::email,
        crate::schema::users::role,
        crate::schema::users::is_verified,
        crate::schema::users::created_at,
    )
}

impl From<&User> for SafeUser {
    fn from(user: &User) -> Self {
        SafeUser {
            id: user.id,
            email: user.email.clone(),
            role: user.role.clone(),
            is_verified: user.is_verified,
            created_at: user.created_at,
        }
    }
}

#[derive(Queryable, Serialize)]
pub struct CreatorProfile {
    pub id: i32,
    pub user_id: i32,
    pub bio: Option<String>,
    pub platform_links: Option<String>,
    pub audience_size: i32,
    pub category: Option<String>,
    pub approved_by_admin: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = creator_profiles)]
pub struct NewCreatorProfile<'a> {
    pub user_id: i32,
    pub bio: Option<&'a str>,
    pub platform_links: Option<&'a str>,
    pub audience_size: i32,
    pub category: Option<&'a str>,
}

#[derive(Queryable, Serialize)]
pub struct ProfileWithUser {
    pub id: i32,
    pub user_id: i32,
    pub bio: Option<String>,
    pub platform_links: Option<String>,
    pub audience_size: i32,
    pub category: Option<String>,
    pub approved_by_admin: bool,
    pub created_at: NaiveDateTime,
    pub user: SafeUser,
}

impl ProfileWithUser {
    pub fn new(profile: CreatorProfile, user: SafeUser) -> Self {
        ProfileWithUser {
            id: profile.id,
            user_id: profile.user_id,
            bio: profile.bio,
            platform_links: profile.platform_links,
            audience_size: profile.audience_size,
            category: profile.category,
            approved_by_admin: profile.approved_by_admin,
            created_at: profile.created_at,
            user,
        }
    }
}

#[derive(Queryable, Serialize)]
pub struct Video {
    pub id: i32,
    pub creator_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub video_url: String,
    pub thumbnail_url: Option<String>,
    pub tags: Vec<String>,
    pub category: Option<String>,
    pub status: String,
    pub views: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = videos)]
pub struct NewVideo<'a> {
    pub creator_id: i32,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub video_url: &'a str,
    pub thumbnail_url: Option<&'a str>,
    pub tags: Vec<String>,
    pub status: &'a str,
}

// Creator fields attached to a public video, profile parts optional since a
// left join is used (admins may edit videos without ever having a profile).
#[derive(Queryable, Serialize)]
pub struct CreatorSummary {
    pub id: i32,
    pub email: String,
    pub role: String,
    pub bio: Option<String>,
    pub category: Option<String>,
}

#[derive(Queryable, Serialize)]
pub struct VideoWithCreator {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub video_url: String,
    pub thumbnail_url: Option<String>,
    pub tags: Vec<String>,
    pub category: Option<String>,
    pub status: String,
    pub views: i32,
    pub created_at: NaiveDateTime,
    pub creator: CreatorSummary,
}

impl VideoWithCreator {
    pub fn new(video: Video, creator: CreatorSummary) -> Self {
        VideoWithCreator {
            id: video.id,
            title: video.title,
            description: video.description,
            video_url: video.video_url,
            thumbnail_url: video.thumbnail_url,
            tags: video.tags,
            category: video.category,
            status: video.status,
            views: video.views,
            created_at: video.created_at,
            creator,
        }
    }
}

#[derive(Insertable)]
#[diesel(table_name = analytics_events)]
pub struct NewAnalyticsEvent<'a> {
    pub video_id: i32,
    pub viewer_ip: &'a str,
}

#[derive(Queryable, Serialize)]
pub struct WaitlistEntry {
    pub id: i32,
    pub user_email: String,
    pub interested_in: String,
    pub note: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = waitlist_entries)]
pub struct NewWaitlistEntry<'a> {
    pub user_email: &'a str,
    pub interested_in: &'a str,
    pub note: Option<&'a str>,
}
