//! Test fixtures for creating test data
#![allow(dead_code)]
#![allow(clippy::needless_update)]

use chrono::{Duration, Utc};
use clubhub::orm::{
    clubs, election_candidates, elections, institution_users, institutions, users,
};
use sea_orm::{entity::*, ActiveValue::Set, DatabaseConnection, DbErr};

pub async fn create_test_institution(
    db: &DatabaseConnection,
    name: &str,
    code: &str,
) -> Result<institutions::Model, DbErr> {
    institutions::ActiveModel {
        name: Set(name.to_string()),
        kind: Set("University".to_string()),
        code: Set(code.to_string()),
        phone: Set(None),
        admin_email: Set(Some(format!("admin@{}.test", code.to_lowercase()))),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(db)
    .await
}

/// Create an institution user. `role` is "admin", "coordinator" or
/// "department_head"; `department` being Some implies department scope.
pub async fn create_institution_user(
    db: &DatabaseConnection,
    institution_id: i32,
    email: &str,
    role: &str,
    department: Option<&str>,
) -> Result<institution_users::Model, DbErr> {
    let password = clubhub::session::hash_password("password123")
        .map_err(|e| DbErr::Custom(format!("Password hashing failed: {}", e)))?;

    institution_users::ActiveModel {
        institution_id: Set(institution_id),
        name: Set(email.split('@').next().unwrap_or("user").to_string()),
        email: Set(email.to_string()),
        password: Set(password),
        phone: Set(None),
        role: Set(role.to_string()),
        department: Set(department.map(|d| d.to_string())),
        scope: Set(if department.is_some() {
            "department".to_string()
        } else {
            "all".to_string()
        }),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn create_test_club(
    db: &DatabaseConnection,
    institution_id: Option<i32>,
    name: &str,
    club_code: &str,
    department: Option<&str>,
) -> Result<clubs::Model, DbErr> {
    clubs::ActiveModel {
        institution_id: Set(institution_id),
        name: Set(name.to_string()),
        college_name: Set("Test College".to_string()),
        department: Set(department.map(|d| d.to_string())),
        description: Set(None),
        club_code: Set(club_code.to_string()),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn create_test_member(
    db: &DatabaseConnection,
    club_id: i32,
    name: &str,
    email: &str,
    role: &str,
) -> Result<users::Model, DbErr> {
    let password = clubhub::session::hash_password("password123")
        .map_err(|e| DbErr::Custom(format!("Password hashing failed: {}", e)))?;

    users::ActiveModel {
        club_id: Set(club_id),
        name: Set(name.to_string()),
        email: Set(email.to_string()),
        password: Set(password),
        phone: Set(None),
        id_number: Set(None),
        role: Set(role.to_string()),
        role_id: Set(None),
        is_president: Set(role == "President"),
        can_login: Set(role != "Member"),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(db)
    .await
}

/// Create an election whose voting window is offset from now by the given
/// second counts. `(-10, 100)` is open; `(10, 100)` has not started;
/// `(-100, -10)` has ended.
pub async fn create_test_election(
    db: &DatabaseConnection,
    club_id: i32,
    institution_id: i32,
    title: &str,
    access_code: &str,
    start_offset_secs: i64,
    end_offset_secs: i64,
) -> Result<elections::Model, DbErr> {
    let now = Utc::now().naive_utc();
    elections::ActiveModel {
        club_id: Set(club_id),
        institution_id: Set(institution_id),
        title: Set(title.to_string()),
        description: Set(None),
        start_time: Set(now + Duration::seconds(start_offset_secs)),
        end_time: Set(now + Duration::seconds(end_offset_secs)),
        status: Set("scheduled".to_string()),
        access_code: Set(access_code.to_string()),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
}

/// Create a candidate. Exactly one of `user_id` / `name` should be given.
pub async fn create_test_candidate(
    db: &DatabaseConnection,
    election_id: i32,
    user_id: Option<i32>,
    name: Option<&str>,
) -> Result<election_candidates::Model, DbErr> {
    election_candidates::ActiveModel {
        election_id: Set(election_id),
        user_id: Set(user_id),
        candidate_name: Set(name.map(|n| n.to_string())),
        vote_count: Set(0),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(db)
    .await
}

/// Bearer token for an institution user.
pub fn institution_token(user_id: i32) -> String {
    clubhub::session::issue_token(user_id, clubhub::session::TokenScope::Institution)
        .expect("Failed to issue institution token")
}

/// Bearer token for a club member.
pub fn club_token(user_id: i32) -> String {
    clubhub::session::issue_token(user_id, clubhub::session::TokenScope::Club)
        .expect("Failed to issue club token")
}
