//! Integration tests for login and the membership application flow

mod common;
use serial_test::serial;

use actix_web::{test, App};
use common::{database::*, fixtures::*};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde_json::json;

#[actix_rt::test]
#[serial]
async fn test_club_login() {
    let db = setup_test_database()
        .await
        .expect("Failed to connect to test database");
    cleanup_test_data(db).await.expect("Failed to cleanup");

    let institution = create_test_institution(db, "Inst", "INST01")
        .await
        .expect("institution");
    let club = create_test_club(db, Some(institution.id), "Chess Club", "CHESS01", None)
        .await
        .expect("club");
    let president = create_test_member(db, club.id, "Prez", "prez@test.com", "President")
        .await
        .expect("president");
    create_test_member(db, club.id, "Plain", "plain@test.com", "Member")
        .await
        .expect("plain member");

    let app = test::init_service(App::new().configure(clubhub::web::configure)).await;

    // Valid credentials for a login-enabled account.
    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "prez@test.com", "password": "password123" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(!body["token"].as_str().unwrap_or("").is_empty());
    assert_eq!(body["user"]["id"], president.id);
    assert_eq!(body["user"]["isPresident"], true);
    assert!(body["user"].get("password").is_none());

    // Wrong password.
    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "prez@test.com", "password": "wrong-password" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);

    // Plain members exist but cannot log in.
    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "plain@test.com", "password": "password123" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 403);

    // Unknown account.
    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "ghost@test.com", "password": "password123" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
}

#[actix_rt::test]
#[serial]
async fn test_institution_login() {
    let db = setup_test_database()
        .await
        .expect("Failed to connect to test database");
    cleanup_test_data(db).await.expect("Failed to cleanup");

    let institution = create_test_institution(db, "Inst", "INST01")
        .await
        .expect("institution");
    create_institution_user(db, institution.id, "admin@inst.test", "admin", None)
        .await
        .expect("admin");

    let app = test::init_service(App::new().configure(clubhub::web::configure)).await;

    let req = test::TestRequest::post()
        .uri("/api/institution/auth/login")
        .set_json(json!({ "email": "admin@inst.test", "password": "password123" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["user"]["institutionId"], institution.id);
    assert_eq!(body["user"]["scope"], "all");

    // The issued token actually works on an institution route.
    let token = body["token"].as_str().expect("token").to_owned();
    let req = test::TestRequest::get()
        .uri("/api/institution/clubs")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
}

#[actix_rt::test]
#[serial]
async fn test_application_approval_flow() {
    let db = setup_test_database()
        .await
        .expect("Failed to connect to test database");
    cleanup_test_data(db).await.expect("Failed to cleanup");

    let institution = create_test_institution(db, "Inst", "INST01")
        .await
        .expect("institution");
    let club = create_test_club(db, Some(institution.id), "Chess Club", "CHESS01", None)
        .await
        .expect("club");
    let president = create_test_member(db, club.id, "Prez", "prez@test.com", "President")
        .await
        .expect("president");

    let app = test::init_service(App::new().configure(clubhub::web::configure)).await;

    // Public application against the club code.
    let req = test::TestRequest::post()
        .uri("/api/members/apply")
        .set_json(json!({
            "club_code": "CHESS01",
            "name": "Newbie",
            "email": "newbie@test.com",
            "password": "longenough",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    // Duplicate email is refused while the first application is pending.
    let req = test::TestRequest::post()
        .uri("/api/members/apply")
        .set_json(json!({
            "club_code": "CHESS01",
            "name": "Newbie Again",
            "email": "newbie@test.com",
            "password": "longenough",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    // Short password fails validation.
    let req = test::TestRequest::post()
        .uri("/api/members/apply")
        .set_json(json!({
            "club_code": "CHESS01",
            "name": "Short",
            "email": "short@test.com",
            "password": "short",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let auth = ("Authorization", format!("Bearer {}", club_token(president.id)));

    // The president sees and approves the pending application.
    let req = test::TestRequest::get()
        .uri("/api/members/pending")
        .insert_header(auth.clone())
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    let pending = body.as_array().expect("pending list");
    assert_eq!(pending.len(), 1);
    let pending_id = pending[0]["id"].as_i64().expect("pending id");

    let req = test::TestRequest::post()
        .uri(&format!("/api/members/approve/{}", pending_id))
        .insert_header(auth.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let approved: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(approved["email"], "newbie@test.com");
    assert_eq!(approved["role"], "Member");
    assert_eq!(approved["can_login"], false);

    // The pending row is gone and the member row exists.
    assert!(clubhub::orm::pending_members::Entity::find()
        .all(db)
        .await
        .expect("pending query")
        .is_empty());
    let member = clubhub::orm::users::Entity::find()
        .filter(clubhub::orm::users::Column::Email.eq("newbie@test.com"))
        .one(db)
        .await
        .expect("user query")
        .expect("approved member exists");
    assert_eq!(member.club_id, club.id);

    // Approved members without login access still cannot log in.
    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "newbie@test.com", "password": "longenough" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 403);
}

#[actix_rt::test]
#[serial]
async fn test_pending_list_requires_permission() {
    let db = setup_test_database()
        .await
        .expect("Failed to connect to test database");
    cleanup_test_data(db).await.expect("Failed to cleanup");

    let institution = create_test_institution(db, "Inst", "INST01")
        .await
        .expect("institution");
    let club = create_test_club(db, Some(institution.id), "Chess Club", "CHESS01", None)
        .await
        .expect("club");
    // A non-committee role with login access but no committee permissions.
    let member = create_test_member(db, club.id, "Sec", "sec@test.com", "Volunteer")
        .await
        .expect("volunteer");

    let app = test::init_service(App::new().configure(clubhub::web::configure)).await;

    let req = test::TestRequest::get()
        .uri("/api/members/pending")
        .insert_header(("Authorization", format!("Bearer {}", club_token(member.id))))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 403);
}
