//! Integration tests for election creation, results and deletion

mod common;
use serial_test::serial;

use actix_web::{test, App};
use chrono::{Duration, Utc};
use common::{database::*, fixtures::*};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde_json::json;

fn iso(offset_secs: i64) -> String {
    (Utc::now().naive_utc() + Duration::seconds(offset_secs))
        .format("%Y-%m-%dT%H:%M:%S")
        .to_string()
}

#[actix_rt::test]
#[serial]
async fn test_create_election_with_both_candidate_kinds() {
    let db = setup_test_database()
        .await
        .expect("Failed to connect to test database");
    cleanup_test_data(db).await.expect("Failed to cleanup");

    let institution = create_test_institution(db, "Inst", "INST01")
        .await
        .expect("institution");
    let admin = create_institution_user(db, institution.id, "admin@inst.test", "admin", None)
        .await
        .expect("admin");
    let club = create_test_club(db, Some(institution.id), "Chess Club", "CHESS01", None)
        .await
        .expect("club");
    let member = create_test_member(db, club.id, "Alice", "alice@test.com", "Member")
        .await
        .expect("member");

    let app = test::init_service(App::new().configure(clubhub::web::configure)).await;

    let req = test::TestRequest::post()
        .uri("/api/institution/elections")
        .insert_header(("Authorization", format!("Bearer {}", institution_token(admin.id))))
        .set_json(json!({
            "club_id": club.id,
            "title": "  President 2026  ",
            "start_time": iso(60),
            "end_time": iso(3600),
            "member_ids": [member.id],
            "candidate_names": ["  Bob  ", "", "   "],
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["title"], "President 2026");
    let access_code = body["access_code"].as_str().expect("access code");
    assert_eq!(access_code.len(), 10);

    let election_id = body["id"].as_i64().expect("id") as i32;
    let candidates = clubhub::orm::election_candidates::Entity::find()
        .filter(clubhub::orm::election_candidates::Column::ElectionId.eq(election_id))
        .all(db)
        .await
        .expect("candidates");
    // The member plus one trimmed free-text name; blank names dropped.
    assert_eq!(candidates.len(), 2);
    assert!(candidates
        .iter()
        .any(|c| c.user_id == Some(member.id) && c.candidate_name.is_none()));
    assert!(candidates
        .iter()
        .any(|c| c.user_id.is_none() && c.candidate_name.as_deref() == Some("Bob")));
}

#[actix_rt::test]
#[serial]
async fn test_create_election_validation() {
    let db = setup_test_database()
        .await
        .expect("Failed to connect to test database");
    cleanup_test_data(db).await.expect("Failed to cleanup");

    let institution = create_test_institution(db, "Inst", "INST01")
        .await
        .expect("institution");
    let admin = create_institution_user(db, institution.id, "admin@inst.test", "admin", None)
        .await
        .expect("admin");
    let club = create_test_club(db, Some(institution.id), "Chess Club", "CHESS01", None)
        .await
        .expect("club");

    let app = test::init_service(App::new().configure(clubhub::web::configure)).await;
    let auth = ("Authorization", format!("Bearer {}", institution_token(admin.id)));

    // Missing fields are reported together.
    let req = test::TestRequest::post()
        .uri("/api/institution/elections")
        .insert_header(auth.clone())
        .set_json(json!({ "candidate_names": ["Bob"] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body = test::read_body(resp).await;
    let message = String::from_utf8_lossy(&body);
    assert!(message.contains("title"));
    assert!(message.contains("club_id"));
    assert!(message.contains("start_time"));
    assert!(message.contains("end_time"));

    // No candidates at all.
    let req = test::TestRequest::post()
        .uri("/api/institution/elections")
        .insert_header(auth.clone())
        .set_json(json!({
            "club_id": club.id,
            "title": "Empty",
            "start_time": iso(60),
            "end_time": iso(3600),
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    // Unauthenticated.
    let req = test::TestRequest::post()
        .uri("/api/institution/elections")
        .set_json(json!({
            "club_id": club.id,
            "title": "Anon",
            "start_time": iso(60),
            "end_time": iso(3600),
            "candidate_names": ["Bob"],
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);

    assert!(clubhub::orm::elections::Entity::find()
        .all(db)
        .await
        .expect("elections query")
        .is_empty());
}

#[actix_rt::test]
#[serial]
async fn test_create_election_rejects_foreign_club() {
    let db = setup_test_database()
        .await
        .expect("Failed to connect to test database");
    cleanup_test_data(db).await.expect("Failed to cleanup");

    let inst_a = create_test_institution(db, "Inst A", "INSTA1")
        .await
        .expect("institution a");
    let inst_b = create_test_institution(db, "Inst B", "INSTB1")
        .await
        .expect("institution b");
    let admin_a = create_institution_user(db, inst_a.id, "admin@a.test", "admin", None)
        .await
        .expect("admin a");
    let club_b = create_test_club(db, Some(inst_b.id), "Foreign Club", "FOREIGN1", None)
        .await
        .expect("club b");

    let app = test::init_service(App::new().configure(clubhub::web::configure)).await;

    let req = test::TestRequest::post()
        .uri("/api/institution/elections")
        .insert_header(("Authorization", format!("Bearer {}", institution_token(admin_a.id))))
        .set_json(json!({
            "club_id": club_b.id,
            "title": "Hostile",
            "start_time": iso(60),
            "end_time": iso(3600),
            "candidate_names": ["Bob"],
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 403, "cross-tenant club must be rejected");
}

#[actix_rt::test]
#[serial]
async fn test_results_use_maintained_counters() {
    let db = setup_test_database()
        .await
        .expect("Failed to connect to test database");
    cleanup_test_data(db).await.expect("Failed to cleanup");

    let institution = create_test_institution(db, "Inst", "INST01")
        .await
        .expect("institution");
    let admin = create_institution_user(db, institution.id, "admin@inst.test", "admin", None)
        .await
        .expect("admin");
    let club = create_test_club(db, Some(institution.id), "Chess Club", "CHESS01", None)
        .await
        .expect("club");
    let election = create_test_election(db, club.id, institution.id, "Vote", "resultcode", -10, 100)
        .await
        .expect("election");
    let alice = create_test_candidate(db, election.id, None, Some("Alice"))
        .await
        .expect("candidate");
    create_test_candidate(db, election.id, None, Some("Bob"))
        .await
        .expect("candidate");

    let app = test::init_service(App::new().configure(clubhub::web::configure)).await;

    // Two ballots for Alice through the public endpoint.
    for _ in 0..2 {
        let req = test::TestRequest::post()
            .uri("/api/elections/resultcode/vote")
            .set_json(json!({ "candidate_id": alice.id }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
    }

    let req = test::TestRequest::get()
        .uri(&format!("/api/institution/elections/{}/results", election.id))
        .insert_header(("Authorization", format!("Bearer {}", institution_token(admin.id))))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    let results = body["results"].as_array().expect("results array");
    assert_eq!(results.len(), 2);
    let alice_row = results
        .iter()
        .find(|r| r["name"] == "Alice")
        .expect("Alice in results");
    let bob_row = results
        .iter()
        .find(|r| r["name"] == "Bob")
        .expect("Bob in results");
    assert_eq!(alice_row["vote_count"], 2);
    assert_eq!(bob_row["vote_count"], 0);
}

#[actix_rt::test]
#[serial]
async fn test_delete_election_cascades() {
    let db = setup_test_database()
        .await
        .expect("Failed to connect to test database");
    cleanup_test_data(db).await.expect("Failed to cleanup");

    let institution = create_test_institution(db, "Inst", "INST01")
        .await
        .expect("institution");
    let admin = create_institution_user(db, institution.id, "admin@inst.test", "admin", None)
        .await
        .expect("admin");
    let club = create_test_club(db, Some(institution.id), "Chess Club", "CHESS01", None)
        .await
        .expect("club");
    let election = create_test_election(db, club.id, institution.id, "Doomed", "doomedcode", -10, 100)
        .await
        .expect("election");
    let candidate = create_test_candidate(db, election.id, None, Some("Alice"))
        .await
        .expect("candidate");

    let app = test::init_service(App::new().configure(clubhub::web::configure)).await;

    // Record one vote so the cascade has something in every child table.
    let req = test::TestRequest::post()
        .uri("/api/elections/doomedcode/vote")
        .set_json(json!({ "candidate_id": candidate.id }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/institution/elections/{}", election.id))
        .insert_header(("Authorization", format!("Bearer {}", institution_token(admin.id))))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    assert!(clubhub::orm::elections::Entity::find()
        .all(db)
        .await
        .expect("elections query")
        .is_empty());
    assert!(clubhub::orm::election_candidates::Entity::find()
        .all(db)
        .await
        .expect("candidates query")
        .is_empty());
    assert!(clubhub::orm::election_votes::Entity::find()
        .all(db)
        .await
        .expect("votes query")
        .is_empty());

    // The public page is gone with it.
    let req = test::TestRequest::get()
        .uri("/api/elections/doomedcode")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}
