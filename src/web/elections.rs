//! Election management endpoints, institution scope.
//!
//! Elections are created once with their full candidate list and are never
//! edited afterwards; deletion is the only mutation. All lookups by id are
//! scoped to the caller's institution and answer 404 for anything else, so
//! another tenant's election ids are indistinguishable from unused ids.

use crate::db::get_db_pool;
use crate::middleware::InstitutionCtx;
use crate::orm::{clubs, election_candidates, election_votes, elections, users};
use actix_web::{delete, error, get, post, web, Error, HttpResponse, Responder};
use chrono::{NaiveDateTime, Utc};
use rand::{distributions::Alphanumeric, Rng};
use sea_orm::{entity::*, query::*, ActiveValue::Set, ColumnTrait, EntityTrait};
use serde::{Deserialize, Serialize};
use serde_json::json;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(create_election)
        .service(list_elections)
        .service(election_results)
        .service(delete_election);
}

const ACCESS_CODE_LENGTH: usize = 10;

/// Generate an access code that is not already in use. Collisions are
/// practically negligible at this length, but uniqueness is part of the
/// contract, so the loop re-checks rather than hoping.
async fn generate_access_code(db: &sea_orm::DatabaseConnection) -> Result<String, sea_orm::DbErr> {
    loop {
        let code: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(ACCESS_CODE_LENGTH)
            .map(char::from)
            .collect();

        let taken = elections::Entity::find()
            .filter(elections::Column::AccessCode.eq(code.clone()))
            .one(db)
            .await?
            .is_some();
        if !taken {
            return Ok(code);
        }
    }
}

/// Resolve a candidate's display name: the linked member's name when there
/// is one, else the free-text name recorded at creation.
pub(super) fn display_name(
    candidate: &election_candidates::Model,
    user: Option<&users::Model>,
) -> String {
    match (user, &candidate.candidate_name) {
        (Some(user), _) => user.name.clone(),
        (None, Some(name)) => name.clone(),
        // Unreachable for rows created through the API; creation requires
        // one of the two.
        (None, None) => "Unknown candidate".to_owned(),
    }
}

#[derive(Deserialize)]
pub struct CreateElectionForm {
    pub club_id: Option<i32>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_time: Option<NaiveDateTime>,
    pub end_time: Option<NaiveDateTime>,
    /// Existing member accounts running as candidates.
    #[serde(default)]
    pub member_ids: Vec<i32>,
    /// Free-text names for candidates without accounts. The client trims
    /// and de-duplicates; the server takes them as given.
    #[serde(default)]
    pub candidate_names: Vec<String>,
}

#[post("/api/institution/elections")]
pub async fn create_election(
    client: InstitutionCtx,
    form: web::Json<CreateElectionForm>,
) -> Result<impl Responder, Error> {
    client.require_admin_or_coordinator()?;

    let mut missing = Vec::new();
    if form.title.as_deref().map_or(true, |t| t.trim().is_empty()) {
        missing.push("title");
    }
    if form.club_id.is_none() {
        missing.push("club_id");
    }
    if form.start_time.is_none() {
        missing.push("start_time");
    }
    if form.end_time.is_none() {
        missing.push("end_time");
    }
    let (club_id, title, start_time, end_time) = match (
        form.club_id,
        form.title.as_deref().map(str::trim),
        form.start_time,
        form.end_time,
    ) {
        (Some(club_id), Some(title), Some(start_time), Some(end_time)) if missing.is_empty() => {
            (club_id, title.to_owned(), start_time, end_time)
        }
        _ => {
            return Err(error::ErrorBadRequest(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }
    };

    let candidate_names: Vec<String> = form
        .candidate_names
        .iter()
        .map(|n| n.trim().to_owned())
        .filter(|n| !n.is_empty())
        .collect();
    if form.member_ids.is_empty() && candidate_names.is_empty() {
        return Err(error::ErrorBadRequest("At least one candidate is required"));
    }

    let db = get_db_pool();

    // Cross-tenant write check: the target club must be the caller's own.
    let club = clubs::Entity::find_by_id(club_id)
        .one(db)
        .await
        .map_err(error::ErrorInternalServerError)?
        .ok_or_else(|| error::ErrorNotFound("Club not found"))?;
    if club.institution_id != Some(client.institution_id()) {
        return Err(error::ErrorForbidden(
            "Club does not belong to your institution",
        ));
    }

    // Member-linked candidates must be members of that club.
    if !form.member_ids.is_empty() {
        let members = users::Entity::find()
            .filter(users::Column::ClubId.eq(club.id))
            .filter(users::Column::Id.is_in(form.member_ids.clone()))
            .all(db)
            .await
            .map_err(error::ErrorInternalServerError)?;
        if members.len() != form.member_ids.len() {
            return Err(error::ErrorBadRequest("Invalid member selected"));
        }
    }

    let access_code = generate_access_code(db)
        .await
        .map_err(error::ErrorInternalServerError)?;
    let now = Utc::now().naive_utc();

    let election = elections::ActiveModel {
        club_id: Set(club.id),
        institution_id: Set(client.institution_id()),
        title: Set(title),
        description: Set(form.description.clone()),
        start_time: Set(start_time),
        end_time: Set(end_time),
        status: Set("scheduled".to_owned()),
        access_code: Set(access_code),
        created_at: Set(now),
        ..Default::default()
    };
    let election = election
        .insert(db)
        .await
        .map_err(error::ErrorInternalServerError)?;

    // Both candidate sources are processed independently.
    for member_id in &form.member_ids {
        let candidate = election_candidates::ActiveModel {
            election_id: Set(election.id),
            user_id: Set(Some(*member_id)),
            candidate_name: Set(None),
            vote_count: Set(0),
            created_at: Set(now),
            ..Default::default()
        };
        candidate
            .insert(db)
            .await
            .map_err(error::ErrorInternalServerError)?;
    }
    for name in &candidate_names {
        let candidate = election_candidates::ActiveModel {
            election_id: Set(election.id),
            user_id: Set(None),
            candidate_name: Set(Some(name.clone())),
            vote_count: Set(0),
            created_at: Set(now),
            ..Default::default()
        };
        candidate
            .insert(db)
            .await
            .map_err(error::ErrorInternalServerError)?;
    }

    Ok(HttpResponse::Ok().json(election))
}

#[derive(Serialize)]
struct ElectionSummary {
    #[serde(flatten)]
    election: elections::Model,
    club_name: Option<String>,
    /// Derived from the clock, unlike the stored status column.
    voting_state: &'static str,
}

fn state_label(state: crate::orm::elections::VotingState) -> &'static str {
    use crate::orm::elections::VotingState;
    match state {
        VotingState::NotStarted => "not_started",
        VotingState::Open => "open",
        VotingState::Closed => "closed",
    }
}

#[get("/api/institution/elections")]
pub async fn list_elections(client: InstitutionCtx) -> Result<impl Responder, Error> {
    let rows = elections::Entity::find()
        .filter(elections::Column::InstitutionId.eq(client.institution_id()))
        .order_by_desc(elections::Column::CreatedAt)
        .find_also_related(clubs::Entity)
        .all(get_db_pool())
        .await
        .map_err(error::ErrorInternalServerError)?;

    let now = Utc::now().naive_utc();
    let response: Vec<ElectionSummary> = rows
        .into_iter()
        .map(|(election, club)| ElectionSummary {
            voting_state: state_label(election.voting_state(now)),
            club_name: club.map(|c| c.name),
            election,
        })
        .collect();

    Ok(HttpResponse::Ok().json(response))
}

#[derive(Serialize)]
struct CandidateResult {
    id: i32,
    name: String,
    vote_count: i32,
}

/// Tally an election. The maintained per-candidate counter is
/// authoritative; vote rows are never scanned. Unsorted; the caller sorts
/// for presentation.
#[get("/api/institution/elections/{id}/results")]
pub async fn election_results(
    client: InstitutionCtx,
    path: web::Path<i32>,
) -> Result<impl Responder, Error> {
    let db = get_db_pool();

    let election = elections::Entity::find_by_id(path.into_inner())
        .filter(elections::Column::InstitutionId.eq(client.institution_id()))
        .one(db)
        .await
        .map_err(error::ErrorInternalServerError)?
        .ok_or_else(|| error::ErrorNotFound("Election not found"))?;

    let candidates = election_candidates::Entity::find()
        .filter(election_candidates::Column::ElectionId.eq(election.id))
        .find_also_related(users::Entity)
        .all(db)
        .await
        .map_err(error::ErrorInternalServerError)?;

    let results: Vec<CandidateResult> = candidates
        .into_iter()
        .map(|(candidate, user)| CandidateResult {
            id: candidate.id,
            name: display_name(&candidate, user.as_ref()),
            vote_count: candidate.vote_count,
        })
        .collect();

    Ok(HttpResponse::Ok().json(json!({
        "election": election,
        "results": results,
    })))
}

/// Delete an election with its votes and candidates, children first, in
/// one transaction.
#[delete("/api/institution/elections/{id}")]
pub async fn delete_election(
    client: InstitutionCtx,
    path: web::Path<i32>,
) -> Result<impl Responder, Error> {
    client.require_admin_or_coordinator()?;

    let db = get_db_pool();
    let election = elections::Entity::find_by_id(path.into_inner())
        .filter(elections::Column::InstitutionId.eq(client.institution_id()))
        .one(db)
        .await
        .map_err(error::ErrorInternalServerError)?
        .ok_or_else(|| error::ErrorNotFound("Election not found"))?;

    let txn = db.begin().await.map_err(error::ErrorInternalServerError)?;

    election_votes::Entity::delete_many()
        .filter(election_votes::Column::ElectionId.eq(election.id))
        .exec(&txn)
        .await
        .map_err(error::ErrorInternalServerError)?;

    election_candidates::Entity::delete_many()
        .filter(election_candidates::Column::ElectionId.eq(election.id))
        .exec(&txn)
        .await
        .map_err(error::ErrorInternalServerError)?;

    elections::Entity::delete_by_id(election.id)
        .exec(&txn)
        .await
        .map_err(error::ErrorInternalServerError)?;

    txn.commit()
        .await
        .map_err(error::ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Election deleted" })))
}
