//! Public voting endpoints.
//!
//! No authentication: the voting page is reached through the election's
//! access code alone. Repeat submissions from the same browser are
//! suppressed with a per-election cookie token. This is best-effort
//! duplicate suppression for casual reuse, not a tamper-resistant
//! guarantee; clearing cookies defeats it.

use crate::app_config;
use crate::db::get_db_pool;
use crate::orm::elections::VotingState;
use crate::orm::{clubs, election_candidates, election_votes, elections, institutions, users};
use actix_web::cookie::{time::Duration, Cookie, SameSite};
use actix_web::{error, get, post, web, Error, HttpRequest, HttpResponse, Responder};
use chrono::Utc;
use sea_orm::{entity::*, query::*, sea_query::Expr, ColumnTrait, EntityTrait};
use serde::{Deserialize, Serialize};
use serde_json::json;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(view_election).service(cast_vote);
}

fn vote_cookie_name(access_code: &str) -> String {
    format!("vote_token_{}", access_code)
}

fn mint_voter_token() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

#[derive(Serialize)]
struct PublicCandidate {
    id: i32,
    name: String,
    role: Option<String>,
}

/// Election detail for the voting page. Only public fields: no vote
/// counts, no internal identifiers beyond the candidate ids needed to
/// submit a ballot.
#[get("/api/elections/{access_code}")]
pub async fn view_election(path: web::Path<String>) -> Result<impl Responder, Error> {
    let access_code = path.into_inner();
    let db = get_db_pool();

    let election = elections::Entity::find()
        .filter(elections::Column::AccessCode.eq(access_code))
        .one(db)
        .await
        .map_err(error::ErrorInternalServerError)?
        .ok_or_else(|| error::ErrorNotFound("Election not found"))?;

    let club = clubs::Entity::find_by_id(election.club_id)
        .one(db)
        .await
        .map_err(error::ErrorInternalServerError)?;
    let institution = institutions::Entity::find_by_id(election.institution_id)
        .one(db)
        .await
        .map_err(error::ErrorInternalServerError)?;

    let candidates: Vec<PublicCandidate> = election_candidates::Entity::find()
        .filter(election_candidates::Column::ElectionId.eq(election.id))
        .find_also_related(users::Entity)
        .all(db)
        .await
        .map_err(error::ErrorInternalServerError)?
        .into_iter()
        .map(|(candidate, user)| PublicCandidate {
            id: candidate.id,
            name: super::elections::display_name(&candidate, user.as_ref()),
            role: user.map(|u| u.role),
        })
        .collect();

    Ok(HttpResponse::Ok().json(json!({
        "title": election.title,
        "description": election.description,
        "startTime": election.start_time,
        "endTime": election.end_time,
        "clubName": club.map(|c| c.name),
        "institutionName": institution.map(|i| i.name),
        "candidates": candidates,
    })))
}

#[derive(Deserialize)]
pub struct VoteForm {
    pub candidate_id: Option<i32>,
}

/// Cast a vote. The accepted ballot is recorded in two places that are
/// deliberately unlinkable: the candidate's counter goes up by one, and an
/// election_votes row marks the voter token as spent. Nothing ties the
/// token to the chosen candidate.
#[post("/api/elections/{access_code}/vote")]
pub async fn cast_vote(
    req: HttpRequest,
    path: web::Path<String>,
    form: web::Json<VoteForm>,
) -> Result<impl Responder, Error> {
    let access_code = path.into_inner();
    let db = get_db_pool();

    let election = elections::Entity::find()
        .filter(elections::Column::AccessCode.eq(access_code.clone()))
        .one(db)
        .await
        .map_err(error::ErrorInternalServerError)?
        .ok_or_else(|| error::ErrorNotFound("Election not found"))?;

    let candidate_id = form
        .candidate_id
        .ok_or_else(|| error::ErrorBadRequest("Candidate id is required"))?;

    match election.voting_state(Utc::now().naive_utc()) {
        VotingState::NotStarted => {
            return Err(error::ErrorBadRequest("This election has not started yet"));
        }
        VotingState::Closed => {
            return Err(error::ErrorBadRequest("This election has ended"));
        }
        VotingState::Open => {}
    }

    // An existing cookie for this election means this browser may already
    // have voted here.
    let cookie_token = req
        .cookie(&vote_cookie_name(&election.access_code))
        .map(|c| c.value().to_owned());

    if let Some(token) = &cookie_token {
        let existing = election_votes::Entity::find()
            .filter(election_votes::Column::ElectionId.eq(election.id))
            .filter(election_votes::Column::VoterToken.eq(token.clone()))
            .one(db)
            .await
            .map_err(error::ErrorInternalServerError)?;
        if existing.is_some() {
            return Err(error::ErrorForbidden(
                "You have already voted in this election",
            ));
        }
    }

    let candidate = election_candidates::Entity::find_by_id(candidate_id)
        .one(db)
        .await
        .map_err(error::ErrorInternalServerError)?
        .filter(|c| c.election_id == election.id)
        .ok_or_else(|| error::ErrorBadRequest("Invalid candidate selected"))?;

    // Reuse the cookie's token when present so a browser keeps one stable
    // identity across elections; otherwise mint a fresh one.
    let voter_token = cookie_token.unwrap_or_else(mint_voter_token);

    let vote = election_votes::ActiveModel {
        election_id: Set(election.id),
        voter_token: Set(voter_token.clone()),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    };
    match vote.insert(db).await {
        Ok(_) => {}
        // The unique (election_id, voter_token) index is the authoritative
        // duplicate gate; a violation means a concurrent request with the
        // same token won the race.
        Err(err) if err.to_string().contains("duplicate key") => {
            return Err(error::ErrorForbidden(
                "You have already voted in this election",
            ));
        }
        Err(err) => return Err(error::ErrorInternalServerError(err)),
    }

    // Single atomic UPDATE, never read-modify-write; concurrent accepted
    // votes must each count exactly once.
    election_candidates::Entity::update_many()
        .col_expr(
            election_candidates::Column::VoteCount,
            Expr::col(election_candidates::Column::VoteCount).add(1),
        )
        .filter(election_candidates::Column::Id.eq(candidate.id))
        .exec(db)
        .await
        .map_err(error::ErrorInternalServerError)?;

    let production = app_config::is_production();
    let cookie = Cookie::build(vote_cookie_name(&election.access_code), voter_token)
        .path("/")
        .max_age(Duration::days(365))
        .http_only(true)
        .secure(production)
        .same_site(if production {
            SameSite::None
        } else {
            SameSite::Lax
        })
        .finish();

    // No ballot content in the response.
    Ok(HttpResponse::Ok()
        .cookie(cookie)
        .json(json!({ "message": "Vote recorded" })))
}
