//! Finance endpoints, club scope.
//!
//! Entries start Pending; approval is a separate permission so treasurers
//! can record transactions a president signs off on.

use crate::db::get_db_pool;
use crate::middleware::ClubCtx;
use crate::orm::finance;
use actix_web::{error, get, patch, post, web, Error, HttpResponse, Responder};
use chrono::Utc;
use sea_orm::{entity::*, query::*, ActiveValue::Set, ColumnTrait, EntityTrait};
use serde::Deserialize;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(list_finance)
        .service(create_finance_entry)
        .service(approve_finance_entry);
}

#[derive(Deserialize)]
pub struct FinanceForm {
    pub transaction_name: String,
    /// "income" or "expense"
    pub kind: String,
    pub amount: f64,
}

#[get("/api/finance")]
pub async fn list_finance(client: ClubCtx) -> Result<impl Responder, Error> {
    let entries = finance::Entity::find()
        .filter(finance::Column::ClubId.eq(client.club_id()))
        .order_by_desc(finance::Column::CreatedAt)
        .all(get_db_pool())
        .await
        .map_err(error::ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(entries))
}

#[post("/api/finance")]
pub async fn create_finance_entry(
    client: ClubCtx,
    form: web::Json<FinanceForm>,
) -> Result<impl Responder, Error> {
    client.require_permission("manage_finance")?;

    if form.transaction_name.trim().is_empty() {
        return Err(error::ErrorBadRequest("Transaction name is required"));
    }
    if form.kind != "income" && form.kind != "expense" {
        return Err(error::ErrorBadRequest(
            "Transaction kind must be income or expense",
        ));
    }
    if !form.amount.is_finite() || form.amount <= 0.0 {
        return Err(error::ErrorBadRequest("Amount must be positive"));
    }

    let entry = finance::ActiveModel {
        club_id: Set(client.club_id()),
        transaction_name: Set(form.transaction_name.trim().to_owned()),
        kind: Set(form.kind.clone()),
        amount: Set(form.amount),
        status: Set("Pending".to_owned()),
        approved_by_id: Set(None),
        created_by_id: Set(client.user_id()),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    };
    let entry = entry
        .insert(get_db_pool())
        .await
        .map_err(error::ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(entry))
}

#[patch("/api/finance/{id}/approve")]
pub async fn approve_finance_entry(
    client: ClubCtx,
    path: web::Path<i32>,
) -> Result<impl Responder, Error> {
    client.require_permission("approve_finance")?;

    let db = get_db_pool();
    let entry = finance::Entity::find_by_id(path.into_inner())
        .one(db)
        .await
        .map_err(error::ErrorInternalServerError)?
        .filter(|f| f.club_id == client.club_id())
        .ok_or_else(|| error::ErrorNotFound("Transaction not found"))?;

    if entry.status == "Approved" {
        return Err(error::ErrorBadRequest("Transaction already approved"));
    }

    let mut active: finance::ActiveModel = entry.into();
    active.status = Set("Approved".to_owned());
    active.approved_by_id = Set(Some(client.user_id()));

    let entry = active
        .update(db)
        .await
        .map_err(error::ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(entry))
}
