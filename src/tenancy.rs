//! Institution-scope tenant filtering.
//!
//! Every institution-scoped read re-derives the caller's visible club set
//! on each request. All scoped listings must go through this module; a
//! handler that filters by hand risks omitting the department restriction
//! and leaking another department's rows.

use crate::orm::{clubs, institution_users};
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter};

/// Resolve the club ids an institution user may see: every club of the
/// institution for `scope = all`, else only clubs whose department matches
/// the caller's assigned department.
pub async fn visible_club_ids(
    db: &DatabaseConnection,
    caller: &institution_users::Model,
) -> Result<Vec<i32>, DbErr> {
    let mut query =
        clubs::Entity::find().filter(clubs::Column::InstitutionId.eq(caller.institution_id));

    if caller.is_department_scoped() {
        // A department-scoped user with no assigned department sees nothing.
        query = query.filter(clubs::Column::Department.eq(caller.department.clone()));
    }

    Ok(query
        .all(db)
        .await?
        .into_iter()
        .map(|club| club.id)
        .collect())
}

/// Like [`visible_club_ids`], but returning the full club rows for
/// listings that render them.
pub async fn visible_clubs(
    db: &DatabaseConnection,
    caller: &institution_users::Model,
) -> Result<Vec<clubs::Model>, DbErr> {
    let mut query =
        clubs::Entity::find().filter(clubs::Column::InstitutionId.eq(caller.institution_id));

    if caller.is_department_scoped() {
        query = query.filter(clubs::Column::Department.eq(caller.department.clone()));
    }

    query.all(db).await
}
