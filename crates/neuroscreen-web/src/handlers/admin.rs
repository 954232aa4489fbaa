//! Administration pages and the JSON API behind them.

use axum::{
    extract::{Path, Query, State},
    response::{Html, Redirect},
    Json,
};
use minijinja::context;
use neuroscreen_common::{ApiError, Disease, NewRelation, RelationView, Role, Symptom, User};
use neuroscreen_db::{DiseaseRepository, RelationRepository, SymptomRepository, UserRepository};
use serde::Deserialize;
use tracing::info;
use crate::handlers::ApiMessage;
use crate::session::RequireAdmin;
use crate::state::SharedState;

#[derive(Debug, Deserialize, Default)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct RoleUpdate {
    pub role: Role,
}

// === Pages ===

/// GET /admin
pub async fn admin_root() -> Redirect {
    Redirect::to("/admin/dashboard")
}

/// GET /admin/dashboard
pub async fn admin_dashboard(
    State(state): State<SharedState>,
    RequireAdmin(admin): RequireAdmin,
) -> Result<Html<String>, ApiError> {
    let stats = state.db.stats().await?;
    state.templates.render("admin/dashboard.html", context! {
        title => "Admin Dashboard",
        user => admin,
        stats => stats,
    })
}

/// GET /admin/users
pub async fn users_page(
    State(state): State<SharedState>,
    RequireAdmin(admin): RequireAdmin,
) -> Result<Html<String>, ApiError> {
    let users = UserRepository::new(state.db.clone()).list("").await?;
    state.templates.render("admin/users.html", context! {
        title => "Users",
        user => admin,
        users => users,
    })
}

/// GET /admin/diseases
pub async fn diseases_page(
    State(state): State<SharedState>,
    RequireAdmin(admin): RequireAdmin,
) -> Result<Html<String>, ApiError> {
    let diseases = DiseaseRepository::new(state.db.clone()).list("").await?;
    state.templates.render("admin/diseases.html", context! {
        title => "Diseases",
        user => admin,
        diseases => diseases,
    })
}

/// GET /admin/symptoms
pub async fn symptoms_page(
    State(state): State<SharedState>,
    RequireAdmin(admin): RequireAdmin,
) -> Result<Html<String>, ApiError> {
    let symptoms = SymptomRepository::new(state.db.clone()).list("").await?;
    state.templates.render("admin/symptoms.html", context! {
        title => "Symptoms",
        user => admin,
        symptoms => symptoms,
    })
}

/// GET /admin/relations
pub async fn relations_page(
    State(state): State<SharedState>,
    RequireAdmin(admin): RequireAdmin,
) -> Result<Html<String>, ApiError> {
    let relations = RelationRepository::new(state.db.clone()).list().await?;
    let diseases = DiseaseRepository::new(state.db.clone()).list("").await?;
    let symptoms = SymptomRepository::new(state.db.clone()).list("").await?;
    state.templates.render("admin/relations.html", context! {
        title => "Relations",
        user => admin,
        relations => relations,
        diseases => diseases,
        symptoms => symptoms,
    })
}

// === Users API ===

/// GET /admin/api/users?q=
pub async fn api_list_users(
    State(state): State<SharedState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(UserRepository::new(state.db.clone()).list(&query.q).await?))
}

/// PUT /admin/api/users/{id} - role changes only.
pub async fn api_update_user(
    State(state): State<SharedState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<i64>,
    Json(body): Json<RoleUpdate>,
) -> Result<Json<ApiMessage>, ApiError> {
    UserRepository::new(state.db.clone()).update_role(id, body.role).await?;
    info!(admin_id = admin.id, user_id = id, role = %body.role, "User role changed");
    Ok(Json(ApiMessage::ok("User role updated.")))
}

/// DELETE /admin/api/users/{id}
pub async fn api_delete_user(
    State(state): State<SharedState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<i64>,
) -> Result<Json<ApiMessage>, ApiError> {
    UserRepository::new(state.db.clone()).delete(id).await?;
    info!(admin_id = admin.id, user_id = id, "User deleted");
    Ok(Json(ApiMessage::ok("User deleted.")))
}

// === Diseases API ===

/// GET /admin/api/diseases?q=
pub async fn api_list_diseases(
    State(state): State<SharedState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Disease>>, ApiError> {
    Ok(Json(DiseaseRepository::new(state.db.clone()).list(&query.q).await?))
}

/// POST /admin/api/diseases
pub async fn api_create_disease(
    State(state): State<SharedState>,
    RequireAdmin(admin): RequireAdmin,
    Json(disease): Json<Disease>,
) -> Result<Json<ApiMessage>, ApiError> {
    DiseaseRepository::new(state.db.clone()).insert(&disease).await?;
    info!(admin_id = admin.id, disease_id = %disease.id, "Disease added");
    Ok(Json(ApiMessage::ok("Disease added.")))
}

/// PUT /admin/api/diseases/{id}
pub async fn api_update_disease(
    State(state): State<SharedState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<String>,
    Json(disease): Json<Disease>,
) -> Result<Json<ApiMessage>, ApiError> {
    DiseaseRepository::new(state.db.clone()).update(&id, &disease).await?;
    info!(admin_id = admin.id, disease_id = %id, new_id = %disease.id, "Disease updated");
    Ok(Json(ApiMessage::ok("Disease updated.")))
}

/// DELETE /admin/api/diseases/{id}
pub async fn api_delete_disease(
    State(state): State<SharedState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<String>,
) -> Result<Json<ApiMessage>, ApiError> {
    DiseaseRepository::new(state.db.clone()).delete(&id).await?;
    info!(admin_id = admin.id, disease_id = %id, "Disease deleted");
    Ok(Json(ApiMessage::ok("Disease deleted.")))
}

// === Symptoms API ===

/// GET /admin/api/symptoms?q=
pub async fn api_list_symptoms(
    State(state): State<SharedState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Symptom>>, ApiError> {
    Ok(Json(SymptomRepository::new(state.db.clone()).list(&query.q).await?))
}

/// POST /admin/api/symptoms
pub async fn api_create_symptom(
    State(state): State<SharedState>,
    RequireAdmin(admin): RequireAdmin,
    Json(symptom): Json<Symptom>,
) -> Result<Json<ApiMessage>, ApiError> {
    SymptomRepository::new(state.db.clone()).insert(&symptom).await?;
    info!(admin_id = admin.id, symptom_id = %symptom.id, "Symptom added");
    Ok(Json(ApiMessage::ok("Symptom added.")))
}

/// PUT /admin/api/symptoms/{id}
pub async fn api_update_symptom(
    State(state): State<SharedState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<String>,
    Json(symptom): Json<Symptom>,
) -> Result<Json<ApiMessage>, ApiError> {
    SymptomRepository::new(state.db.clone()).update(&id, &symptom).await?;
    info!(admin_id = admin.id, symptom_id = %id, new_id = %symptom.id, "Symptom updated");
    Ok(Json(ApiMessage::ok("Symptom updated.")))
}

/// DELETE /admin/api/symptoms/{id}
pub async fn api_delete_symptom(
    State(state): State<SharedState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<String>,
) -> Result<Json<ApiMessage>, ApiError> {
    SymptomRepository::new(state.db.clone()).delete(&id).await?;
    info!(admin_id = admin.id, symptom_id = %id, "Symptom deleted");
    Ok(Json(ApiMessage::ok("Symptom deleted.")))
}

// === Relations API ===

/// Case-insensitive match of `q` against a relation's codes and names.
fn relation_matches(rel: &RelationView, q: &str) -> bool {
    let q = q.trim().to_lowercase();
    q.is_empty()
        || [&rel.disease_id, &rel.disease_name, &rel.symptom_id, &rel.symptom_name]
            .iter()
            .any(|field| field.to_lowercase().contains(&q))
}

/// GET /admin/api/relations?q=
pub async fn api_list_relations(
    State(state): State<SharedState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<RelationView>>, ApiError> {
    let relations = RelationRepository::new(state.db.clone()).list().await?;
    Ok(Json(relations.into_iter().filter(|r| relation_matches(r, &query.q)).collect()))
}

/// POST /admin/api/relations
pub async fn api_create_relation(
    State(state): State<SharedState>,
    RequireAdmin(admin): RequireAdmin,
    Json(rel): Json<NewRelation>,
) -> Result<Json<ApiMessage>, ApiError> {
    let id = RelationRepository::new(state.db.clone()).insert(&rel).await?;
    info!(
        admin_id = admin.id, relation_id = id,
        disease_id = %rel.disease_id, symptom_id = %rel.symptom_id,
        weight = rel.weight(), "Relation added"
    );
    Ok(Json(ApiMessage::created("Relation added.", id)))
}

/// PUT /admin/api/relations/{id} - weight is recomputed from MB and MD.
pub async fn api_update_relation(
    State(state): State<SharedState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<i64>,
    Json(rel): Json<NewRelation>,
) -> Result<Json<ApiMessage>, ApiError> {
    RelationRepository::new(state.db.clone()).update(id, &rel).await?;
    info!(admin_id = admin.id, relation_id = id, weight = rel.weight(), "Relation updated");
    Ok(Json(ApiMessage::ok("Relation updated.")))
}

/// DELETE /admin/api/relations/{id}
pub async fn api_delete_relation(
    State(state): State<SharedState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<i64>,
) -> Result<Json<ApiMessage>, ApiError> {
    RelationRepository::new(state.db.clone()).delete(id).await?;
    info!(admin_id = admin.id, relation_id = id, "Relation deleted");
    Ok(Json(ApiMessage::ok("Relation deleted.")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> RelationView {
        RelationView {
            id: 1,
            disease_id: "P01".into(),
            disease_name: "Migraine".into(),
            symptom_id: "G07".into(),
            symptom_name: "Throbbing headache".into(),
            mb: 0.8,
            md: 0.1,
            weight: 0.7,
        }
    }

    #[test]
    fn test_relation_search() {
        assert!(relation_matches(&view(), ""));
        assert!(relation_matches(&view(), " migr "));
        assert!(relation_matches(&view(), "g07"));
        assert!(!relation_matches(&view(), "epilepsy"));
    }
}
