//! Axum router - maps all URL paths to handlers.

use axum::{
    Router,
    routing::{get, put},
};
use tower_http::{
    services::ServeDir,
    cors::CorsLayer,
    trace::TraceLayer,
    compression::CompressionLayer,
};
use crate::state::SharedState;
use crate::handlers::{
    home::{landing, about},
    auth::{login_page, login_submit, admin_login_page, admin_login_submit, register_page, register_submit, logout},
    dashboard::dashboard,
    diagnosis::{diagnosis_page, diagnosis_submit},
    history::{history, history_detail},
    admin::{
        admin_root, admin_dashboard,
        users_page, diseases_page, symptoms_page, relations_page,
        api_list_users, api_update_user, api_delete_user,
        api_list_diseases, api_create_disease, api_update_disease, api_delete_disease,
        api_list_symptoms, api_create_symptom, api_update_symptom, api_delete_symptom,
        api_list_relations, api_create_relation, api_update_relation, api_delete_relation,
    },
};

/// Build and return the full Axum router.
pub fn build_router(shared: SharedState) -> Router {
    let static_dir = shared.config.server.static_dir.clone();

    Router::new()
        // Public
        .route("/",              get(landing))
        .route("/about",         get(about))
        .route("/login",         get(login_page).post(login_submit))
        .route("/admin/login",   get(admin_login_page).post(admin_login_submit))
        .route("/register",      get(register_page).post(register_submit))
        .route("/logout",        get(logout))

        // User
        .route("/dashboard",     get(dashboard))
        .route("/diagnosis",     get(diagnosis_page).post(diagnosis_submit))
        .route("/history",       get(history))
        .route("/history/{id}",  get(history_detail))

        // Admin pages
        .route("/admin",           get(admin_root))
        .route("/admin/dashboard", get(admin_dashboard))
        .route("/admin/users",     get(users_page))
        .route("/admin/diseases",  get(diseases_page))
        .route("/admin/symptoms",  get(symptoms_page))
        .route("/admin/relations", get(relations_page))

        // Admin API
        .route("/admin/api/users",           get(api_list_users))
        .route("/admin/api/users/{id}",      put(api_update_user).delete(api_delete_user))
        .route("/admin/api/diseases",        get(api_list_diseases).post(api_create_disease))
        .route("/admin/api/diseases/{id}",   put(api_update_disease).delete(api_delete_disease))
        .route("/admin/api/symptoms",        get(api_list_symptoms).post(api_create_symptom))
        .route("/admin/api/symptoms/{id}",   put(api_update_symptom).delete(api_delete_symptom))
        .route("/admin/api/relations",       get(api_list_relations).post(api_create_relation))
        .route("/admin/api/relations/{id}",  put(api_update_relation).delete(api_delete_relation))

        // Static files
        .nest_service("/static", ServeDir::new(static_dir))

        // Middleware
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}
