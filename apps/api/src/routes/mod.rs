pub mod health;
pub mod overview;


use axum::{
    routing::{get, post},
    Extension, Router,
};

use crate::auth::handlers as auth;
use crate::resume::handlers;
use crate::resume::schema::SectionKind;
use crate::state::AppState;

/// Collection and detail routes for a list section, e.g. `/experience/`
/// and `/experience/:id/`.
fn list_section(path: &str, kind: SectionKind) -> Router<AppState> {
    Router::new()
        .route(
            &format!("/{path}/"),
            get(handlers::handle_list_entries).post(handlers::handle_create_entry),
        )
        .route(
            &format!("/{path}/:id/"),
            get(handlers::handle_get_entry)
                .put(handlers::handle_update_entry)
                .patch(handlers::handle_update_entry)
                .delete(handlers::handle_delete_entry),
        )
        .layer(Extension(kind))
}

/// Get-or-create and update routes for a singleton section.
fn singleton_section(path: &str, kind: SectionKind) -> Router<AppState> {
    Router::new()
        .route(
            &format!("/{path}/"),
            get(handlers::handle_get_singleton)
                .put(handlers::handle_update_singleton)
                .patch(handlers::handle_update_singleton),
        )
        .layer(Extension(kind))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(overview::overview_handler))
        .route("/health", get(health::health_handler))
        // Accounts
        .route("/register/", post(auth::handle_register))
        .route("/login/", post(auth::handle_login))
        .route("/token/refresh/", post(auth::handle_refresh))
        // Résumé sections
        .route("/resume/", get(handlers::handle_get_resume))
        .merge(singleton_section("personalInfo", SectionKind::PersonalInfo))
        .merge(singleton_section("skills", SectionKind::Skill))
        .merge(list_section("experience", SectionKind::Experience))
        .merge(list_section("education", SectionKind::Education))
        .merge(list_section("projects", SectionKind::Project))
        .with_state(state)
}
