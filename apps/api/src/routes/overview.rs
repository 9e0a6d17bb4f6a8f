use axum::Json;
use serde_json::{json, Value};

/// GET /
/// Static map of the endpoints this service exposes.
pub async fn overview_handler() -> Json<Value> {
    Json(json!({
        "API Overview": "/",
        "Register": "/register/",
        "Login": "/login/",
        "Token Refresh": "/token/refresh/",
        "Complete Resume": "/resume/",
        "Personal Info": "/personalInfo/",
        "Experience": "/experience/",
        "Education": "/education/",
        "Projects": "/projects/",
        "Skills": "/skills/"
    }))
}
