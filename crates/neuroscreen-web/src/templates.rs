//! HTML views, embedded at compile time and rendered with minijinja.
//!
//! Templates whose names end in `.html` are auto-escaped.

use axum::response::Html;
use minijinja::Environment;
use neuroscreen_common::ApiError;
use serde::Serialize;

const TEMPLATES: &[(&str, &str)] = &[
    ("base.html",            include_str!("../templates/base.html")),
    ("home.html",            include_str!("../templates/home.html")),
    ("about.html",           include_str!("../templates/about.html")),
    ("login.html",           include_str!("../templates/login.html")),
    ("register.html",        include_str!("../templates/register.html")),
    ("dashboard.html",       include_str!("../templates/dashboard.html")),
    ("diagnosis.html",       include_str!("../templates/diagnosis.html")),
    ("result.html",          include_str!("../templates/result.html")),
    ("history.html",         include_str!("../templates/history.html")),
    ("history_detail.html",  include_str!("../templates/history_detail.html")),
    ("admin/base.html",      include_str!("../templates/admin/base.html")),
    ("admin/dashboard.html", include_str!("../templates/admin/dashboard.html")),
    ("admin/users.html",     include_str!("../templates/admin/users.html")),
    ("admin/diseases.html",  include_str!("../templates/admin/diseases.html")),
    ("admin/symptoms.html",  include_str!("../templates/admin/symptoms.html")),
    ("admin/relations.html", include_str!("../templates/admin/relations.html")),
];

pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        for (name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        Ok(Self { env })
    }

    /// Render `name` with `ctx`. Failures are internal errors.
    pub fn render<S: Serialize>(&self, name: &str, ctx: S) -> Result<Html<String>, ApiError> {
        self.env
            .get_template(name)
            .and_then(|t| t.render(ctx))
            .map(Html)
            .map_err(|e| ApiError::Internal(format!("template {}: {:#}", name, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::context;

    #[test]
    fn test_all_templates_parse() {
        let templates = Templates::new().unwrap();
        assert!(templates.env.get_template("admin/relations.html").is_ok());
    }

    #[test]
    fn test_html_is_escaped() {
        let templates = Templates::new().unwrap();
        let html = templates
            .render("login.html", context! {
                title => "Login",
                action => "/login",
                error => "<script>alert(1)</script>",
            })
            .unwrap();
        assert!(html.0.contains("&lt;script&gt;"));
        assert!(!html.0.contains("<script>alert(1)"));
    }
}
