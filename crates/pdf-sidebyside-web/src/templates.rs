//! Askama templates.
//!
//! - `index.html` - Landing page with the two-file upload form

use askama::Template;
use askama_web::WebTemplate;
use pdf_sidebyside_core::AppConfig;

/// Landing page with upload form.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub output_filename: String,
    pub upload_limit: String,
}

impl IndexTemplate {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            output_filename: config.output_filename.clone(),
            upload_limit: config.upload_limit_label(),
        }
    }
}
