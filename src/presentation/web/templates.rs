use askama::Template;

/// Static landing page served at `/`.
#[derive(Template)]
#[template(path = "pages/index.html")]
pub struct HomeTemplate {
    pub title: &'static str,
    pub version: &'static str,
}

pub fn render_template<T: Template>(template: T) -> Result<String, askama::Error> {
    template.render()
}
