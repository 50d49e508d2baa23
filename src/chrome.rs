use askama::Template;
use axum::response::Html;

use crate::nav::{BRAND, NAV_LINKS, NavLink};
use crate::routes::AppError;

#[derive(Template)]
#[template(path = "layout.html")]
struct LayoutTemplate<'a> {
    title: &'a str,
    notice: Option<&'a str>,
    brand: NavLink,
    nav: &'a [NavLink],
    content: &'a str,
}

/// Wraps pre-rendered page content in the persistent shell: brand heading,
/// navigation bar, and the toast host fed by the `notice` query parameter.
pub(crate) fn shell(
    title: &str,
    notice: Option<&str>,
    content: &str,
) -> Result<Html<String>, AppError> {
    let layout = LayoutTemplate {
        title,
        notice,
        brand: BRAND,
        nav: &NAV_LINKS,
        content,
    };
    Ok(Html(layout.render()?))
}
