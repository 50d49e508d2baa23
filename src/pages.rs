use askama::Template;
use axum::{
    extract::{Form, Path, Query, State},
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Redirect, Response},
};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;

use crate::chrome;
use crate::routes::{AppError, AppState};
use crate::store::{Project, Store, Task};

#[derive(Debug, Deserialize)]
pub struct NoticeQuery {
    notice: Option<String>,
}

#[derive(Template)]
#[template(path = "task_list.html")]
struct TaskListTemplate {
    rows: Vec<TaskRow>,
}

struct TaskRow {
    id: i32,
    name: String,
    project: String,
    start_date: String,
    end_date: String,
    done: bool,
}

#[derive(Template)]
#[template(path = "project_table.html")]
struct ProjectTableTemplate {
    rows: Vec<ProjectRow>,
}

struct ProjectRow {
    id: i32,
    name: String,
    start_date: String,
    end_date: String,
    task_count: usize,
    done: bool,
}

#[derive(Template)]
#[template(path = "task_form.html")]
struct TaskFormTemplate {
    heading: &'static str,
    action: String,
    delete_action: Option<String>,
    name: String,
    description: String,
    start_date: String,
    end_date: String,
    done: bool,
    projects: Vec<ProjectOption>,
}

struct ProjectOption {
    id: i32,
    name: String,
    selected: bool,
}

#[derive(Template)]
#[template(path = "project_form.html")]
struct ProjectFormTemplate {
    heading: &'static str,
    action: String,
    delete_action: Option<String>,
    name: String,
    description: String,
    start_date: String,
    end_date: String,
    done: bool,
}

#[derive(Template)]
#[template(path = "error.html")]
struct ErrorTemplate<'a> {
    marker: &'a str,
    heading: &'a str,
    message: &'a str,
}

pub async fn task_list(
    State(state): State<AppState>,
    Query(query): Query<NoticeQuery>,
) -> Result<Html<String>, AppError> {
    let store = state.store();
    let rows = {
        let guard = store.read();
        guard
            .tasks()
            .iter()
            .map(|task| TaskRow {
                id: task.id,
                name: task.name.clone(),
                project: guard
                    .find_project(task.project_id)
                    .map(|project| project.name.clone())
                    .unwrap_or_default(),
                start_date: task.start_date.to_string(),
                end_date: format_optional_date(task.end_date),
                done: task.done,
            })
            .collect()
    };
    let page = TaskListTemplate { rows }.render()?;
    chrome::shell("Tareas", query.notice.as_deref(), &page)
}

pub async fn project_table(
    State(state): State<AppState>,
    Query(query): Query<NoticeQuery>,
) -> Result<Html<String>, AppError> {
    let store = state.store();
    let rows = {
        let guard = store.read();
        guard
            .projects()
            .iter()
            .map(|project| ProjectRow {
                id: project.id,
                name: project.name.clone(),
                start_date: project.start_date.to_string(),
                end_date: format_optional_date(project.end_date),
                task_count: guard.tasks_for_project(project.id).len(),
                done: project.done,
            })
            .collect()
    };
    let page = ProjectTableTemplate { rows }.render()?;
    chrome::shell("Proyectos", query.notice.as_deref(), &page)
}

pub async fn task_form(
    State(state): State<AppState>,
    id: Option<Path<String>>,
    Query(query): Query<NoticeQuery>,
) -> Result<Html<String>, AppError> {
    let store = state.store();
    let page = {
        let guard = store.read();
        let template = match &id {
            Some(Path(raw)) => {
                let task = find_task(&guard, raw)?;
                TaskFormTemplate {
                    heading: "Editar Tarea",
                    action: format!("/tasks/{raw}"),
                    delete_action: Some(format!("/tasks/{raw}/delete")),
                    name: task.name.clone(),
                    description: task.description.clone(),
                    start_date: task.start_date.to_string(),
                    end_date: format_optional_date(task.end_date),
                    done: task.done,
                    projects: project_options(&guard, Some(task.project_id)),
                }
            }
            None => TaskFormTemplate {
                heading: "Crear Tarea",
                action: "/tasks-create".to_string(),
                delete_action: None,
                name: String::new(),
                description: String::new(),
                start_date: String::new(),
                end_date: String::new(),
                done: false,
                projects: project_options(&guard, None),
            },
        };
        template.render()?
    };
    chrome::shell("Tareas", query.notice.as_deref(), &page)
}

pub async fn project_form(
    State(state): State<AppState>,
    id: Option<Path<String>>,
    Query(query): Query<NoticeQuery>,
) -> Result<Html<String>, AppError> {
    let store = state.store();
    let page = {
        let guard = store.read();
        let template = match &id {
            Some(Path(raw)) => {
                let project = find_project(&guard, raw)?;
                ProjectFormTemplate {
                    heading: "Editar Proyecto",
                    action: format!("/projects/{raw}"),
                    delete_action: Some(format!("/projects/{raw}/delete")),
                    name: project.name.clone(),
                    description: project.description.clone(),
                    start_date: project.start_date.to_string(),
                    end_date: format_optional_date(project.end_date),
                    done: project.done,
                }
            }
            None => ProjectFormTemplate {
                heading: "Crear Proyecto",
                action: "/project-create".to_string(),
                delete_action: None,
                name: String::new(),
                description: String::new(),
                start_date: String::new(),
                end_date: String::new(),
                done: false,
            },
        };
        template.render()?
    };
    chrome::shell("Proyectos", query.notice.as_deref(), &page)
}

#[derive(Debug, Deserialize)]
pub struct TaskFormPayload {
    name: String,
    #[serde(default)]
    description: String,
    project_id: i32,
    start_date: String,
    #[serde(default)]
    end_date: String,
    #[serde(default)]
    done: Option<String>,
}

pub async fn save_task(
    State(state): State<AppState>,
    id: Option<Path<String>>,
    Form(form): Form<TaskFormPayload>,
) -> Result<Redirect, AppError> {
    let start_date = parse_date(&form.start_date)?;
    let end_date = parse_optional_date(&form.end_date)?;
    let store = state.store();
    let notice = match &id {
        Some(Path(raw)) => {
            let mut guard = store.write();
            let task_id = find_task(&guard, raw)?.id;
            let mut task = Task::new(task_id, form.project_id, form.name, start_date);
            task.description = form.description;
            task.end_date = end_date;
            task.done = form.done.is_some();
            guard.update_task(task)?;
            info!(task_id, "task updated");
            "Tarea+actualizada"
        }
        None => {
            let mut task = Task::new(0, form.project_id, form.name, start_date);
            task.description = form.description;
            task.end_date = end_date;
            task.done = form.done.is_some();
            let task_id = store.write().create_task(task)?;
            info!(task_id, "task created");
            "Tarea+creada"
        }
    };
    Ok(Redirect::to(&format!("/tasks?notice={notice}")))
}

#[derive(Debug, Deserialize)]
pub struct ProjectFormPayload {
    name: String,
    #[serde(default)]
    description: String,
    start_date: String,
    #[serde(default)]
    end_date: String,
    #[serde(default)]
    done: Option<String>,
}

pub async fn save_project(
    State(state): State<AppState>,
    id: Option<Path<String>>,
    Form(form): Form<ProjectFormPayload>,
) -> Result<Redirect, AppError> {
    let start_date = parse_date(&form.start_date)?;
    let end_date = parse_optional_date(&form.end_date)?;
    let store = state.store();
    let notice = match &id {
        Some(Path(raw)) => {
            let mut guard = store.write();
            let project_id = find_project(&guard, raw)?.id;
            let mut project = Project::new(project_id, form.name, start_date);
            project.description = form.description;
            project.end_date = end_date;
            project.done = form.done.is_some();
            guard.update_project(project)?;
            info!(project_id, "project updated");
            "Proyecto+actualizado"
        }
        None => {
            let mut project = Project::new(0, form.name, start_date);
            project.description = form.description;
            project.end_date = end_date;
            project.done = form.done.is_some();
            let project_id = store.write().create_project(project);
            info!(project_id, "project created");
            "Proyecto+creado"
        }
    };
    Ok(Redirect::to(&format!("/projects?notice={notice}")))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<Redirect, AppError> {
    let store = state.store();
    let removed = {
        let mut guard = store.write();
        match raw.trim().parse::<i32>() {
            Ok(id) => guard.delete_task(id),
            Err(_) => false,
        }
    };
    if !removed {
        return Err(AppError::not_found(format!("la tarea '{raw}' no existe")));
    }
    info!(id = %raw, "task deleted");
    Ok(Redirect::to("/tasks?notice=Tarea+eliminada"))
}

pub async fn delete_project(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<Redirect, AppError> {
    let store = state.store();
    let removed = {
        let mut guard = store.write();
        match raw.trim().parse::<i32>() {
            Ok(id) => guard.delete_project(id),
            Err(_) => false,
        }
    };
    if !removed {
        return Err(AppError::not_found(format!(
            "el proyecto '{raw}' no existe"
        )));
    }
    info!(id = %raw, "project deleted");
    Ok(Redirect::to("/projects?notice=Proyecto+eliminado"))
}

pub async fn not_found(uri: Uri) -> Response {
    error_response(
        StatusCode::NOT_FOUND,
        &format!("no existe la ruta {}", uri.path()),
    )
}

pub(crate) fn error_response(status: StatusCode, message: &str) -> Response {
    let (marker, heading) = match status {
        StatusCode::NOT_FOUND => ("page-not-found", "Página no encontrada"),
        StatusCode::BAD_REQUEST => ("page-error", "Solicitud inválida"),
        _ => ("page-error", "Error interno"),
    };
    let template = ErrorTemplate {
        marker,
        heading,
        message,
    };
    let page = match template.render() {
        Ok(page) => page,
        Err(_) => return (status, heading.to_string()).into_response(),
    };
    match chrome::shell(heading, None, &page) {
        Ok(html) => (status, html).into_response(),
        Err(_) => (status, heading.to_string()).into_response(),
    }
}

// The `:id` segment crosses the routing boundary as an opaque string; a
// segment that does not name a stored record is simply unknown.
fn find_task<'a>(store: &'a Store, raw: &str) -> Result<&'a Task, AppError> {
    raw.trim()
        .parse()
        .ok()
        .and_then(|id| store.find_task(id))
        .ok_or_else(|| AppError::not_found(format!("la tarea '{raw}' no existe")))
}

fn find_project<'a>(store: &'a Store, raw: &str) -> Result<&'a Project, AppError> {
    raw.trim()
        .parse()
        .ok()
        .and_then(|id| store.find_project(id))
        .ok_or_else(|| AppError::not_found(format!("el proyecto '{raw}' no existe")))
}

fn project_options(store: &Store, selected: Option<i32>) -> Vec<ProjectOption> {
    store
        .projects()
        .iter()
        .map(|project| ProjectOption {
            id: project.id,
            name: project.name.clone(),
            selected: selected == Some(project.id),
        })
        .collect()
}

fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::invalid(format!("fecha inválida '{raw}'")))
}

fn parse_optional_date(raw: &str) -> Result<Option<NaiveDate>, AppError> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    parse_date(raw).map(Some)
}

fn format_optional_date(date: Option<NaiveDate>) -> String {
    date.map(|date| date.to_string()).unwrap_or_default()
}
