use axum::{
    body::{self, Body},
    http::{Request, StatusCode, header},
};
use chrono::NaiveDate;
use organigrama::{AppState, NAV_LINKS, Project, ROUTE_TABLE, Store, Task, router};
use tower::util::ServiceExt;

const PAGE_MARKERS: &[&str] = &[
    "page-task-list",
    "page-task-form",
    "page-project-table",
    "page-project-form",
    "page-not-found",
    "page-error",
];

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn seeded_store() -> Store {
    let mut store = Store::new();
    let project_id = store.create_project(Project::new(0, "Plataforma", date(2025, 1, 1)));
    let mut task = Task::new(0, project_id, "Primer borrador", date(2025, 1, 10));
    task.description = "Documento inicial".to_string();
    store.create_task(task).unwrap();
    store
}

fn app() -> axum::Router {
    router(AppState::new(seeded_store()))
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn assert_only_page(body: &str, expected: &str) {
    for marker in PAGE_MARKERS {
        let present = body.contains(&format!("id=\"{marker}\""));
        if *marker == expected {
            assert!(present, "expected page marker {marker} missing");
        } else {
            assert!(!present, "unexpected page marker {marker} present");
        }
    }
}

#[tokio::test]
async fn root_redirects_to_tasks() {
    let response = app()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response.headers().get(header::LOCATION).unwrap();
    assert_eq!(location.to_str().unwrap(), "/tasks");
}

#[tokio::test]
async fn tasks_path_renders_the_task_list_directly() {
    let (status, body) = get(app(), "/tasks").await;
    assert_eq!(status, StatusCode::OK);
    assert_only_page(&body, "page-task-list");
    assert!(body.contains("Primer borrador"));
    assert!(body.contains("Plataforma"));
}

#[tokio::test]
async fn projects_path_renders_the_project_table() {
    let (status, body) = get(app(), "/projects").await;
    assert_eq!(status, StatusCode::OK);
    assert_only_page(&body, "page-project-table");
    assert!(body.contains("Plataforma"));
}

#[tokio::test]
async fn task_edit_form_binds_the_literal_path_segment() {
    let (status, body) = get(app(), "/tasks/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_only_page(&body, "page-task-form");
    assert!(body.contains("action=\"/tasks/1\""));
    assert!(body.contains("action=\"/tasks/1/delete\""));
    assert!(body.contains("Primer borrador"));
}

#[tokio::test]
async fn task_create_form_is_unbound() {
    let (status, body) = get(app(), "/tasks-create").await;
    assert_eq!(status, StatusCode::OK);
    assert_only_page(&body, "page-task-form");
    assert!(body.contains("action=\"/tasks-create\""));
    assert!(!body.contains("delete"));
}

#[tokio::test]
async fn project_edit_form_binds_the_literal_path_segment() {
    let (status, body) = get(app(), "/projects/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_only_page(&body, "page-project-form");
    assert!(body.contains("action=\"/projects/1\""));
}

#[tokio::test]
async fn project_create_form_is_unbound() {
    let (status, body) = get(app(), "/project-create").await;
    assert_eq!(status, StatusCode::OK);
    assert_only_page(&body, "page-project-form");
    assert!(body.contains("action=\"/project-create\""));
}

#[tokio::test]
async fn unknown_path_renders_the_not_found_page() {
    let (status, body) = get(app(), "/sasks").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_only_page(&body, "page-not-found");
}

#[tokio::test]
async fn unknown_task_id_renders_the_not_found_page() {
    let (status, body) = get(app(), "/tasks/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_only_page(&body, "page-not-found");
}

#[tokio::test]
async fn non_numeric_task_id_is_just_an_unknown_id() {
    let (status, body) = get(app(), "/tasks/abc").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_only_page(&body, "page-not-found");
}

#[tokio::test]
async fn navigation_bar_renders_on_every_route() {
    for uri in ["/tasks", "/tasks-create", "/projects", "/project-create", "/missing"] {
        let (_, body) = get(app(), uri).await;
        assert_eq!(
            body.matches("class=\"btn-nav\"").count(),
            4,
            "expected four nav buttons on {uri}"
        );
        for link in NAV_LINKS {
            assert!(body.contains(&format!("href=\"{}\"", link.target)));
            assert!(body.contains(link.label));
        }
        assert!(body.contains("Organigrama de Proyectos y Actividades"));
    }
}

#[tokio::test]
async fn notice_query_feeds_the_toast_host() {
    let (_, body) = get(app(), "/tasks?notice=Tarea+creada").await;
    assert!(body.contains("class=\"toast\""));
    assert!(body.contains("Tarea creada"));

    let (_, body) = get(app(), "/tasks").await;
    assert!(body.contains("id=\"toast-host\""));
    assert!(!body.contains("class=\"toast\""));
}

#[tokio::test]
async fn notice_markup_is_escaped() {
    let (_, body) = get(app(), "/tasks?notice=%3Cb%3Ehola%3C%2Fb%3E").await;
    assert!(!body.contains("<b>hola</b>"));
    assert!(body.contains("&lt;b&gt;hola&lt;/b&gt;"));
}

#[tokio::test]
async fn every_table_pattern_is_reachable() {
    // Substitute the seeded id for the parameter segment; each pattern must
    // land on a page, not the fallback.
    for spec in ROUTE_TABLE {
        let uri = spec.pattern.replace(":id", "1");
        let (status, body) = get(app(), &uri).await;
        assert_eq!(status, StatusCode::OK, "pattern {} not reachable", spec.pattern);
        assert!(!body.contains("id=\"page-not-found\""));
    }
}

#[tokio::test]
async fn health_endpoint_reports_ok() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "ok");
}
