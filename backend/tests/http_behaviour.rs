//! End-to-end coverage of the HTTP surface against in-memory databases and
//! the fixture remote source.

mod support;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::App;
use common::jobs::JobStatus;
use countries_api::db::Database;
use countries_api::job_controller::state::{start_job_updater, JobsState};
use countries_api::{configure_app, AppState};
use serde_json::Value;
use std::time::Duration;
use support::FixtureSource;
use tempfile::TempDir;

/// Build the app under test over `$db`, serving downloads from `$source` into
/// `$data_dir`.
macro_rules! app {
    ($db:expr, $source:expr, $data_dir:expr) => {
        app!($db, $source, $data_dir, "/sync-data")
    };
    ($db:expr, $source:expr, $data_dir:expr, $sync_path:expr) => {{
        let db: Database = $db;
        let sync = support::sync_service(&db, $source, support::pipeline($data_dir));
        let (jobs, rx) = JobsState::new();
        tokio::spawn(start_job_updater(jobs.clone(), rx));
        let state = AppState::new(db, sync, jobs);
        test::init_service(
            App::new()
                .app_data(state.db.clone())
                .app_data(state.sync.clone())
                .app_data(state.jobs.clone())
                .configure(|cfg| configure_app(cfg, $sync_path)),
        )
        .await
    }};
}

fn get(uri: &str) -> TestRequest {
    TestRequest::get().uri(uri)
}

fn post(uri: &str) -> TestRequest {
    TestRequest::post().uri(uri)
}

fn empty_db() -> Database {
    Database::open_in_memory().expect("open in-memory database")
}

fn data_dir() -> TempDir {
    tempfile::tempdir().expect("create data dir")
}

fn len(body: &Value) -> Option<usize> {
    body.as_array().map(Vec::len)
}

#[actix_web::test]
async fn welcome_message() {
    let dir = data_dir();
    let app = app!(empty_db(), FixtureSource::new(), dir.path());

    let body: Value = test::call_and_read_body_json(&app, get("/").to_request()).await;

    assert_eq!(
        body["message"],
        "Welcome to the Countries, States, and Cities API"
    );
}

#[actix_web::test]
async fn countries_filters_over_http() {
    let dir = data_dir();
    let app = app!(support::loaded_db(), FixtureSource::new(), dir.path());

    let all: Value = test::call_and_read_body_json(&app, get("/countries").to_request()).await;
    assert_eq!(len(&all), Some(5));

    let nga: Value =
        test::call_and_read_body_json(&app, get("/countries?iso3=NGA").to_request()).await;
    assert_eq!(nga[0]["name"], "Nigeria");
    assert_eq!(len(&nga), Some(1));

    let by_id: Value =
        test::call_and_read_body_json(&app, get("/countries?id=83&iso3=NGA").to_request()).await;
    assert_eq!(by_id[0]["iso3"], "GHA");

    let none: Value =
        test::call_and_read_body_json(&app, get("/countries?iso3=XXX").to_request()).await;
    assert_eq!(none, Value::Array(Vec::new()));
}

#[actix_web::test]
async fn malformed_filter_is_a_json_400() {
    let dir = data_dir();
    let app = app!(support::loaded_db(), FixtureSource::new(), dir.path());

    let resp = test::call_service(&app, get("/countries?id=abc").to_request()).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Invalid query parameters");
    assert!(body["details"].as_str().is_some_and(|d| !d.is_empty()));
}

#[actix_web::test]
async fn malformed_path_id_is_a_json_404() {
    let dir = data_dir();
    let app = app!(support::loaded_db(), FixtureSource::new(), dir.path());

    let resp = test::call_service(&app, get("/countries/abc").to_request()).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Resource not found");
}

#[actix_web::test]
async fn single_country_and_not_found() {
    let dir = data_dir();
    let app = app!(support::loaded_db(), FixtureSource::new(), dir.path());

    let resp = test::call_service(&app, get("/countries/161").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["id"], 161);

    let resp = test::call_service(&app, get("/countries/999").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Country not found");
}

#[actix_web::test]
async fn nested_collections() {
    let dir = data_dir();
    let app = app!(support::loaded_db(), FixtureSource::new(), dir.path());

    let states: Value =
        test::call_and_read_body_json(&app, get("/countries/161/states").to_request()).await;
    assert_eq!(states[0]["name"], "Kano");
    assert_eq!(states[1]["type"], "state");

    let cities: Value =
        test::call_and_read_body_json(&app, get("/states/306/cities").to_request()).await;
    assert_eq!(len(&cities), Some(2));

    let regions: Value = test::call_and_read_body_json(&app, get("/regions").to_request()).await;
    assert_eq!(regions[0]["name"], "Africa");

    let subregions: Value =
        test::call_and_read_body_json(&app, get("/regions/5/subregions").to_request()).await;
    assert_eq!(subregions[0]["name"], "Polynesia");
}

#[actix_web::test]
async fn query_failure_is_a_json_500() {
    let dir = data_dir();
    let app = app!(empty_db(), FixtureSource::new(), dir.path());

    let resp = test::call_service(&app, get("/countries").to_request()).await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Failed to fetch countries");
    assert!(body["details"]
        .as_str()
        .is_some_and(|d| d.contains("no such table")));
}

#[actix_web::test]
async fn sync_fetches_and_loads_every_file() {
    let dir = data_dir();
    let app = app!(empty_db(), FixtureSource::new(), dir.path());

    let resp = test::call_service(&app, post("/sync-data").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["message"],
        "All files downloaded and populated successfully"
    );
    assert_eq!(len(&body["loaded"]), Some(5));
    assert!(dir.path().join("cities.sql").exists());

    let nga: Value =
        test::call_and_read_body_json(&app, get("/countries?iso3=NGA").to_request()).await;
    assert_eq!(nga[0]["id"], 161);
}

#[actix_web::test]
async fn sync_reports_failed_downloads() {
    let dir = data_dir();
    let source = FixtureSource::new().without("sqlite/states.sql");
    let app = app!(empty_db(), source, dir.path());

    let resp = test::call_service(&app, get("/sync-data").to_request()).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Failed to fetch data");
    let details = body["details"].as_str().unwrap_or_default();
    assert!(details.contains("completed with 1 errors"), "{details}");
    assert!(details.contains("sqlite/states.sql"), "{details}");

    // Nothing is loaded when any download failed.
    let resp = test::call_service(&app, get("/regions").to_request()).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[actix_web::test]
async fn fetch_only_then_populate() {
    let dir = data_dir();
    let app = app!(empty_db(), FixtureSource::new(), dir.path());

    let resp = test::call_service(&app, get("/sync-data?fetch_only=true").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "All files downloaded successfully");
    assert_eq!(body["loaded"], Value::Array(Vec::new()));

    let resp = test::call_service(&app, get("/regions").to_request()).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let resp = test::call_service(&app, post("/populate-data").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let regions: Value = test::call_and_read_body_json(&app, get("/regions").to_request()).await;
    assert_eq!(len(&regions), Some(4));
}

#[actix_web::test]
async fn failing_script_reports_load_error() {
    let dir = data_dir();
    let source =
        FixtureSource::new().with_file("sqlite/states.sql", "INSERT INTO nowhere VALUES (1);");
    let app = app!(empty_db(), source, dir.path());

    let resp = test::call_service(&app, post("/sync-data").to_request()).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Failed to populate states.sql");

    // Scripts before the failing one stay committed.
    let countries: Value =
        test::call_and_read_body_json(&app, get("/countries").to_request()).await;
    assert_eq!(len(&countries), Some(5));
}

#[actix_web::test]
async fn sync_and_populate_loads_and_removes_the_dump() {
    let dir = data_dir();
    let app = app!(empty_db(), FixtureSource::new(), dir.path());

    let resp = test::call_service(&app, get("/sync-and-populate").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Data synced and populated successfully");
    assert!(!dir.path().join("world.sql").exists());

    let cities: Value =
        test::call_and_read_body_json(&app, get("/states/293/cities").to_request()).await;
    assert_eq!(cities[0]["name"], "Kano");
}

#[actix_web::test]
async fn sync_path_is_configurable() {
    let dir = data_dir();
    let app = app!(
        empty_db(),
        FixtureSource::new(),
        dir.path(),
        "/admin/refresh"
    );

    let resp = test::call_service(&app, post("/admin/refresh?fetch_only=true").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(&app, post("/sync-data").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn background_job_runs_to_completion() {
    let dir = data_dir();
    let app = app!(empty_db(), FixtureSource::new(), dir.path());

    let resp = test::call_service(&app, post("/sync-data/jobs").to_request()).await;
    assert_eq!(resp.status(), StatusCode::ACCEPTED);
    let body: Value = test::read_body_json(resp).await;
    let job_id = body["job_id"].as_str().expect("job id in body").to_string();

    let uri = format!("/sync-data/jobs/{job_id}");
    let mut status = JobStatus::Pending;
    for _ in 0..200 {
        status = test::call_and_read_body_json(&app, get(&uri).to_request()).await;
        if status.is_finished() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }

    assert!(matches!(status, JobStatus::Completed(_)), "{status:?}");
    let regions: Value = test::call_and_read_body_json(&app, get("/regions").to_request()).await;
    assert_eq!(len(&regions), Some(4));
}

#[actix_web::test]
async fn unknown_job_is_not_found() {
    let dir = data_dir();
    let app = app!(empty_db(), FixtureSource::new(), dir.path());

    let resp = test::call_service(&app, get("/sync-data/jobs/not-a-job").to_request()).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Job ID not found");
}
