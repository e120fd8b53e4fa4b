//! End-to-end flows against a stub backend: login, account creation, and
//! the authenticated avatar-generation exchange.

mod support;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use doctrine_desktop::app::{DoctrineApp, Screen};
use doctrine_desktop::raster::Raster;
use doctrine_desktop::session::Session;
use doctrine_desktop::settings::Settings;
use support::{StubResponse, spawn_stub};

fn temp_session_path(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!("doctrine_flow_test_{}_{tag}.cfg", std::process::id()))
}

fn app_against(server_url: String, session_path: PathBuf) -> DoctrineApp {
    DoctrineApp::with_config(
        Settings { server_url },
        Session::load_from(session_path),
    )
}

/// Drain api events until every dispatched exchange has completed.
fn settle(app: &mut DoctrineApp) {
    let deadline = Instant::now() + Duration::from_secs(10);
    while app.has_pending_requests() {
        app.pump_api_events();
        assert!(Instant::now() < deadline, "timed out waiting for api events");
        std::thread::sleep(Duration::from_millis(10));
    }
    app.pump_api_events();
}

#[test]
fn login_stores_session_and_navigates_to_dashboard() {
    let (server, requests) = spawn_stub(vec![StubResponse::new(
        200,
        r#"{"token": "T", "account": {"id": 42}}"#,
    )]);
    let path = temp_session_path("login_ok");
    let _ = std::fs::remove_file(&path);

    let mut app = app_against(server, path.clone());
    app.login_mut().email = "user@example.com".to_string();
    app.login_mut().password = "hunter2".to_string();
    app.submit_log_in();
    settle(&mut app);

    assert_eq!(app.screen(), Screen::Dashboard);
    assert_eq!(app.session().token(), Some("T"));
    assert_eq!(app.session().account_id(), Some(42));

    // The session survives a restart via the file.
    let reloaded = Session::load_from(path.clone());
    assert_eq!(reloaded.token(), Some("T"));
    assert_eq!(reloaded.account_id(), Some(42));

    let seen = requests.join().unwrap();
    assert!(seen[0].starts_with("POST /api/login"));
    assert!(seen[0].contains(r#""email_address":"user@example.com""#));
    assert!(seen[0].contains(r#""password":"hunter2""#));

    let _ = std::fs::remove_file(path);
}

#[test]
fn rejected_login_marks_both_fields_and_stays_put() {
    let (server, requests) = spawn_stub(vec![StubResponse::new(403, "{}")]);
    let path = temp_session_path("login_403");
    let _ = std::fs::remove_file(&path);

    let mut app = app_against(server, path.clone());
    app.login_mut().email = "user@example.com".to_string();
    app.login_mut().password = "wrong".to_string();
    app.submit_log_in();
    settle(&mut app);

    assert_eq!(app.screen(), Screen::LogIn);
    assert!(app.login().email_error);
    assert!(app.login().password_error);
    assert_eq!(app.login().error.as_deref(), Some("Invalid credentials"));
    assert!(!app.session().is_logged_in());
    assert!(!path.exists());

    requests.join().unwrap();
}

#[test]
fn duplicate_email_marks_the_field_with_no_navigation() {
    let (server, requests) = spawn_stub(vec![StubResponse::new(
        409,
        r#"{"error": "An account with this email address already exists."}"#,
    )]);
    let path = temp_session_path("signup_409");
    let _ = std::fs::remove_file(&path);

    let mut app = app_against(server, path.clone());
    app.open_create_account();
    app.signup_mut().email = "taken@example.com".to_string();
    app.signup_mut().password = "hunter2".to_string();
    app.signup_mut().confirm = "hunter2".to_string();
    app.submit_create_account();
    settle(&mut app);

    assert_eq!(app.screen(), Screen::CreateAccount);
    assert!(!app.signup().created);
    assert!(app.signup().email_error);
    assert_eq!(
        app.signup().error.as_deref(),
        Some("Email address already in use")
    );
    assert!(!app.session().is_logged_in());

    let seen = requests.join().unwrap();
    assert!(seen[0].starts_with("POST /api/accounts/"));
}

#[test]
fn created_account_shows_the_continue_step() {
    let (server, requests) = spawn_stub(vec![StubResponse::new(201, "{}")]);
    let path = temp_session_path("signup_201");
    let _ = std::fs::remove_file(&path);

    let mut app = app_against(server, path.clone());
    app.open_create_account();
    app.signup_mut().email = "new@example.com".to_string();
    app.signup_mut().password = "hunter2".to_string();
    app.signup_mut().confirm = "hunter2".to_string();
    app.submit_create_account();
    settle(&mut app);

    assert_eq!(app.screen(), Screen::CreateAccount);
    assert!(app.signup().created);
    assert_eq!(app.signup().error, None);

    requests.join().unwrap();
}

#[test]
fn generated_avatar_is_fetched_with_the_bearer_token() {
    let mut generated = Raster::avatar();
    generated.clear(3);
    let body = format!(r#"{{"image": "{}"}}"#, generated.encode_base64());

    let (server, requests) = spawn_stub(vec![StubResponse::new(200, &body)]);
    let path = temp_session_path("avatar_gen");
    let _ = std::fs::remove_file(&path);

    // A stored session makes the app start on the dashboard with a token.
    std::fs::write(&path, "access_token=T\naccount_id=42\n").unwrap();
    let mut app = app_against(server, path.clone());
    assert_eq!(app.screen(), Screen::Dashboard);

    app.open_create_profile_modal();
    settle(&mut app);

    assert!(app.modal().open);
    assert_eq!(app.modal().editor.view.raster, generated);

    let seen = requests.join().unwrap();
    assert!(seen[0].starts_with("GET /api/generators/profile_image"));
    assert!(seen[0].to_lowercase().contains("authorization: bearer t"));

    let _ = std::fs::remove_file(path);
}
