//! End-to-end flows through `TaskApp` on an on-disk store: sign up, log in,
//! manage tasks, then reopen the app and pick the session back up.

use argon2::Params;
use taskpad_lib::core::settings::{AppSettings, StorageBackend};
use taskpad_lib::plugins::auth::{AuthError, SignUp};
use taskpad_lib::plugins::device::FixedGeolocator;
use taskpad_lib::plugins::tasks::types::{Location, NewTask, TaskColor, TaskFilter};
use taskpad_lib::{open, AppError};

fn settings(dir: &std::path::Path, storage: StorageBackend) -> AppSettings {
    AppSettings {
        data_dir: Some(dir.to_path_buf()),
        log_filter: "debug".to_string(),
        notifications_enabled: false,
        storage,
    }
}

fn cheap_params() -> Params {
    Params::new(Params::MIN_M_COST, 1, 1, None).unwrap()
}

fn new_task(text: &str, tag: &str, color: TaskColor) -> NewTask {
    NewTask {
        text: text.to_string(),
        tag: tag.to_string(),
        color,
        location: None,
    }
}

async fn full_session_survives_reopen(storage: StorageBackend) {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings(dir.path(), storage);

    let app = open(&settings, FixedGeolocator::denied())
        .unwrap()
        .with_hash_params(cheap_params());
    app.sign_up(SignUp {
        name: "Fernanda".to_string(),
        email: "fernanda@example.com".to_string(),
        password: "s3cret".to_string(),
        confirm_password: "s3cret".to_string(),
    })
    .await
    .unwrap();

    let profile = app.log_in("fernanda@example.com", "s3cret").await.unwrap();
    let user = profile.user_id.as_str();

    let mut with_place = new_task("Pick up package", "errand", TaskColor::Yellow);
    with_place.location = Some(Location::new(-23.5614, -46.6559));
    let pickup = app.create_task(user, with_place).await.unwrap();
    app.create_task(user, new_task("Study", "school", TaskColor::Blue))
        .await
        .unwrap();
    app.create_task(user, new_task("Gym", "health", TaskColor::Green))
        .await
        .unwrap();

    app.toggle(user, &pickup).await.unwrap();
    app.edit(user, 1usize, "Study Rust").await.unwrap();
    app.delete(user, 2usize).await.unwrap();
    drop(app);

    // Same data directory, new process
    let reopened = open(&settings, FixedGeolocator::denied()).unwrap();
    assert_eq!(
        reopened.restore_session().await.unwrap().as_deref(),
        Some("fernanda@example.com")
    );

    let all = reopened.list(user, TaskFilter::All);
    let texts: Vec<&str> = all.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, vec!["Pick up package", "Study Rust"]);
    assert_eq!(all[0].id, pickup);
    assert_eq!(all[0].location, Some(Location::new(-23.5614, -46.6559)));

    assert_eq!(reopened.list(user, TaskFilter::Completed).len(), 1);
    assert_eq!(reopened.list(user, TaskFilter::Pending)[0].text, "Study Rust");

    let home = reopened.home(user).await.unwrap();
    assert_eq!(home.display_name, "Fernanda");
    assert_eq!(home.counts.total, 2);

    // Password hashed with cheap costs still verifies on the default hasher
    reopened.log_out().await.unwrap();
    assert!(reopened.restore_session().await.unwrap().is_none());
    reopened.log_in("fernanda@example.com", "s3cret").await.unwrap();
}

#[tokio::test]
async fn test_full_session_survives_reopen_on_sqlite() {
    full_session_survives_reopen(StorageBackend::Sqlite).await;
}

#[tokio::test]
async fn test_full_session_survives_reopen_on_files() {
    full_session_survives_reopen(StorageBackend::Files).await;
}

#[tokio::test]
async fn test_backend_layout_on_disk() {
    let dir = tempfile::tempdir().unwrap();

    let sqlite = open(&settings(dir.path(), StorageBackend::Sqlite), FixedGeolocator::denied()).unwrap();
    sqlite
        .create_task("alice", new_task("a", "t", TaskColor::Red))
        .await
        .unwrap();
    assert!(dir.path().join("taskpad.db").is_file());
    assert!(!dir.path().join("kv").exists());

    // Backends do not share data
    let files = open(&settings(dir.path(), StorageBackend::Files), FixedGeolocator::denied()).unwrap();
    files.tasks().load("alice").await.unwrap();
    assert!(files.list("alice", TaskFilter::All).is_empty());
    files
        .create_task("alice", new_task("b", "t", TaskColor::Red))
        .await
        .unwrap();
    assert!(dir.path().join("kv").join("tasks_alice.json").is_file());
}

#[tokio::test]
async fn test_open_fails_when_data_dir_is_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "x").unwrap();

    assert!(open(&settings(&blocker, StorageBackend::Sqlite), FixedGeolocator::denied()).is_err());
}

#[tokio::test]
async fn test_wrong_password_is_an_auth_failure() {
    let dir = tempfile::tempdir().unwrap();
    let app = open(&settings(dir.path(), StorageBackend::Sqlite), FixedGeolocator::denied())
        .unwrap()
        .with_hash_params(cheap_params());

    app.sign_up(SignUp {
        name: "Giovanna".to_string(),
        email: "gi@example.com".to_string(),
        password: "right".to_string(),
        confirm_password: "right".to_string(),
    })
    .await
    .unwrap();

    let err = app.log_in("gi@example.com", "wrong").await.unwrap_err();
    assert!(matches!(err, AppError::Auth(AuthError::InvalidCredentials)));
    assert_eq!(err.to_string(), "Invalid email or password");
    assert!(app.current_user().await.unwrap().is_none());
}

#[tokio::test]
async fn test_users_see_only_their_tasks() {
    let dir = tempfile::tempdir().unwrap();
    let app = open(&settings(dir.path(), StorageBackend::Files), FixedGeolocator::denied()).unwrap();

    app.create_task("alice", new_task("alice's", "a", TaskColor::Red))
        .await
        .unwrap();
    app.create_task("bob", new_task("bob's", "b", TaskColor::Purple))
        .await
        .unwrap();
    app.toggle("alice", 0usize).await.unwrap();

    assert_eq!(app.list("bob", TaskFilter::All)[0].text, "bob's");
    assert!(app.list("bob", TaskFilter::Completed).is_empty());
    assert_eq!(app.list("alice", TaskFilter::Completed).len(), 1);
}
