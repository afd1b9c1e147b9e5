//! Drives the client against a live task service on a loopback port

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use tempfile::TempDir;

use hm_client::{
    AuthClient, ClientConfig, HttpTaskService, HttpUserDirectory, NotificationClient,
    Registration, Session, TaskStore,
};
use hm_core::notification::EmailNotification;
use hm_core::task::{
    resolve_participant_names, CategoryBucket, ClientFilter, TaskCategory, TaskDraft, TaskQuery,
    TaskStatus, UNKNOWN_USER,
};
use hm_core::user::UserDirectory;
use hm_task_service::{app, AppState, ServiceConfig};

struct Harness {
    config: ClientConfig,
    state: AppState,
    _temp_dir: TempDir,
}

async fn start_service() -> Harness {
    let temp_dir = TempDir::new().unwrap();
    let state = AppState::new(&ServiceConfig::new(temp_dir.path()))
        .await
        .unwrap();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = app(state.clone());
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    Harness {
        config: ClientConfig::new(format!("http://{}", addr)),
        state,
        _temp_dir: temp_dir,
    }
}

fn registration(username: &str) -> Registration {
    Registration {
        username: username.to_string(),
        name: username.to_string(),
        last_name: "Tester".to_string(),
        email: format!("{}@example.com", username),
        password: "secret-pw".to_string(),
    }
}

fn draft(title: &str, category: TaskCategory) -> TaskDraft {
    TaskDraft::new(
        title,
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        NaiveTime::from_hms_opt(10, 30, 0).unwrap(),
        category,
    )
}

#[tokio::test]
async fn task_lifecycle_over_http() {
    let harness = start_service().await;
    let session = Session::new();
    let auth = AuthClient::new(&harness.config, session.clone());
    let me = auth.register(&registration("ann")).await.unwrap().user.unwrap();
    assert!(session.is_authenticated());

    let store = TaskStore::new(Arc::new(HttpTaskService::new(
        &harness.config,
        session.clone(),
    )));
    assert!(store.list(TaskQuery::new()).await.unwrap().is_empty());

    let dishes_id = store
        .create(draft("Wash dishes", TaskCategory::Kitchen).with_participants([me.id.clone()]))
        .await
        .unwrap()
        .unwrap();
    store
        .create(draft("Mow lawn", TaskCategory::Garden))
        .await
        .unwrap();

    let snapshot = store.snapshot();
    assert_eq!(snapshot.tasks.len(), 2);
    let dishes = snapshot.get(&dishes_id).unwrap();
    assert_eq!(dishes.owner.as_deref(), Some(me.id.as_str()));
    assert_eq!(dishes.end_time, NaiveTime::from_hms_opt(10, 30, 0).unwrap());

    let groups = store.grouped();
    assert_eq!(
        groups.buckets(),
        vec![
            CategoryBucket::Category(TaskCategory::Kitchen),
            CategoryBucket::Category(TaskCategory::Garden),
        ]
    );
    let mine = store.filtered(&ClientFilter::new().participants([me.id.clone()]));
    assert_eq!(mine.len(), 1);

    let completed = dishes.to_draft().with_status(TaskStatus::Completed);
    store.update(&dishes_id, completed).await.unwrap();
    assert_eq!(store.get(&dishes_id).unwrap().status, TaskStatus::Completed);

    let kitchen = store
        .list(TaskQuery::new().category(TaskCategory::Kitchen))
        .await
        .unwrap();
    assert_eq!(kitchen.len(), 1);
    store.refresh().await.unwrap();
    assert_eq!(store.snapshot().tasks.len(), 1);

    store.delete(&dishes_id).await.unwrap();
    assert!(store.get(&dishes_id).is_none());
    let err = store.delete(&dishes_id).await.unwrap_err();
    assert!(err.is_not_found());

    store.list(TaskQuery::new()).await.unwrap();
    assert_eq!(store.snapshot().tasks.len(), 1);
}

#[tokio::test]
async fn requests_without_token_are_unauthorized() {
    let harness = start_service().await;
    let store = TaskStore::new(Arc::new(HttpTaskService::new(
        &harness.config,
        Session::new(),
    )));

    let err = store.list(TaskQuery::new()).await.unwrap_err();
    assert!(err.is_unauthorized());
    assert!(store.snapshot().tasks.is_empty());
}

#[tokio::test]
async fn logout_clears_session_and_cache() {
    let harness = start_service().await;
    let session = Session::new();
    let auth = AuthClient::new(&harness.config, session.clone());
    auth.register(&registration("ann")).await.unwrap();

    let store = TaskStore::new(Arc::new(HttpTaskService::new(
        &harness.config,
        session.clone(),
    )));
    store
        .create(draft("Fold laundry", TaskCategory::Laundry))
        .await
        .unwrap();
    assert_eq!(store.snapshot().tasks.len(), 1);

    auth.logout();
    store.clear().await;
    assert!(!session.is_authenticated());
    assert!(store.snapshot().tasks.is_empty());

    auth.login("ann@example.com", "secret-pw").await.unwrap();
    assert_eq!(store.refresh().await.unwrap().len(), 1);
}

#[tokio::test]
async fn participant_names_and_notifications() {
    let harness = start_service().await;
    let session = Session::new();
    let auth = AuthClient::new(&harness.config, session.clone());
    let bob = auth.register(&registration("bob")).await.unwrap().user.unwrap();
    let ann = auth.register(&registration("ann")).await.unwrap().user.unwrap();

    let directory = HttpUserDirectory::new(&harness.config, session.clone());
    assert_eq!(directory.current_user().await.unwrap().id, ann.id);
    let users = directory.list_users().await.unwrap();
    assert_eq!(users.len(), 2);

    let store = TaskStore::new(Arc::new(HttpTaskService::new(
        &harness.config,
        session.clone(),
    )));
    let id = store
        .create(
            draft("Clean bathroom", TaskCategory::Bathroom)
                .with_participants([bob.id.clone(), "ghost".to_string()]),
        )
        .await
        .unwrap()
        .unwrap();
    let task = store.get(&id).unwrap();
    assert_eq!(
        resolve_participant_names(&task, &users),
        vec!["bob Tester".to_string(), UNKNOWN_USER.to_string()]
    );

    let notifier = NotificationClient::new(&harness.config, session.clone());
    let email = EmailNotification::for_task(&task, &users);
    assert_eq!(email.recipients, vec!["bob@example.com".to_string()]);
    notifier.send_email(&email).await.unwrap();
    assert_eq!(harness.state.outbox().await.len(), 1);

    let empty = EmailNotification::new("x", Vec::new(), "");
    assert!(notifier.send_email(&empty).await.is_err());
    assert_eq!(harness.state.outbox().await.len(), 1);
}

#[tokio::test]
async fn profile_and_password_updates() {
    let harness = start_service().await;
    let session = Session::new();
    let auth = AuthClient::new(&harness.config, session.clone());
    auth.register(&registration("ann")).await.unwrap();

    let directory = HttpUserDirectory::new(&harness.config, session.clone());
    let mut me = directory.current_user().await.unwrap();
    me.name = "Annie".to_string();
    let updated = directory.update_profile(&me).await.unwrap();
    assert_eq!(updated.display_name(), "Annie Tester");

    let err = directory
        .update_password("wrong", "next-pw")
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(400));
    directory.update_password("secret-pw", "next-pw").await.unwrap();

    let err = auth.login("ann", "secret-pw").await.unwrap_err();
    assert!(err.is_unauthorized());
    auth.login("ann", "next-pw").await.unwrap();
}
