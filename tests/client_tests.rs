//! HTTP client tests against a canned local backend
//!
//! A tiny HTTP/1.1 responder answers fixed routes so the client's URLs,
//! request bodies and status mapping can be checked without the real
//! service.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use portal::core::{
    EntityManager, ErrorKind, Fetched, Notifier, Outcome, PortalClient, RemoteStore,
};
use portal::entities::{
    BudgetCategory, Employee, Grade, GradeDraft, Technology, TechnologyDraft,
};

/// Requests seen by the stub, as `METHOD target` plus the body when present
type Log = Arc<Mutex<Vec<String>>>;

/// Start a stub backend; routes map `METHOD target` to `(status, body)`
async fn stub(routes: &[(&str, u16, &str)]) -> (String, Log) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let routes: Arc<HashMap<String, (u16, String)>> = Arc::new(
        routes
            .iter()
            .map(|(key, status, body)| (key.to_string(), (*status, body.to_string())))
            .collect(),
    );
    let log: Log = Arc::default();

    let seen = Arc::clone(&log);
    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let routes = Arc::clone(&routes);
            let seen = Arc::clone(&seen);
            tokio::spawn(async move {
                let (request_line, body) = read_request(&mut socket).await;
                let key = request_line
                    .rsplit_once(' ')
                    .map(|(k, _)| k.to_string())
                    .unwrap_or_default();
                seen.lock().unwrap().push(if body.is_empty() {
                    key.clone()
                } else {
                    format!("{} {}", key, body)
                });

                let (status, payload) = routes
                    .get(&key)
                    .cloned()
                    .unwrap_or((404, String::new()));
                let response = format!(
                    "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    payload.len(),
                    payload
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    (format!("http://{}/api", addr), log)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> (String, String) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    let header_end = loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            return (String::new(), String::new());
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let content_length = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);
    while buf.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let request_line = head.lines().next().unwrap_or_default().to_string();
    let body = String::from_utf8_lossy(&buf[header_end..]).to_string();
    (request_line, body)
}

fn client(base_url: &str) -> PortalClient {
    PortalClient::builder().base_url(base_url).build().unwrap()
}

#[tokio::test]
async fn test_paged_employee_listing() {
    let envelope = r#"{
        "items": [{"employee_Id": 11, "name": "Ann Lee", "email": "ann@company.com",
                   "department": "HR", "designation": "Recruiter"}],
        "totalCount": 11, "page": 2, "pageSize": 10, "totalPages": 2
    }"#;
    let (base, log) = stub(&[(
        "GET /api/employee/paged?page=2&pageSize=10",
        200,
        envelope,
    )])
    .await;

    let fetched = RemoteStore::<Employee>::list(
        &client(&base),
        Some(portal::core::PageRequest::new(2, 10)),
    )
    .await
    .unwrap();

    match fetched {
        Fetched::Paged(page) => {
            assert_eq!(page.total_count, 11);
            assert_eq!(page.items[0].employee_id, 11);
            assert_eq!(page.items[0].designation, "Recruiter");
        }
        Fetched::Full(_) => panic!("employees are paged by the backend"),
    }
    assert_eq!(
        log.lock().unwrap().as_slice(),
        ["GET /api/employee/paged?page=2&pageSize=10"]
    );
}

#[tokio::test]
async fn test_full_listing_uses_camel_case() {
    let body = r#"[{"id": 1, "categoryType": "Travel", "budgetAmount": 1500.5, "financialYear": 2024}]"#;
    let (base, _) = stub(&[("GET /api/BudgetCategory", 200, body)]).await;

    let fetched = RemoteStore::<BudgetCategory>::list(&client(&base), None)
        .await
        .unwrap();
    match fetched {
        Fetched::Full(all) => {
            assert_eq!(all.len(), 1);
            assert_eq!(all[0].category_type, "Travel");
            assert_eq!(all[0].financial_year, 2024);
        }
        Fetched::Paged(_) => panic!("budget categories are listed in full"),
    }
}

#[tokio::test]
async fn test_create_sends_only_set_fields() {
    let (base, log) = stub(&[(
        "POST /api/Grade",
        201,
        r#"{"gradeId": 3, "gradeLevel": "Lead", "gradeDescription": "Team lead"}"#,
    )])
    .await;

    let draft = GradeDraft {
        grade_level: Some("Lead".into()),
        grade_description: Some("Team lead".into()),
        ..Default::default()
    };
    let created = RemoteStore::<Grade>::create(&client(&base), &draft)
        .await
        .unwrap();
    assert_eq!(created.grade_id, 3);

    let log = log.lock().unwrap();
    assert!(log[0].starts_with("POST /api/Grade {"));
    assert!(log[0].contains(r#""gradeLevel":"Lead""#));
    assert!(!log[0].contains("gradeId"));
}

#[tokio::test]
async fn test_update_with_empty_body_rebuilds_record() {
    let (base, log) = stub(&[("PUT /api/Technologies/2", 204, "")]).await;

    let draft = TechnologyDraft {
        id: Some(2),
        technology_stack: Some("Rust, Axum".into()),
    };
    let updated = RemoteStore::<Technology>::update(&client(&base), 2, &draft)
        .await
        .unwrap();

    assert_eq!(updated.id, 2);
    assert_eq!(updated.stack_items(), vec!["Rust", "Axum"]);
    assert!(log.lock().unwrap()[0].starts_with("PUT /api/Technologies/2"));
}

#[tokio::test]
async fn test_status_mapping() {
    let (base, _) = stub(&[
        ("POST /api/Grade", 409, "Duplicate key value"),
        ("DELETE /api/Grade/5", 500, "boom"),
        ("PUT /api/Grade/6", 400, "gradeLevel is required"),
    ])
    .await;
    let client = client(&base);

    let err = RemoteStore::<Grade>::create(&client, &GradeDraft::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Duplicate);

    let err = RemoteStore::<Grade>::delete(&client, 5).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Server);

    let err = RemoteStore::<Grade>::update(&client, 6, &GradeDraft::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    // Unrouted paths answer 404
    let err = RemoteStore::<Grade>::get(&client, 9).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_manager_over_http_search_miss() {
    let (base, log) = stub(&[(
        "GET /api/Grade",
        200,
        r#"[{"gradeId": 1, "gradeLevel": "Junior", "gradeDescription": "Entry level"}]"#,
    )])
    .await;

    let store: Arc<dyn RemoteStore<Grade>> = Arc::new(client(&base));
    let manager = EntityManager::new(store, Notifier::default(), 10);

    assert_eq!(manager.search(42).await, Outcome::Failed);
    assert_eq!(
        manager.notification().map(|n| n.message),
        Some("Failed to search grade. Please try again.".to_string())
    );
    assert_eq!(manager.items().len(), 1);
    assert_eq!(
        log.lock().unwrap().as_slice(),
        ["GET /api/Grade/42", "GET /api/Grade"]
    );
}
