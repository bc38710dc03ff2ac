//! # Integration Tests for the Libris API Client
//!
//! Runs every sub-client against a wiremock server to check request
//! construction, credential injection at dispatch, response decoding and
//! status classification.

use std::sync::{Arc, Mutex};

use libris_client::admin::LendRequest;
use libris_client::profile::ProfileUpdate;
use libris_client::users::Registration;
use libris_client::{ApiClient, ApiError, CredentialSource, LibrisConfig, StaticCredential};
use libris_core::{BookDraft, BookId, BorrowDays, Credential, LoanId, Rating, UserId};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

/// A credential source whose value can change after the client is built.
#[derive(Default)]
struct SwappableCredential(Mutex<Option<Credential>>);

impl SwappableCredential {
    fn set(&self, token: Option<&str>) {
        *self.0.lock().unwrap() = token.map(|t| Credential::new(t).unwrap());
    }
}

impl CredentialSource for SwappableCredential {
    fn current(&self) -> Option<Credential> {
        self.0.lock().unwrap().clone()
    }
}

fn config(server: &MockServer) -> LibrisConfig {
    LibrisConfig::local(&server.uri(), "unused-credentials.json").expect("config")
}

fn client_with(server: &MockServer, token: Option<&str>) -> ApiClient {
    let credential = token.map(|t| Credential::new(t).expect("credential"));
    ApiClient::new(&config(server), Arc::new(StaticCredential(credential))).expect("client")
}

fn no_authorization(req: &Request) -> bool {
    !req.headers.contains_key("authorization")
}

fn book_json(id: i64, title: &str, available: i32) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "title": title,
        "author": "Author",
        "isbn": "9780000000001",
        "publisher": "Pub",
        "year": 2001,
        "totalCopies": 3,
        "availableCopies": available
    })
}

// ── Credential injection ─────────────────────────────────────────────────

#[tokio::test]
async fn authorization_header_resolved_at_dispatch() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/loans/my"))
        .and(header("Authorization", "Bearer tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/loans/my"))
        .and(no_authorization)
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let source = Arc::new(SwappableCredential::default());
    let client = ApiClient::new(&config(&server), source.clone()).expect("client");

    // Logged in after the client was built.
    source.set(Some("tok-1"));
    let loans = client.loans().mine().await.expect("mine");
    assert!(loans.is_empty());

    // Logged out again: no header at all, not an empty bearer.
    source.set(None);
    let err = client.loans().mine().await.unwrap_err();
    assert!(err.is_unauthorized());
}

#[tokio::test]
async fn anonymous_requests_carry_no_header() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/books/popular"))
        .and(no_authorization)
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!(["Dune", "Emma"])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let titles = client_with(&server, None).books().popular().await.expect("popular");
    assert_eq!(titles, vec!["Dune".to_string(), "Emma".to_string()]);
}

// ── Users ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn login_accepts_plain_text_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/users/login"))
        .and(body_json(serde_json::json!({"username": "alice", "password": "pw"})))
        .respond_with(ResponseTemplate::new(200).set_body_string("abc.def.ghi"))
        .expect(1)
        .mount(&server)
        .await;

    let credential = client_with(&server, None)
        .users()
        .login("alice", "pw")
        .await
        .expect("login");
    assert_eq!(credential.as_str(), "abc.def.ghi");
}

#[tokio::test]
async fn login_rejection_is_unauthorized() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/users/login"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Invalid credentials"))
        .mount(&server)
        .await;

    let err = client_with(&server, None)
        .users()
        .login("alice", "wrong")
        .await
        .unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.server_message(), Some("Invalid credentials"));
}

#[tokio::test]
async fn register_posts_camel_case_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/users/register"))
        .and(body_json(serde_json::json!({
            "username": "bob",
            "password": "secret",
            "email": "bob@example.org",
            "fullName": "Bob Builder"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string("User registered"))
        .expect(1)
        .mount(&server)
        .await;

    let registration = Registration {
        username: "bob".into(),
        password: zeroize::Zeroizing::new("secret".into()),
        email: "bob@example.org".into(),
        full_name: "Bob Builder".into(),
    };
    client_with(&server, None)
        .users()
        .register(&registration)
        .await
        .expect("register");
}

#[tokio::test]
async fn register_conflict_surfaces_server_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/users/register"))
        .respond_with(ResponseTemplate::new(400).set_body_string("Username already exists"))
        .mount(&server)
        .await;

    let registration = Registration {
        username: "bob".into(),
        password: zeroize::Zeroizing::new("secret".into()),
        email: "bob@example.org".into(),
        full_name: "Bob".into(),
    };
    let err = client_with(&server, None)
        .users()
        .register(&registration)
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert_eq!(err.server_message(), Some("Username already exists"));
}

// ── Books ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn search_sends_title_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/books"))
        .and(query_param("title", "The Hobbit"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([book_json(4, "The Hobbit", 1)])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let books = client_with(&server, None)
        .books()
        .search("The Hobbit")
        .await
        .expect("search");
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].id, BookId::new(4));
    assert!(books[0].can_borrow());
}

#[tokio::test]
async fn recommendations_path_encodes_isbn() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/books/9780000000001/recommendations/content-based"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!(["Emma"])))
        .expect(1)
        .mount(&server)
        .await;

    let titles = client_with(&server, None)
        .books()
        .content_based_recommendations("9780000000001")
        .await
        .expect("recommendations");
    assert_eq!(titles, vec!["Emma".to_string()]);
}

#[tokio::test]
async fn malformed_book_list_is_deserialization_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/books"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client_with(&server, None).books().list().await.unwrap_err();
    assert!(matches!(err, ApiError::Deserialization { .. }));
}

#[tokio::test]
async fn delete_book_uses_books_path() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/books/9"))
        .and(header("Authorization", "Bearer admin-token"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client_with(&server, Some("admin-token"))
        .books()
        .delete(BookId::new(9))
        .await
        .expect("delete");
}

// ── Loans and ratings ────────────────────────────────────────────────────

#[tokio::test]
async fn borrow_sends_duration_query() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/loans/borrow/7"))
        .and(query_param("durationDays", "5"))
        .and(header("Authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": 1})))
        .expect(1)
        .mount(&server)
        .await;

    client_with(&server, Some("tok"))
        .loans()
        .borrow(BookId::new(7), BorrowDays::new(5).unwrap())
        .await
        .expect("borrow");
}

#[tokio::test]
async fn borrow_conflict_keeps_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/loans/borrow/7"))
        .respond_with(ResponseTemplate::new(409).set_body_string("No copies left"))
        .mount(&server)
        .await;

    let err = client_with(&server, Some("tok"))
        .loans()
        .borrow(BookId::new(7), BorrowDays::new(2).unwrap())
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(409));
    assert!(!err.is_unauthorized());
}

#[tokio::test]
async fn my_loans_decode_dates_and_return_state() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/loans/my"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {
                "id": 11,
                "book": book_json(7, "Dune", 0),
                "loanDate": "2026-10-01T09:30:00",
                "dueDate": "2026-10-06T09:30:00",
                "returnDate": null
            },
            {
                "id": 12,
                "book": book_json(8, "Emma", 2),
                "loanDate": "2026-09-01T09:30:00",
                "dueDate": "2026-09-03T09:30:00",
                "returnDate": "2026-09-02T12:00:00"
            }
        ])))
        .mount(&server)
        .await;

    let loans = client_with(&server, Some("tok")).loans().mine().await.expect("mine");
    assert_eq!(loans.len(), 2);
    assert_eq!(loans[0].id, LoanId::new(11));
    assert!(loans[0].is_active());
    assert!(!loans[1].is_active());
}

#[tokio::test]
async fn return_posts_to_loan_path() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/loans/return/11"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client_with(&server, Some("tok"))
        .loans()
        .return_loan(LoanId::new(11))
        .await
        .expect("return");
}

#[tokio::test]
async fn rate_sends_rating_query_and_averages_decode() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/ratings/7"))
        .and(query_param("rating", "4"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/ratings/averages"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"7": 4.5, "8": 2.0})),
        )
        .mount(&server)
        .await;

    let client = client_with(&server, Some("tok"));
    client
        .ratings()
        .rate(BookId::new(7), Rating::new(4).unwrap())
        .await
        .expect("rate");
    let averages = client.ratings().averages().await.expect("averages");
    assert_eq!(averages.get(&BookId::new(7)), Some(&4.5));
    assert_eq!(averages.get(&BookId::new(8)), Some(&2.0));
}

// ── Profile ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn profile_round_trip() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/profile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 3,
            "username": "alice",
            "fullName": "Alice Liddell",
            "email": "alice@example.org",
            "role": "ROLE_EMPLOYEE"
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/profile"))
        .and(body_json(serde_json::json!({
            "fullName": "Alice L.",
            "email": "alice@example.net"
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with(&server, Some("tok"));
    let profile = client.profile().get().await.expect("profile");
    assert_eq!(profile.username, "alice");
    assert_eq!(profile.full_name, "Alice Liddell");

    client
        .profile()
        .update(&ProfileUpdate {
            full_name: "Alice L.".into(),
            email: "alice@example.net".into(),
        })
        .await
        .expect("update");
}

// ── Admin ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_book_sets_available_to_total() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/admin/books"))
        .and(body_json(serde_json::json!({
            "title": "Dune",
            "author": "Frank Herbert",
            "isbn": "9780441013593",
            "year": 1965,
            "publisher": "Chilton",
            "totalCopies": 4,
            "availableCopies": 4
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(book_json(20, "Dune", 4)))
        .expect(1)
        .mount(&server)
        .await;

    let draft = BookDraft {
        title: "Dune".into(),
        author: "Frank Herbert".into(),
        isbn: "9780441013593".into(),
        year: "1965".into(),
        publisher: "Chilton".into(),
        total_copies: "4".into(),
    };
    let new_book = draft.validate_as_of(2026).expect("valid draft");
    let book = client_with(&server, Some("admin"))
        .admin()
        .create_book(new_book)
        .await
        .expect("create");
    assert_eq!(book.id, BookId::new(20));
}

#[tokio::test]
async fn lend_and_notify_overdue() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/admin/lend"))
        .and(body_json(serde_json::json!({"bookId": 7, "userId": 3, "durationDays": 14})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/admin/notify-overdue"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Notified 2 users"))
        .expect(1)
        .mount(&server)
        .await;

    let admin = client_with(&server, Some("admin"));
    admin
        .admin()
        .lend(&LendRequest {
            book_id: BookId::new(7),
            user_id: UserId::new(3),
            duration_days: BorrowDays::new(14).unwrap(),
        })
        .await
        .expect("lend");
    let summary = admin.admin().notify_overdue().await.expect("notify");
    assert_eq!(summary, "Notified 2 users");
}

#[tokio::test]
async fn admin_endpoints_forbidden_for_members() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/admin/loans"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let err = client_with(&server, Some("member"))
        .admin()
        .active_loans()
        .await
        .unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.status(), Some(403));
}

// ── Transport failures ───────────────────────────────────────────────────

#[tokio::test]
async fn unreachable_backend_is_network_error() {
    let server = MockServer::start().await;
    let config = config(&server);
    drop(server);

    let client = ApiClient::new(&config, Arc::new(StaticCredential::default())).expect("client");
    let err = client.books().list().await.unwrap_err();
    assert!(err.is_network());
    assert_eq!(err.status(), None);
}
