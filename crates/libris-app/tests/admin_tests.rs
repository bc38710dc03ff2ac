//! # Admin Console Integration Tests

mod common;

use common::{admin_token, book_json, drained, member_token, open};
use libris_app::AdminError;
use libris_core::{BookDraft, BookId, LoanId, UserId};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn draft(isbn: &str) -> BookDraft {
    BookDraft {
        title: "Dune".into(),
        author: "Frank Herbert".into(),
        isbn: isbn.into(),
        year: "1965".into(),
        publisher: "Chilton".into(),
        total_copies: "2".into(),
    }
}

async fn mount_dashboard(server: &MockServer, loans_status: u16) {
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"id": 1, "username": "alice", "email": "alice@example.org", "role": "ROLE_EMPLOYEE"}
        ])))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/books"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([book_json(7, "Dune", "9780441013593", 1)])),
        )
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/admin/loans"))
        .respond_with(ResponseTemplate::new(loans_status).set_body_json(serde_json::json!([])))
        .mount(server)
        .await;
}

#[tokio::test]
async fn members_are_refused_without_a_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut h = open(&server, Some(&member_token()));
    let err = h.libris.admin().dashboard().await.unwrap_err();
    assert!(matches!(err, AdminError::Forbidden { .. }));
    assert_eq!(
        drained(&mut h.inbox),
        vec![("warning".to_string(), "Admin access required.".to_string())]
    );
}

#[tokio::test]
async fn dashboard_fetches_all_three_lists() {
    let server = MockServer::start().await;
    mount_dashboard(&server, 200).await;

    let h = open(&server, Some(&admin_token()));
    let dashboard = h.libris.admin().dashboard().await.expect("dashboard");
    assert_eq!(dashboard.users.len(), 1);
    assert_eq!(dashboard.books[0].id, BookId::new(7));
    assert!(dashboard.loans.is_empty());
    assert_eq!(dashboard.filter_users("ALI").len(), 1);
}

#[tokio::test]
async fn dashboard_fails_as_a_whole() {
    let server = MockServer::start().await;
    mount_dashboard(&server, 500).await;

    let mut h = open(&server, Some(&admin_token()));
    let err = h.libris.admin().dashboard().await.unwrap_err();
    assert!(matches!(err, AdminError::Dashboard(_)));
    assert_eq!(
        drained(&mut h.inbox),
        vec![("error".to_string(), "Failed to fetch admin data".to_string())]
    );
}

#[tokio::test]
async fn invalid_isbn_is_refused_locally() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/admin/books"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut h = open(&server, Some(&admin_token()));
    let err = h.libris.admin().add_book(&draft("12345")).await.unwrap_err();
    assert!(matches!(err, AdminError::Validation(_)));
    assert_eq!(
        drained(&mut h.inbox),
        vec![("warning".to_string(), "ISBN must be 10 or 13 digits.".to_string())]
    );
}

#[tokio::test]
async fn add_book_posts_full_shelf() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/admin/books"))
        .and(body_json(serde_json::json!({
            "title": "Dune",
            "author": "Frank Herbert",
            "isbn": "0441013597",
            "year": 1965,
            "publisher": "Chilton",
            "totalCopies": 2,
            "availableCopies": 2
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(book_json(30, "Dune", "0441013597", 2)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut h = open(&server, Some(&admin_token()));
    let book = h.libris.admin().add_book(&draft("0441013597")).await.expect("add");
    assert_eq!(book.id, BookId::new(30));
    assert_eq!(
        drained(&mut h.inbox),
        vec![("success".to_string(), "Book added successfully".to_string())]
    );
}

#[tokio::test]
async fn update_book_omits_available_copies() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/admin/books/7"))
        .and(body_json(serde_json::json!({
            "title": "Dune",
            "author": "Frank Herbert",
            "isbn": "9780441013593",
            "year": 1965,
            "publisher": "Chilton",
            "totalCopies": 2
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(book_json(7, "Dune", "9780441013593", 1)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let h = open(&server, Some(&admin_token()));
    h.libris
        .admin()
        .update_book(BookId::new(7), &draft("9780441013593"))
        .await
        .expect("update");
}

#[tokio::test]
async fn delete_refusal_explains_outstanding_loan() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/books/7"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let mut h = open(&server, Some(&admin_token()));
    let err = h.libris.admin().delete_book(BookId::new(7)).await.unwrap_err();
    assert!(matches!(err, AdminError::DeleteBook(_)));
    assert_eq!(
        drained(&mut h.inbox),
        vec![(
            "error".to_string(),
            "Failed to delete book. User has not returned the book yet.".to_string()
        )]
    );
}

#[tokio::test]
async fn lend_return_and_notify() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/admin/lend"))
        .and(body_json(serde_json::json!({"bookId": 7, "userId": 1, "durationDays": 14})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/admin/return/11"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/admin/notify-overdue"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("Overdue notifications sent (if any overdue loans exist)."),
        )
        .expect(1)
        .mount(&server)
        .await;

    let h = open(&server, Some(&admin_token()));
    let admin = h.libris.admin();
    admin.lend(BookId::new(7), UserId::new(1), "14").await.expect("lend");
    admin.return_loan(LoanId::new(11)).await.expect("return");
    let summary = admin.notify_overdue().await.expect("notify");
    assert!(summary.starts_with("Overdue notifications sent"));
}

#[tokio::test]
async fn lend_rejects_bad_duration_locally() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/admin/lend"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let h = open(&server, Some(&admin_token()));
    let err = h
        .libris
        .admin()
        .lend(BookId::new(7), UserId::new(1), "0")
        .await
        .unwrap_err();
    assert!(matches!(err, AdminError::Validation(_)));
}
