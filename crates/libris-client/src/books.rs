//! Typed client for the Libris books API.
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | GET    | `/api/books?title=` | List all books, or search by title |
//! | GET    | `/api/books/popular` | Popular titles (bare strings) |
//! | GET    | `/api/books/{isbn}/recommendations/content-based` | Similar titles (bare strings) |
//! | DELETE | `/api/books/{id}` | Delete a book (admin) |
//!
//! The discovery endpoints return titles, not records. Turning them into
//! books is the catalog resolver's job, not this client's.

use reqwest::Method;

use libris_core::{Book, BookId};

use crate::error::ApiError;
use crate::transport::Transport;

/// Client for the Libris books API.
#[derive(Debug, Clone)]
pub struct BookClient {
    transport: Transport,
}

impl BookClient {
    pub(crate) fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// List every book.
    ///
    /// Calls `GET /api/books`.
    pub async fn list(&self) -> Result<Vec<Book>, ApiError> {
        let builder = self.transport.request(Method::GET, &["api", "books"]);
        self.transport.json("GET /api/books", builder).await
    }

    /// Search books by title. The server matches on its own terms and may
    /// return several books for one title.
    ///
    /// Calls `GET /api/books?title={title}`.
    pub async fn search(&self, title: &str) -> Result<Vec<Book>, ApiError> {
        let builder = self
            .transport
            .request(Method::GET, &["api", "books"])
            .query(&[("title", title)]);
        self.transport.json("GET /api/books?title=", builder).await
    }

    /// Popular titles, most popular first.
    ///
    /// Calls `GET /api/books/popular`.
    pub async fn popular(&self) -> Result<Vec<String>, ApiError> {
        let builder = self.transport.request(Method::GET, &["api", "books", "popular"]);
        self.transport.json("GET /api/books/popular", builder).await
    }

    /// Titles similar in content to the book with the given ISBN.
    ///
    /// Calls `GET /api/books/{isbn}/recommendations/content-based`.
    pub async fn content_based_recommendations(&self, isbn: &str) -> Result<Vec<String>, ApiError> {
        let endpoint = format!("GET /api/books/{isbn}/recommendations/content-based");
        let builder = self.transport.request(
            Method::GET,
            &["api", "books", isbn, "recommendations", "content-based"],
        );
        self.transport.json(&endpoint, builder).await
    }

    /// Delete a book. The server refuses while copies are still on loan.
    ///
    /// Calls `DELETE /api/books/{id}`.
    pub async fn delete(&self, id: BookId) -> Result<(), ApiError> {
        let endpoint = format!("DELETE /api/books/{id}");
        let id = id.to_string();
        let builder = self.transport.request(Method::DELETE, &["api", "books", &id]);
        self.transport.empty(&endpoint, builder).await
    }
}
