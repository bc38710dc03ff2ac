//! Typed client for the Libris ratings API.
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | POST   | `/api/ratings/{bookId}?rating=` | Rate a book 1–5 |
//! | GET    | `/api/ratings/averages` | Map of book id → average rating |

use std::collections::HashMap;

use reqwest::Method;

use libris_core::{BookId, Rating};

use crate::error::ApiError;
use crate::transport::Transport;

/// Client for the Libris ratings API.
#[derive(Debug, Clone)]
pub struct RatingClient {
    transport: Transport,
}

impl RatingClient {
    pub(crate) fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// Rate a book.
    ///
    /// Calls `POST /api/ratings/{bookId}?rating={rating}`.
    pub async fn rate(&self, book_id: BookId, rating: Rating) -> Result<(), ApiError> {
        let endpoint = format!("POST /api/ratings/{book_id}");
        let id = book_id.to_string();
        let builder = self
            .transport
            .request(Method::POST, &["api", "ratings", &id])
            .query(&[("rating", rating.get())]);
        self.transport.empty(&endpoint, builder).await
    }

    /// Average rating of every rated book. Unrated books are absent.
    ///
    /// Calls `GET /api/ratings/averages`.
    pub async fn averages(&self) -> Result<HashMap<BookId, f64>, ApiError> {
        let builder = self
            .transport
            .request(Method::GET, &["api", "ratings", "averages"]);
        self.transport.json("GET /api/ratings/averages", builder).await
    }
}
