//! # Catalog Resolver
//!
//! The discovery endpoints (`/api/books/popular`, content-based
//! recommendations) return bare titles. The resolver turns an ordered list of
//! titles into an ordered list of full book records:
//!
//! 1. fetch the title list (one call; a failure aborts before fan-out),
//! 2. search for every title concurrently,
//! 3. settle all lookups, dropping any that failed or matched nothing,
//! 4. merge cached average ratings onto the survivors.
//!
//! Output order is input order. Only a batch in which every lookup failed is
//! an error. There is no retry within a pass and no cancellation: a caller
//! that no longer wants a result simply ignores it.

use thiserror::Error;

use libris_client::{ApiClient, ApiError};
use libris_core::{search_title, Book, ValidationError};

use crate::notify::Notifier;
use crate::ratings::RatingCache;
use crate::settle::settle_all;

/// How a title search result list is narrowed to one book.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchPolicy {
    /// Take whatever the server lists first.
    #[default]
    FirstResult,
    /// Take the first case-insensitive exact title match, else the first
    /// result.
    PreferExactTitle,
}

impl MatchPolicy {
    /// Pick one book from a title search.
    pub fn select(self, title: &str, results: Vec<Book>) -> Option<Book> {
        match self {
            Self::FirstResult => results.into_iter().next(),
            Self::PreferExactTitle => {
                let wanted = title.trim().to_lowercase();
                let exact = results
                    .iter()
                    .position(|b| b.title.trim().to_lowercase() == wanted);
                let mut results = results;
                match exact {
                    Some(i) => Some(results.swap_remove(i)),
                    None => results.into_iter().next(),
                }
            }
        }
    }
}

/// One resolved title.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCatalogEntry {
    /// Index of the title in the source list.
    pub position: usize,
    /// The title as the source listed it.
    pub reference: String,
    /// The book it resolved to.
    pub book: Book,
}

/// A recommendation result and the book it was keyed on.
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendations {
    pub seed: Book,
    pub entries: Vec<ResolvedCatalogEntry>,
}

/// Resolution failures. Display text is what the user is shown.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// The recommendation seed title matched no book.
    #[error("No book found with that title.")]
    SeedNotFound { title: String },

    #[error("Failed to fetch popular books")]
    Popular(#[source] ApiError),

    #[error("Could not fetch recommendations.")]
    Recommendations(#[source] ApiError),

    #[error("Failed to load books")]
    Search(#[source] ApiError),

    /// Every lookup in a non-empty batch failed.
    #[error("failed to fetch catalog")]
    AllLookupsFailed { attempted: usize },
}

/// Resolves title lists against the catalog.
#[derive(Debug, Clone)]
pub struct CatalogResolver {
    client: ApiClient,
    ratings: RatingCache,
    notifier: Notifier,
    policy: MatchPolicy,
}

impl CatalogResolver {
    /// A resolver using [`MatchPolicy::FirstResult`].
    pub fn new(client: ApiClient, ratings: RatingCache, notifier: Notifier) -> Self {
        Self {
            client,
            ratings,
            notifier,
            policy: MatchPolicy::default(),
        }
    }

    /// The same resolver choosing among search results by `policy`.
    pub fn with_policy(mut self, policy: MatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The active match policy.
    pub fn policy(&self) -> MatchPolicy {
        self.policy
    }

    /// Popular books, most popular first.
    pub async fn popular(&self) -> Result<Vec<ResolvedCatalogEntry>, ResolveError> {
        let titles = match self.client.books().popular().await {
            Ok(t) => t,
            Err(e) => return Err(self.report(ResolveError::Popular(e))),
        };
        self.resolve(titles).await
    }

    /// Books similar to the one matching `title`.
    ///
    /// The title is searched, narrowed by the match policy, and the match's
    /// ISBN keys the recommendation request.
    pub async fn recommendations(&self, title: &str) -> Result<Recommendations, ResolveError> {
        let title = match search_title(title) {
            Ok(t) => t,
            Err(e) => return Err(self.report(e.into())),
        };

        let results = match self.client.books().search(title).await {
            Ok(r) => r,
            Err(e) => return Err(self.report(ResolveError::Recommendations(e))),
        };
        let seed = match self.policy.select(title, results) {
            Some(book) if !book.isbn.trim().is_empty() => book,
            _ => {
                return Err(self.report(ResolveError::SeedNotFound {
                    title: title.to_string(),
                }))
            }
        };
        tracing::debug!(seed = %seed.id, isbn = %seed.isbn, "recommendation seed resolved");

        let titles = match self
            .client
            .books()
            .content_based_recommendations(seed.isbn.trim())
            .await
        {
            Ok(t) => t,
            Err(e) => return Err(self.report(ResolveError::Recommendations(e))),
        };
        let entries = self.resolve(titles).await?;
        Ok(Recommendations { seed, entries })
    }

    /// List the catalog, or search it by title.
    pub async fn search(&self, title: Option<&str>) -> Result<Vec<Book>, ResolveError> {
        let result = match title {
            None => self.client.books().list().await,
            Some(raw) => match search_title(raw) {
                Ok(t) => self.client.books().search(t).await,
                Err(e) => return Err(self.report(e.into())),
            },
        };
        let mut books = match result {
            Ok(b) => b,
            Err(e) => return Err(self.report(ResolveError::Search(e))),
        };
        self.merge_ratings(books.iter_mut()).await;
        Ok(books)
    }

    /// Resolve an ordered title list. Public so that any title source can use
    /// the same fan-out.
    pub async fn resolve(&self, titles: Vec<String>) -> Result<Vec<ResolvedCatalogEntry>, ResolveError> {
        if titles.is_empty() {
            return Ok(Vec::new());
        }
        let attempted = titles.len();
        tracing::debug!(attempted, policy = ?self.policy, "resolving titles");

        let lookups = titles.iter().map(|title| self.client.books().search(title));
        let settled = settle_all(lookups).await;

        let mut entries = Vec::with_capacity(attempted);
        let mut failed = 0;
        for (position, (reference, outcome)) in titles.into_iter().zip(settled).enumerate() {
            match outcome {
                Ok(results) => match self.policy.select(&reference, results) {
                    Some(book) => entries.push(ResolvedCatalogEntry {
                        position,
                        reference,
                        book,
                    }),
                    None => tracing::debug!(%reference, "title matched no book; dropped"),
                },
                Err(e) => {
                    failed += 1;
                    tracing::warn!(%reference, error = %e, "title lookup failed; dropped");
                }
            }
        }

        if failed == attempted {
            return Err(self.report(ResolveError::AllLookupsFailed { attempted }));
        }

        self.merge_ratings(entries.iter_mut().map(|e| &mut e.book)).await;
        tracing::debug!(resolved = entries.len(), failed, "titles resolved");
        Ok(entries)
    }

    async fn merge_ratings<'a>(&self, books: impl Iterator<Item = &'a mut Book>) {
        if let Err(e) = self.ratings.refresh_if_stale(self.client.ratings()).await {
            tracing::warn!(error = %e, "average ratings unavailable");
        }
        for book in books {
            book.average_rating = self.ratings.average(book.id);
        }
    }

    fn report(&self, err: ResolveError) -> ResolveError {
        match err {
            ResolveError::Validation(_) | ResolveError::SeedNotFound { .. } => {
                self.notifier.warning(err.to_string())
            }
            _ => self.notifier.error(err.to_string()),
        }
        err
    }
}
