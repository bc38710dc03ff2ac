//! Average-rating cache.
//!
//! Books come from the server without ratings; averages come from a separate
//! endpoint keyed by book id. The cache holds the last averages map for a
//! short time so a catalog view costs one averages call, not one per book.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;

use libris_client::ratings::RatingClient;
use libris_client::ApiError;
use libris_core::BookId;

/// How long a fetched averages map is trusted.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

#[derive(Debug, Default)]
struct Entries {
    averages: HashMap<BookId, f64>,
    fetched_at: Option<Instant>,
    /// Bumped by every invalidation. A fetch that started under an older
    /// generation may store its map but never marks it fresh.
    generation: u64,
}

/// Shared cache of server-computed average ratings.
#[derive(Debug, Clone)]
pub struct RatingCache {
    entries: Arc<RwLock<Entries>>,
    ttl: Duration,
}

impl Default for RatingCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl RatingCache {
    /// An empty cache trusting fetched maps for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(Entries::default())),
            ttl,
        }
    }

    /// Whether the cached map is recent enough to use without a refetch.
    pub fn is_fresh(&self) -> bool {
        self.entries
            .read()
            .fetched_at
            .is_some_and(|at| at.elapsed() < self.ttl)
    }

    /// Refetch the averages unless the cache is fresh.
    ///
    /// An invalidation that lands while the request is in flight wins: the
    /// map is stored, but the cache stays stale so the next lookup re-reads.
    pub async fn refresh_if_stale(&self, ratings: &RatingClient) -> Result<(), ApiError> {
        let started = {
            let entries = self.entries.read();
            if entries.fetched_at.is_some_and(|at| at.elapsed() < self.ttl) {
                return Ok(());
            }
            entries.generation
        };
        let averages = ratings.averages().await?;
        self.store(averages, started);
        Ok(())
    }

    fn store(&self, averages: HashMap<BookId, f64>, started: u64) {
        let mut entries = self.entries.write();
        entries.averages = averages;
        if entries.generation == started {
            entries.fetched_at = Some(Instant::now());
        } else {
            tracing::debug!("averages invalidated during fetch; left stale");
        }
    }

    /// Cached average for one book.
    pub fn average(&self, id: BookId) -> Option<f64> {
        self.entries.read().averages.get(&id).copied()
    }

    /// Drop one book's average and force the next lookup to refetch.
    pub fn invalidate(&self, id: BookId) {
        let mut entries = self.entries.write();
        entries.averages.remove(&id);
        entries.fetched_at = None;
        entries.generation += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(ttl: Duration) -> RatingCache {
        let cache = RatingCache::new(ttl);
        {
            let mut entries = cache.entries.write();
            entries.averages.insert(BookId::new(1), 4.5);
            entries.averages.insert(BookId::new(2), 3.0);
            entries.fetched_at = Some(Instant::now());
        }
        cache
    }

    #[test]
    fn empty_cache_is_stale() {
        assert!(!RatingCache::default().is_fresh());
    }

    #[test]
    fn fetch_started_before_invalidation_stays_stale() {
        let cache = RatingCache::default();
        let started = cache.entries.read().generation;
        cache.invalidate(BookId::new(7));

        cache.store(HashMap::from([(BookId::new(7), 2.0)]), started);
        assert!(!cache.is_fresh());
        assert_eq!(cache.average(BookId::new(7)), Some(2.0));

        let current = cache.entries.read().generation;
        cache.store(HashMap::from([(BookId::new(7), 4.0)]), current);
        assert!(cache.is_fresh());
        assert_eq!(cache.average(BookId::new(7)), Some(4.0));
    }

    #[test]
    fn invalidate_drops_entry_and_freshness() {
        let cache = seeded(DEFAULT_TTL);
        assert!(cache.is_fresh());
        cache.invalidate(BookId::new(1));
        assert!(!cache.is_fresh());
        assert_eq!(cache.average(BookId::new(1)), None);
        assert_eq!(cache.average(BookId::new(2)), Some(3.0));
    }

    #[test]
    fn zero_ttl_is_never_fresh() {
        assert!(!seeded(Duration::ZERO).is_fresh());
    }

    #[tokio::test]
    async fn invalidation_while_fetching_forces_refetch() {
        use libris_client::{ApiClient, LibrisConfig, StaticCredential};
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/ratings/averages"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_delay(Duration::from_millis(200))
                    .set_body_json(serde_json::json!({"7": 2.0})),
            )
            .mount(&server)
            .await;
        let config = LibrisConfig::local(&server.uri(), "unused.json").unwrap();
        let client = ApiClient::new(&config, Arc::new(StaticCredential(None))).unwrap();

        let cache = RatingCache::default();
        let refresh = {
            let cache = cache.clone();
            let client = client.clone();
            tokio::spawn(async move { cache.refresh_if_stale(client.ratings()).await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        cache.invalidate(BookId::new(7));
        refresh.await.unwrap().unwrap();

        assert!(!cache.is_fresh());
        assert_eq!(cache.average(BookId::new(7)), Some(2.0));
    }
}
