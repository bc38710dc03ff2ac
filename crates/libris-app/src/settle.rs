//! Settle-all fan-in.
//!
//! Runs every future to completion, concurrently, and reports each outcome in
//! input order. Unlike `try_join_all`, one failure neither cancels the others
//! nor hides their results.

use std::future::Future;

use futures::future::join_all;

/// Drive every future to completion and return their results in input order.
pub async fn settle_all<I, F, T, E>(futures: I) -> Vec<Result<T, E>>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = Result<T, E>>,
{
    join_all(futures).await
}

/// Keep the successful values, in order, and count the failures.
pub fn fulfilled<T, E>(settled: Vec<Result<T, E>>) -> (Vec<T>, usize) {
    let mut values = Vec::with_capacity(settled.len());
    let mut failures = 0;
    for result in settled {
        match result {
            Ok(v) => values.push(v),
            Err(_) => failures += 1,
        }
    }
    (values, failures)
}
