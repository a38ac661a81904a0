//! Ordered fallback combinator
//!
//! Evaluates steps one after another and stops at the first one that yields
//! a value. Steps are lazy futures, so a step after the successful one is
//! never polled and never touches the network.

use futures::future::BoxFuture;
use tracing::trace;

/// One fallback step
pub type Step<'a, T> = BoxFuture<'a, Option<T>>;

/// Run `steps` in order and return the first `Some`
pub async fn first_success<'a, T, I>(steps: I) -> Option<T>
where
    I: IntoIterator<Item = Step<'a, T>>,
{
    for (position, step) in steps.into_iter().enumerate() {
        if let Some(value) = step.await {
            trace!(position, "Fallback step produced a value");
            return Some(value);
        }
        trace!(position, "Fallback step produced nothing");
    }
    None
}
