//! Lazy, pull-driven streams with cancellation checked at every element.

use futures::stream::{self, BoxStream, StreamExt};

use crate::{AccessError, Cancellation};

/// A lazily produced sequence of results.
///
/// Ends after the last element, after one `Err(AccessError::Cancelled)` once the caller
/// cancels, or after the first infrastructure error. Elements yielded before a terminal
/// error remain valid.
pub type AccessStream<'a, T> = BoxStream<'a, Result<T, AccessError>>;

enum Drain<F, T> {
    Pending(F),
    Ready(std::vec::IntoIter<T>),
    Finished,
}

/// Stream the items returned by `load`, which runs on the first poll.
pub fn drain<'a, T, F>(cancel: Cancellation, load: F) -> AccessStream<'a, T>
where
    T: Send + 'a,
    F: FnOnce() -> Result<Vec<T>, AccessError> + Send + 'a,
{
    stream::unfold(
        (Drain::Pending(load), cancel),
        |(state, cancel)| async move {
            if matches!(state, Drain::Finished) {
                return None;
            }
            if let Drain::Ready(iter) = &state {
                if iter.as_slice().is_empty() {
                    return None;
                }
            }
            tokio::task::yield_now().await;
            if cancel.is_cancelled() {
                tracing::warn!("stream cancelled");
                return Some((Err(AccessError::Cancelled), (Drain::Finished, cancel)));
            }

            let mut iter = match state {
                Drain::Pending(load) => match load() {
                    Ok(items) => items.into_iter(),
                    Err(err) => return Some((Err(err), (Drain::Finished, cancel))),
                },
                Drain::Ready(iter) => iter,
                Drain::Finished => return None,
            };
            iter.next()
                .map(|item| (Ok(item), (Drain::Ready(iter), cancel)))
        },
    )
    .boxed()
}

/// Apply `op` to each input in order, one input per poll.
///
/// An `Err` from `op` ends the stream after being yielded.
pub fn per_item<'a, I, O, F>(cancel: Cancellation, inputs: Vec<I>, op: F) -> AccessStream<'a, O>
where
    I: Send + 'a,
    O: Send + 'a,
    F: FnMut(I) -> Result<O, AccessError> + Send + 'a,
{
    stream::unfold(
        (Some((inputs.into_iter(), op)), cancel),
        |(state, cancel)| async move {
            let Some((mut inputs, mut op)) = state else {
                return None;
            };
            if inputs.as_slice().is_empty() {
                return None;
            }
            tokio::task::yield_now().await;
            if cancel.is_cancelled() {
                tracing::warn!(remaining = inputs.len(), "stream cancelled");
                return Some((Err(AccessError::Cancelled), (None, cancel)));
            }

            let Some(input) = inputs.next() else {
                return None;
            };
            match op(input) {
                Ok(output) => Some((Ok(output), (Some((inputs, op)), cancel))),
                Err(err) => Some((Err(err), (None, cancel))),
            }
        },
    )
    .boxed()
}
