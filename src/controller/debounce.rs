//! Debounced search input.
//!
//! Keystrokes go into an unbounded channel; [`Debounced::next`] yields the
//! latest value once no new value has arrived for the configured delay.

use std::time::Duration;

use tokio::sync::mpsc;

use crate::api::{Resource, ResourceBackend};

use super::list::{FetchOutcome, FilteredListController};

pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// Receiving half of a debounce channel
#[derive(Debug)]
pub struct Debounced<T> {
    rx: mpsc::UnboundedReceiver<T>,
    delay: Duration,
}

pub fn debounce_channel<T>(delay: Duration) -> (mpsc::UnboundedSender<T>, Debounced<T>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (tx, Debounced { rx, delay })
}

impl<T> Debounced<T> {
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Wait for the next settled value. Returns `None` once every sender is
    /// dropped and nothing is pending.
    pub async fn next(&mut self) -> Option<T> {
        let mut latest = self.rx.recv().await?;

        loop {
            match tokio::time::timeout(self.delay, self.rx.recv()).await {
                Ok(Some(value)) => latest = value,
                // Senders gone; flush what we have
                Ok(None) => return Some(latest),
                Err(_) => return Some(latest),
            }
        }
    }
}

/// Feed settled search text into the controller until the input closes,
/// handing each fetch outcome to `on_fetch`.
pub async fn drive_search<R, B, F>(
    controller: &mut FilteredListController<R, B>,
    mut input: Debounced<String>,
    mut on_fetch: F,
) where
    R: Resource,
    B: ResourceBackend<R>,
    F: FnMut(&FilteredListController<R, B>, FetchOutcome),
{
    while let Some(text) = input.next().await {
        tracing::debug!(resource = R::NAME, search = %text, "search settled");
        let outcome = controller.set_search_text(text).await;
        on_fetch(controller, outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_keeps_latest_within_window() {
        let (tx, mut input) = debounce_channel(Duration::from_millis(500));

        let typing = async {
            tx.send("f").unwrap();
            tokio::time::sleep(Duration::from_millis(100)).await;
            tx.send("fe").unwrap();
            tokio::time::sleep(Duration::from_millis(100)).await;
            tx.send("fen").unwrap();
            tokio::time::sleep(Duration::from_millis(1000)).await;
            tx.send("fence").unwrap();
        };

        let (first, _) = tokio::join!(input.next(), typing);
        assert_eq!(first, Some("fen"));
        assert_eq!(input.next().await, Some("fence"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_closed_channel_yields_none() {
        let (tx, mut input) = debounce_channel::<u8>(DEFAULT_SEARCH_DEBOUNCE);
        drop(tx);
        assert_eq!(input.next().await, None);
    }
}
