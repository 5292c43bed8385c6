//! # Event Subscriptions
//!
//! Long-lived subscriptions to contract-emitted events. Each
//! subscription owns its receiver on the transport's broadcast feed and
//! a dedicated delivery task, so one slow observer never stalls another
//! subscription. A subscriber that falls behind the feed capacity drops
//! events with a logged diagnostic; there is no replay and no
//! deduplication.

use crate::domain::entities::ContractEvent;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_stream::Stream;
use tracing::debug;
use uuid::Uuid;

/// Contract event names the SDK extracts values from, matched exactly.
/// Any mismatch between contract and client is a hard failure.
pub mod names {
    /// Emitted once per minted sub-ID.
    pub const SUB_ID_CREATED: &str = "SubIdCreated";
    /// Emitted once per embedded framework deployment.
    pub const EMBEDDED_FRAMEWORK_CREATED: &str = "EmbeddedFrameworkCreated";
    /// Emitted by deployed logic on each invocation.
    pub const FUNCTION_CALLED: &str = "FunctionCalled";

    /// `SubIdCreated` argument carrying the minted identifier.
    pub const ARG_SUB_ID: &str = "subId";
    /// `EmbeddedFrameworkCreated` argument carrying the new address.
    pub const ARG_DEPLOYED_CONTRACT: &str = "deployedContract";
    /// `FunctionCalled` argument carrying the invocation result.
    pub const ARG_RETURN_VALUE: &str = "returnValue";
}

/// Callback invoked once per delivered event.
pub type EventObserver = Box<dyn Fn(ContractEvent) + Send + Sync>;

// =============================================================================
// FILTER
// =============================================================================

/// Filter applied to the raw feed before delivery.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventFilter {
    name: Option<String>,
}

impl EventFilter {
    /// Matches every event.
    #[must_use]
    pub fn all() -> Self {
        Self { name: None }
    }

    /// Matches events with the given name exactly.
    #[must_use]
    pub fn named(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
        }
    }

    /// The name constraint, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns true if the event passes this filter.
    #[must_use]
    pub fn matches(&self, event: &ContractEvent) -> bool {
        self.name.as_deref().map_or(true, |n| n == event.name)
    }
}

// =============================================================================
// SUBSCRIPTION HANDLE
// =============================================================================

/// Live subscription handle returned to the caller.
///
/// Stays active until [`EventSubscription::cancel`] is called, the
/// handle is dropped, or the transport feed closes.
pub struct EventSubscription {
    id: Uuid,
    filter: EventFilter,
    task: JoinHandle<()>,
}

impl EventSubscription {
    /// Attaches an observer to a raw feed receiver on a dedicated task.
    pub(crate) fn spawn(
        mut receiver: broadcast::Receiver<ContractEvent>,
        filter: EventFilter,
        observer: EventObserver,
    ) -> Self {
        let id = Uuid::new_v4();
        let task_filter = filter.clone();
        let task = tokio::spawn(async move {
            loop {
                match receiver.recv().await {
                    Ok(event) => {
                        if task_filter.matches(&event) {
                            observer(event);
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        debug!(subscription = %id, "event feed closed");
                        break;
                    }
                    Err(broadcast::error::RecvError::Lagged(count)) => {
                        debug!(subscription = %id, lagged = count, "subscriber lagged, events dropped");
                    }
                }
            }
        });
        debug!(subscription = %id, filter = ?filter, "subscription opened");
        Self { id, filter, task }
    }

    /// Unique identifier of this subscription.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The filter delivery is restricted to.
    #[must_use]
    pub fn filter(&self) -> &EventFilter {
        &self.filter
    }

    /// Stops delivery. Idempotent; already-delivered events are not
    /// recalled.
    pub fn cancel(&self) {
        debug!(subscription = %self.id, "subscription cancelled");
        self.task.abort();
    }

    /// Returns true while the delivery task is running.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for EventSubscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}

// =============================================================================
// STREAM ADAPTER
// =============================================================================

/// Pull-based alternative to the observer callback: a filtered
/// [`Stream`] over the raw feed, for use with stream combinators.
pub struct EventStream {
    receiver: broadcast::Receiver<ContractEvent>,
    filter: EventFilter,
}

impl EventStream {
    /// Wraps a raw feed receiver with a filter.
    #[must_use]
    pub fn new(receiver: broadcast::Receiver<ContractEvent>, filter: EventFilter) -> Self {
        Self { receiver, filter }
    }

    /// The filter this stream is restricted to.
    #[must_use]
    pub fn filter(&self) -> &EventFilter {
        &self.filter
    }
}

impl Stream for EventStream {
    type Item = ContractEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if self.filter.matches(&event) {
                        return Poll::Ready(Some(event));
                    }
                }
                Err(broadcast::error::TryRecvError::Empty) => {
                    cx.waker().wake_by_ref();
                    return Poll::Pending;
                }
                Err(broadcast::error::TryRecvError::Closed) => return Poll::Ready(None),
                Err(broadcast::error::TryRecvError::Lagged(_)) => {}
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{Address, Hash, Value, U256};
    use std::time::Duration;
    use tokio::sync::mpsc;
    use tokio::time::timeout;

    fn event(name: &str) -> ContractEvent {
        ContractEvent {
            name: name.to_string(),
            address: Address::new([3u8; 20]),
            block_number: 1,
            tx_hash: Hash::ZERO,
            args: vec![(names::ARG_SUB_ID.into(), Value::Uint(U256::from(1)))],
        }
    }

    #[test]
    fn test_filter_matching() {
        assert!(EventFilter::all().matches(&event("Anything")));
        assert!(EventFilter::named(names::SUB_ID_CREATED).matches(&event(names::SUB_ID_CREATED)));
        assert!(!EventFilter::named(names::SUB_ID_CREATED).matches(&event(names::FUNCTION_CALLED)));
    }

    #[tokio::test]
    async fn test_observer_receives_matching_events() {
        let (feed, _) = broadcast::channel(16);
        let (collected_tx, mut collected_rx) = mpsc::unbounded_channel();

        let sub = EventSubscription::spawn(
            feed.subscribe(),
            EventFilter::named(names::SUB_ID_CREATED),
            Box::new(move |ev| {
                let _ = collected_tx.send(ev);
            }),
        );

        feed.send(event(names::FUNCTION_CALLED)).unwrap();
        feed.send(event(names::SUB_ID_CREATED)).unwrap();

        let delivered = timeout(Duration::from_millis(200), collected_rx.recv())
            .await
            .expect("timeout")
            .expect("event");
        assert_eq!(delivered.name, names::SUB_ID_CREATED);
        assert!(sub.is_active());
    }

    #[tokio::test]
    async fn test_cancel_stops_delivery() {
        let (feed, _) = broadcast::channel(16);
        let (collected_tx, mut collected_rx) = mpsc::unbounded_channel();

        let sub = EventSubscription::spawn(
            feed.subscribe(),
            EventFilter::all(),
            Box::new(move |ev| {
                let _ = collected_tx.send(ev);
            }),
        );

        sub.cancel();
        // Give the abort a chance to land before publishing.
        tokio::task::yield_now().await;
        while sub.is_active() {
            tokio::task::yield_now().await;
        }

        feed.send(event(names::SUB_ID_CREATED)).unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(collected_rx.try_recv().is_err());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_slow_observer_does_not_stall_peers() {
        let (feed, _) = broadcast::channel(16);
        let (fast_tx, mut fast_rx) = mpsc::unbounded_channel();

        let _slow = EventSubscription::spawn(
            feed.subscribe(),
            EventFilter::all(),
            Box::new(|_| std::thread::sleep(Duration::from_millis(250))),
        );
        let _fast = EventSubscription::spawn(
            feed.subscribe(),
            EventFilter::all(),
            Box::new(move |ev| {
                let _ = fast_tx.send(ev);
            }),
        );

        feed.send(event(names::SUB_ID_CREATED)).unwrap();

        // The fast subscriber sees the event while the slow one is busy.
        let delivered = timeout(Duration::from_millis(100), fast_rx.recv())
            .await
            .expect("fast subscriber stalled")
            .expect("event");
        assert_eq!(delivered.name, names::SUB_ID_CREATED);
    }

    #[tokio::test]
    async fn test_event_stream_filters() {
        use tokio_stream::StreamExt;

        let (feed, _) = broadcast::channel(16);
        let mut stream = EventStream::new(feed.subscribe(), EventFilter::named(names::FUNCTION_CALLED));

        feed.send(event(names::SUB_ID_CREATED)).unwrap();
        feed.send(event(names::FUNCTION_CALLED)).unwrap();

        let next = timeout(Duration::from_millis(200), stream.next())
            .await
            .expect("timeout")
            .expect("event");
        assert_eq!(next.name, names::FUNCTION_CALLED);
    }
}
