//! One-shot navigation events, decoupled from state.
//!
//! Events wait in a bounded replay buffer until a subscriber takes them.
//! Taking an event moves it out of the buffer, so an event is delivered to
//! exactly one subscriber and never replayed to one that attaches later
//! (for example after the host restarts its observer on the next start).

use std::collections::VecDeque;
use std::fmt::Debug;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_core::Stream;
use parking_lot::Mutex;
use tokio::sync::watch;

/// Default number of undelivered events kept for late subscribers.
pub const NAVIGATION_REPLAY: usize = 10;

/// Marker trait for a screen's navigation targets.
pub trait Navigation: Clone + Debug + Send + Sync + 'static {}

#[derive(Debug, Clone, PartialEq)]
pub struct NavigationEvent<N> {
    sequence: u64,
    navigation: N,
}

impl<N> NavigationEvent<N> {
    /// Emission order within the owning bus.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn navigation(&self) -> &N {
        &self.navigation
    }

    pub fn into_navigation(self) -> N {
        self.navigation
    }
}

pub struct NavigationBus<N> {
    inner: Arc<BusInner<N>>,
}

struct BusInner<N> {
    capacity: usize,
    pending: Mutex<Pending<N>>,
    signal: watch::Sender<u64>,
}

struct Pending<N> {
    events: VecDeque<NavigationEvent<N>>,
    next_sequence: u64,
}

impl<N> BusInner<N> {
    fn take_next(&self) -> Option<NavigationEvent<N>> {
        self.pending.lock().events.pop_front()
    }
}

impl<N: Navigation> NavigationBus<N> {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (signal, _) = watch::channel(0);
        Self {
            inner: Arc::new(BusInner {
                capacity,
                pending: Mutex::new(Pending {
                    events: VecDeque::with_capacity(capacity),
                    next_sequence: 0,
                }),
                signal,
            }),
        }
    }

    /// Buffer `navigation` for delivery. When the buffer is full the oldest
    /// undelivered event is dropped.
    pub fn emit(&self, navigation: N) -> u64 {
        let sequence = {
            let mut pending = self.inner.pending.lock();
            let sequence = pending.next_sequence;
            pending.next_sequence += 1;

            if pending.events.len() == self.inner.capacity {
                if let Some(dropped) = pending.events.pop_front() {
                    tracing::warn!(
                        sequence = dropped.sequence,
                        navigation = ?dropped.navigation,
                        "Navigation buffer full, dropping oldest event"
                    );
                }
            }
            tracing::debug!(sequence, ?navigation, "Navigate");
            pending.events.push_back(NavigationEvent {
                sequence,
                navigation,
            });
            sequence
        };

        self.inner.signal.send_replace(sequence);
        sequence
    }

    /// Number of events still waiting for a subscriber.
    pub fn pending(&self) -> usize {
        self.inner.pending.lock().events.len()
    }

    /// Subscribe to undelivered events, oldest first.
    pub fn observe(&self) -> NavigationStream<N> {
        NavigationStream {
            bus: Arc::clone(&self.inner),
            signal: Some(self.inner.signal.subscribe()),
            waiting: None,
        }
    }
}

type SignalFuture = Pin<Box<dyn Future<Output = Option<watch::Receiver<u64>>> + Send>>;

/// Lazy sequence of navigation events. Every yielded event is consumed.
pub struct NavigationStream<N> {
    bus: Arc<BusInner<N>>,
    signal: Option<watch::Receiver<u64>>,
    waiting: Option<SignalFuture>,
}

impl<N: Navigation> NavigationStream<N> {
    /// Wait for the next event.
    pub async fn next_event(&mut self) -> Option<NavigationEvent<N>> {
        std::future::poll_fn(|cx| Pin::new(&mut *self).poll_next(cx)).await
    }

    /// Take the next buffered event without waiting.
    pub fn try_next_event(&mut self) -> Option<NavigationEvent<N>> {
        self.bus.take_next()
    }
}

impl<N: Navigation> Stream for NavigationStream<N> {
    type Item = NavigationEvent<N>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            if let Some(mut waiting) = this.waiting.take() {
                match waiting.as_mut().poll(cx) {
                    Poll::Ready(Some(signal)) => this.signal = Some(signal),
                    Poll::Ready(None) => return Poll::Ready(None),
                    Poll::Pending => {
                        this.waiting = Some(waiting);
                        return Poll::Pending;
                    }
                }
            }

            let Some(mut signal) = this.signal.take() else {
                return Poll::Ready(None);
            };

            // Mark the current emission as seen before looking at the buffer,
            // so an emit racing with this poll always wakes the next wait.
            signal.borrow_and_update();
            if let Some(event) = this.bus.take_next() {
                this.signal = Some(signal);
                return Poll::Ready(Some(event));
            }

            this.waiting = Some(Box::pin(async move {
                signal.changed().await.ok()?;
                Some(signal)
            }));
        }
    }
}
