//! Cold, cancellable event sequences over the streaming endpoint.
//!
//! An [`EventStream`] describes a stream but does nothing by itself. Each call
//! to [`subscribe`](EventStream::subscribe) or
//! [`subscribe_with`](EventStream::subscribe_with) spawns one reader task that
//! owns its own connection and frame buffer: it opens the stream, decodes
//! frames and hands events to the consumer, all in order within that one task.
//! Cancelling stops the task at its next suspension point, which drops the
//! connection.

use async_trait::async_trait;
use futures::Stream;
use futures_util::StreamExt;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, Instrument};

use super::decoder::decode_json_lines;
use crate::config::{ClientConfig, MalformedFramePolicy};
use crate::error::{ApiError, ApiResult};
use crate::executor::RequestExecutor;

static NEXT_SUBSCRIPTION_ID: AtomicU64 = AtomicU64::new(1);

/// Per-stream settings, taken from [`ClientConfig`] when the stream is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamOptions {
    /// Capacity of the channel behind a pull [`Subscription`]
    pub event_buffer: usize,
    pub malformed_frames: MalformedFramePolicy,
}

impl StreamOptions {
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            event_buffer: config.event_buffer.max(1),
            malformed_frames: config.malformed_frames,
        }
    }
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self::from_config(&ClientConfig::default())
    }
}

/// Cancellation signal shared between a subscription and its reader task.
///
/// Cloneable and idempotent: cancelling twice is a no-op.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelHandle {
    fn new() -> (Self, watch::Receiver<bool>) {
        let (tx, rx) = watch::channel(false);
        (Self { tx: Arc::new(tx) }, rx)
    }

    pub fn cancel(&self) {
        if !self.tx.send_replace(true) {
            debug!("cancellation requested");
        }
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

/// Resolves once cancellation is signalled.
async fn cancelled(rx: &mut watch::Receiver<bool>) {
    loop {
        if *rx.borrow_and_update() {
            return;
        }
        if rx.changed().await.is_err() {
            // Every handle dropped without cancelling; run until the stream ends.
            futures::future::pending::<()>().await;
        }
    }
}

/// Receives the output of one subscription, inside its reader task.
///
/// Exactly one of `on_error` or `on_complete` is called at the end, unless the
/// subscription was cancelled by the consumer, in which case neither is.
#[async_trait]
pub trait EventObserver<T: Send + 'static>: Send + 'static {
    /// Deliver one event. Returning `false` ends the subscription.
    async fn on_event(&mut self, event: T) -> bool;

    async fn on_error(&mut self, error: ApiError);

    async fn on_complete(&mut self);
}

/// Feeds a bounded channel; a full channel pauses reading from the network.
struct ChannelObserver<T> {
    tx: mpsc::Sender<ApiResult<T>>,
}

#[async_trait]
impl<T: Send + 'static> EventObserver<T> for ChannelObserver<T> {
    async fn on_event(&mut self, event: T) -> bool {
        self.tx.send(Ok(event)).await.is_ok()
    }

    async fn on_error(&mut self, error: ApiError) {
        let _ = self.tx.send(Err(error)).await;
    }

    async fn on_complete(&mut self) {}
}

struct CallbackObserver<E, R, C> {
    on_event: E,
    on_error: Option<R>,
    on_complete: Option<C>,
}

#[async_trait]
impl<T, E, R, C> EventObserver<T> for CallbackObserver<E, R, C>
where
    T: Send + 'static,
    E: FnMut(T) + Send + 'static,
    R: FnOnce(ApiError) + Send + 'static,
    C: FnOnce() + Send + 'static,
{
    async fn on_event(&mut self, event: T) -> bool {
        (self.on_event)(event);
        true
    }

    async fn on_error(&mut self, error: ApiError) {
        if let Some(on_error) = self.on_error.take() {
            on_error(error);
        }
    }

    async fn on_complete(&mut self) {
        if let Some(on_complete) = self.on_complete.take() {
            on_complete();
        }
    }
}

/// A lazy, resubscribable sequence of decoded events.
///
/// Creating or cloning an `EventStream` opens nothing. Every subscription gets
/// an independent connection and sees the events in the order the server sent
/// them; nothing is shared or replayed between subscriptions.
///
/// # Example
///
/// ```ignore
/// let stream = client.realtime_messages("53307860c3599d1de448e19d");
/// let mut subscription = stream.subscribe();
/// while let Some(message) = subscription.next().await {
///     println!("{}", message?.text);
/// }
/// ```
pub struct EventStream<T> {
    executor: RequestExecutor,
    url: String,
    options: StreamOptions,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for EventStream<T> {
    fn clone(&self) -> Self {
        Self {
            executor: self.executor.clone(),
            url: self.url.clone(),
            options: self.options,
            _marker: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for EventStream<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventStream")
            .field("url", &self.url)
            .field("options", &self.options)
            .finish()
    }
}

impl<T> EventStream<T>
where
    T: DeserializeOwned + Send + 'static,
{
    /// Describe a stream at `url`, with options taken from the executor's config.
    pub fn new(executor: RequestExecutor, url: impl Into<String>) -> Self {
        let options = StreamOptions::from_config(executor.config());
        Self {
            executor,
            url: url.into(),
            options,
            _marker: PhantomData,
        }
    }

    pub fn with_options(mut self, options: StreamOptions) -> Self {
        self.options = StreamOptions {
            event_buffer: options.event_buffer.max(1),
            ..options
        };
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn options(&self) -> StreamOptions {
        self.options
    }

    /// Open a new connection and consume it as a [`Stream`].
    ///
    /// Must be called from within a tokio runtime.
    pub fn subscribe(&self) -> Subscription<T> {
        let (tx, rx) = mpsc::channel(self.options.event_buffer);
        let (id, cancel, task) = self.spawn(ChannelObserver { tx });
        Subscription {
            id,
            rx,
            cancel,
            task: Some(task),
        }
    }

    /// Open a new connection and push its output to callbacks.
    ///
    /// `on_event` is called for every event in order. The subscription ends
    /// with `on_error` or `on_complete`, or silently when cancelled.
    pub fn subscribe_with<E, R, C>(&self, on_event: E, on_error: R, on_complete: C) -> SubscriptionHandle
    where
        E: FnMut(T) + Send + 'static,
        R: FnOnce(ApiError) + Send + 'static,
        C: FnOnce() + Send + 'static,
    {
        self.subscribe_observer(CallbackObserver {
            on_event,
            on_error: Some(on_error),
            on_complete: Some(on_complete),
        })
    }

    /// Open a new connection and push its output to `observer`.
    pub fn subscribe_observer<O: EventObserver<T>>(&self, observer: O) -> SubscriptionHandle {
        let (id, cancel, task) = self.spawn(observer);
        SubscriptionHandle { id, cancel, task }
    }

    fn spawn<O: EventObserver<T>>(&self, observer: O) -> (u64, CancelHandle, JoinHandle<()>) {
        let id = NEXT_SUBSCRIPTION_ID.fetch_add(1, Ordering::Relaxed);
        let (cancel, cancel_rx) = CancelHandle::new();
        let span = tracing::info_span!("subscription", id, url = %self.url);

        let task = tokio::spawn(
            run_reader::<T, O>(
                self.executor.clone(),
                self.url.clone(),
                self.options.malformed_frames,
                observer,
                cancel_rx,
            )
            .instrument(span),
        );

        (id, cancel, task)
    }
}

/// Body of a subscription's reader task.
async fn run_reader<T, O>(
    executor: RequestExecutor,
    url: String,
    policy: MalformedFramePolicy,
    mut observer: O,
    mut cancel: watch::Receiver<bool>,
) where
    T: DeserializeOwned + Send + 'static,
    O: EventObserver<T>,
{
    let opened = tokio::select! {
        biased;
        _ = cancelled(&mut cancel) => {
            debug!("cancelled before the connection opened");
            return;
        }
        opened = executor.open_stream(&url) => opened,
    };

    let bytes = match opened {
        Ok(bytes) => bytes,
        Err(err) => {
            error!(error = %err, code = err.error_code(), "could not open stream");
            if !*cancel.borrow() {
                observer.on_error(err).await;
            }
            return;
        }
    };
    info!("stream connected");

    let mut events = Box::pin(decode_json_lines::<T, _>(bytes, url, policy));
    let mut delivered: u64 = 0;

    loop {
        let next = tokio::select! {
            biased;
            _ = cancelled(&mut cancel) => {
                debug!(delivered, "cancelled, closing connection");
                break;
            }
            next = events.next() => next,
        };

        // A callback may have cancelled while the last event was delivered
        if *cancel.borrow() {
            debug!(delivered, "cancelled, closing connection");
            break;
        }

        match next {
            Some(Ok(event)) => {
                let accepted = tokio::select! {
                    biased;
                    _ = cancelled(&mut cancel) => false,
                    accepted = observer.on_event(event) => accepted,
                };
                if !accepted {
                    debug!(delivered, "consumer gone, closing connection");
                    break;
                }
                delivered += 1;
            }
            Some(Err(err)) => {
                error!(error = %err, code = err.error_code(), delivered, "stream failed");
                observer.on_error(err).await;
                break;
            }
            None => {
                info!(delivered, "stream closed by server");
                observer.on_complete().await;
                break;
            }
        }
    }

    drop(events);
    debug!("connection released");
}

/// A live pull-style subscription.
///
/// Yields `Ok(event)` items in order, then either ends (server closed the
/// stream) or yields one `Err` and ends. Once cancelled it yields `None`
/// immediately, even if decoded events were still queued. Dropping it cancels.
pub struct Subscription<T> {
    id: u64,
    rx: mpsc::Receiver<ApiResult<T>>,
    cancel: CancelHandle,
    task: Option<JoinHandle<()>>,
}

impl<T> Subscription<T> {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Stop the subscription and discard any queued events.
    pub fn cancel(&mut self) {
        self.cancel.cancel();
        self.rx.close();
    }

    /// A handle that can cancel this subscription from elsewhere.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Cancel and wait until the reader task has released the connection.
    pub async fn shutdown(mut self) {
        self.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                error!(id = self.id, error = %e, "subscription task failed");
            }
        }
    }
}

impl<T> Unpin for Subscription<T> {}

impl<T> Stream for Subscription<T> {
    type Item = ApiResult<T>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.cancel.is_cancelled() {
            return Poll::Ready(None);
        }
        self.rx.poll_recv(cx)
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl<T> std::fmt::Debug for Subscription<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

/// Handle to a push-style subscription.
///
/// Dropping the handle detaches it: the subscription keeps running until the
/// stream ends. Call [`cancel`](Self::cancel) to stop it.
#[derive(Debug)]
pub struct SubscriptionHandle {
    id: u64,
    cancel: CancelHandle,
    task: JoinHandle<()>,
}

impl SubscriptionHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// True once the reader task has exited and released its connection.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait until the reader task exits, however the subscription ended.
    pub async fn closed(self) {
        if let Err(e) = self.task.await {
            error!(id = self.id, error = %e, "subscription task failed");
        }
    }
}
