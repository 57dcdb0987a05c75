//! Typed actor primitive backed by the shared worker pool.
//!
//! Each actor drains one inbox as a strictly serialized unit: no two
//! pool threads ever run the same actor's handlers concurrently, so
//! actor state needs no internal locking. The mailbox tracks its live
//! depth so owners can wait, with a bound, for the inbox to drain
//! before releasing the actor.

use std::future::Future;
use std::marker::PhantomData;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use futures_util::FutureExt;
use tokio::sync::{Notify, mpsc, oneshot};
use tokio::task::JoinHandle;

pub trait Actor: Send + 'static {}

impl<T> Actor for T where T: Send + 'static {}

pub trait Message: Send + 'static {
    type Response: Send + 'static;
}

/// Live inbox depth plus the idle notification teardown waits on.
///
/// A message counts as queued from the moment it is accepted until its
/// handler returns, so an envelope being processed is never mistaken
/// for a drained inbox.
struct MailboxDepth {
    queued: AtomicUsize,
    idle: Notify,
}

impl MailboxDepth {
    fn new() -> Self {
        Self {
            queued: AtomicUsize::new(0),
            idle: Notify::new(),
        }
    }

    fn enqueued(&self) {
        self.queued.fetch_add(1, Ordering::SeqCst);
    }

    fn drained(&self) {
        if self.queued.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.idle.notify_waiters();
        }
    }

    fn queued(&self) -> usize {
        self.queued.load(Ordering::SeqCst)
    }

    async fn idle(&self) {
        loop {
            let notified = self.idle.notified();
            if self.queued() == 0 {
                return;
            }
            notified.await;
        }
    }
}

pub struct ActorContext<A: Actor> {
    stop_requested: bool,
    self_ref: Option<ActorRef<A>>,
    _marker: PhantomData<fn() -> A>,
}

impl<A: Actor> ActorContext<A> {
    fn new() -> Self {
        Self {
            stop_requested: false,
            self_ref: None,
            _marker: PhantomData,
        }
    }

    pub fn stop(&mut self) {
        self.stop_requested = true;
    }

    pub fn is_stop_requested(&self) -> bool {
        self.stop_requested
    }

    pub fn actor_ref(&self) -> ActorRef<A> {
        self.self_ref
            .as_ref()
            .expect("actor_ref is only available while handling a message")
            .clone()
    }

    fn enter_message(&mut self, self_ref: ActorRef<A>) {
        self.self_ref = Some(self_ref);
    }

    fn leave_message(&mut self) {
        self.self_ref = None;
    }
}

#[async_trait::async_trait]
pub trait Handler<M>: Actor
where
    M: Message,
    Self: Sized,
{
    async fn handle(&mut self, message: M, ctx: &mut ActorContext<Self>) -> M::Response;
}

trait Envelope<A: Actor>: Send + 'static {
    fn handle<'a>(
        self: Box<Self>,
        actor: &'a mut A,
        ctx: &'a mut ActorContext<A>,
    ) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>>;
}

struct CastEnvelope<M, A>
where
    M: Message<Response = ()>,
    A: Handler<M>,
{
    message: M,
    self_ref: ActorRef<A>,
    _marker: PhantomData<fn() -> A>,
}

impl<M, A> Envelope<A> for CastEnvelope<M, A>
where
    M: Message<Response = ()>,
    A: Handler<M>,
{
    fn handle<'a>(
        self: Box<Self>,
        actor: &'a mut A,
        ctx: &'a mut ActorContext<A>,
    ) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        Box::pin(async move {
            ctx.enter_message(self.self_ref.clone());
            actor.handle(self.message, ctx).await;
            ctx.leave_message();
        })
    }
}

struct CallEnvelope<M, A>
where
    M: Message,
    A: Handler<M>,
{
    message: M,
    response_tx: oneshot::Sender<M::Response>,
    self_ref: ActorRef<A>,
    _marker: PhantomData<fn() -> A>,
}

impl<M, A> Envelope<A> for CallEnvelope<M, A>
where
    M: Message,
    A: Handler<M>,
{
    fn handle<'a>(
        self: Box<Self>,
        actor: &'a mut A,
        ctx: &'a mut ActorContext<A>,
    ) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        Box::pin(async move {
            ctx.enter_message(self.self_ref.clone());
            let response = actor.handle(self.message, ctx).await;
            ctx.leave_message();
            let _ = self.response_tx.send(response);
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastError {
    MailboxClosed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallError {
    MailboxClosed,
    Timeout,
    ActorStopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainError {
    Timeout,
}

pub struct ActorRef<A: Actor> {
    tx: mpsc::UnboundedSender<Box<dyn Envelope<A>>>,
    depth: Arc<MailboxDepth>,
}

impl<A: Actor> Clone for ActorRef<A> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            depth: Arc::clone(&self.depth),
        }
    }
}

impl<A: Actor> ActorRef<A> {
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Messages accepted but not yet fully handled.
    pub fn queued_len(&self) -> usize {
        self.depth.queued()
    }

    pub fn cast<M>(&self, message: M) -> Result<(), CastError>
    where
        M: Message<Response = ()>,
        A: Handler<M>,
    {
        let envelope: Box<dyn Envelope<A>> = Box::new(CastEnvelope::<M, A> {
            message,
            self_ref: self.clone(),
            _marker: PhantomData,
        });
        self.send(envelope).map_err(|_| CastError::MailboxClosed)
    }

    pub async fn call_async<M>(&self, message: M, timeout: Duration) -> Result<M::Response, CallError>
    where
        M: Message,
        A: Handler<M>,
    {
        let (response_tx, response_rx) = oneshot::channel();
        let envelope: Box<dyn Envelope<A>> = Box::new(CallEnvelope::<M, A> {
            message,
            response_tx,
            self_ref: self.clone(),
            _marker: PhantomData,
        });
        self.send(envelope).map_err(|_| CallError::MailboxClosed)?;
        match tokio::time::timeout(timeout, response_rx).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(_)) => Err(CallError::ActorStopped),
            Err(_) => Err(CallError::Timeout),
        }
    }

    pub fn call<M>(&self, message: M, timeout: Duration) -> Result<M::Response, CallError>
    where
        M: Message,
        A: Handler<M>,
    {
        crate::block_on(self.call_async(message, timeout))
    }

    /// Waits until the inbox depth reaches zero, bounded by `timeout`.
    pub async fn wait_idle(&self, timeout: Duration) -> Result<(), DrainError> {
        tokio::time::timeout(timeout, self.depth.idle())
            .await
            .map_err(|_| DrainError::Timeout)
    }

    fn send(&self, envelope: Box<dyn Envelope<A>>) -> Result<(), ()> {
        self.depth.enqueued();
        match self.tx.send(envelope) {
            Ok(()) => Ok(()),
            Err(_) => {
                self.depth.drained();
                Err(())
            }
        }
    }
}

pub fn spawn_actor<A: Actor>(actor: A) -> (ActorRef<A>, JoinHandle<()>) {
    let (tx, rx) = mpsc::unbounded_channel::<Box<dyn Envelope<A>>>();
    let depth = Arc::new(MailboxDepth::new());
    let actor_ref = ActorRef {
        tx,
        depth: Arc::clone(&depth),
    };
    let join = crate::spawn(run_actor_loop(actor, rx, depth));
    (actor_ref, join)
}

async fn run_actor_loop<A: Actor>(
    mut actor: A,
    mut rx: mpsc::UnboundedReceiver<Box<dyn Envelope<A>>>,
    depth: Arc<MailboxDepth>,
) {
    let mut ctx = ActorContext::<A>::new();
    while let Some(envelope) = rx.recv().await {
        let result = AssertUnwindSafe(envelope.handle(&mut actor, &mut ctx))
            .catch_unwind()
            .await;
        depth.drained();
        if result.is_err() {
            break;
        }
        if ctx.is_stop_requested() {
            break;
        }
    }
    // A stopped actor still accounts for whatever was left queued, so
    // a waiting owner is released instead of stalling to its timeout.
    rx.close();
    while rx.try_recv().is_ok() {
        depth.drained();
    }
}
