use std::marker::PhantomData;

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::{actor_ref::ActorRef, mailbox::WeakMailbox, Actor};

#[async_trait]
pub trait Handler<M>: Actor
where
    M: Message,
{
    async fn handle(&mut self, message: M, ctx: &Context<Self>) -> M::Response;
}

pub trait Message: Send + 'static {
    type Response: Send + 'static;
}

/// Handed to every handler. Gives access to the actor's own address without
/// keeping the actor alive.
pub struct Context<A: Actor> {
    myself: WeakMailbox<A>,
}

impl<A: Actor> Context<A> {
    pub(crate) fn new(myself: WeakMailbox<A>) -> Self {
        Self { myself }
    }

    /// A reference to the running actor, or `None` once every other
    /// reference is gone and the actor is shutting down.
    pub fn myself(&self) -> Option<ActorRef<A>> {
        self.myself.upgrade().map(ActorRef::new)
    }
}

#[async_trait]
pub trait MessageHandler<A: Actor>: Send {
    async fn handle(&mut self, actor: &mut A, ctx: &Context<A>);
}

pub struct ActorMessage<M, A>
where
    M: Message,
    A: Actor,
{
    message: Option<M>,
    respond_to: Option<oneshot::Sender<M::Response>>,
    _phantom_actor: PhantomData<fn() -> A>,
}

impl<M, A> ActorMessage<M, A>
where
    M: Message,
    A: Actor,
{
    pub fn new(message: M, respond_to: Option<oneshot::Sender<M::Response>>) -> Self {
        Self {
            message: Some(message),
            respond_to,
            _phantom_actor: PhantomData,
        }
    }
}

#[async_trait]
impl<M, A> MessageHandler<A> for ActorMessage<M, A>
where
    M: Message,
    A: Handler<M>,
{
    async fn handle(&mut self, actor: &mut A, ctx: &Context<A>) {
        let Some(message) = self.message.take() else {
            log::error!("Message was handled twice!");
            return;
        };
        let result = actor.handle(message, ctx).await;

        if let Some(respond_to) = self.respond_to.take() {
            respond_to
                .send(result)
                .unwrap_or_else(|_| log::debug!("Asker went away before the response."));
        }
    }
}
