use tokio::sync::oneshot;

use crate::{
    actor::{Actor, ActorError},
    handler::{ActorMessage, Handler, Message},
    mailbox::Mailbox,
};

pub struct ActorRef<A: Actor> {
    sender: Mailbox<A>,
}

impl<A: Actor> Clone for ActorRef<A> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<A: Actor> ActorRef<A> {
    pub(crate) fn new(sender: Mailbox<A>) -> Self {
        Self { sender }
    }

    pub(crate) fn mailbox(&self) -> &Mailbox<A> {
        &self.sender
    }

    /// Whether the actor has stopped.
    pub fn is_stopped(&self) -> bool {
        self.sender.is_closed()
    }

    /// Queue a message without waiting for it to be handled.
    pub async fn tell<M>(&self, msg: M) -> Result<(), ActorError>
    where
        M: Message,
        A: Handler<M>,
    {
        let message = ActorMessage::<M, A>::new(msg, None);
        self.sender
            .send(message)
            .await
            .map_err(|_| ActorError::MailboxClosed)
    }

    /// Queue a message and wait for the handler's response.
    pub async fn ask<M>(&self, msg: M) -> Result<M::Response, ActorError>
    where
        M: Message,
        A: Handler<M>,
    {
        let (response_tx, response_rx) = oneshot::channel();
        let message = ActorMessage::<M, A>::new(msg, Some(response_tx));
        self.sender
            .send(message)
            .await
            .map_err(|_| ActorError::MailboxClosed)?;
        response_rx.await.map_err(|_| ActorError::NoResponse)
    }
}
