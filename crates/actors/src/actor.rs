use std::{any::Any, error, fmt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisionStrategy {
    /// Keep the actor and its state, drop the message that caused the panic.
    Resume,
    Stop,
}

pub trait Actor: Sized + Send + 'static {
    /// Called when a handler on the actor panics. The return value decides
    /// whether the actor keeps processing messages.
    /// NOTE: If this method panics, the actor can not recover from the panic.
    #[allow(unused_variables)]
    fn on_fail(&mut self, error: Box<dyn Any + Send>) -> SupervisionStrategy {
        SupervisionStrategy::Resume
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorError {
    /// The actor stopped, its mailbox does not accept messages anymore.
    MailboxClosed,
    /// The actor dropped the message before answering, usually because the
    /// handler panicked.
    NoResponse,
}

impl error::Error for ActorError {}

impl fmt::Display for ActorError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::MailboxClosed => write!(f, "The actor's mailbox is closed."),
            Self::NoResponse => write!(f, "The actor did not respond."),
        }
    }
}
