use std::panic::AssertUnwindSafe;

use actor::{Actor, SupervisionStrategy};
use actor_ref::ActorRef;
use futures::FutureExt;
use handler::Context;
use mailbox::bounded_mailbox;

pub mod actor;
pub mod actor_ref;
pub mod handler;
pub mod mailbox;

const MAILBOX_CAPACITY: usize = 32;

/// Spawns the actor onto the tokio runtime and returns its address. Messages
/// are handled one at a time, in the order they arrive. If a handler panics
/// the actor is resumed or stopped according to `Actor::on_fail()`. The actor
/// stops once every `ActorRef` is dropped.
pub fn run<A: Actor>(mut actor: A) -> ActorRef<A> {
    let (tx, mut rx) = bounded_mailbox(MAILBOX_CAPACITY);
    let actor_ref = ActorRef::new(tx);
    let context = Context::new(actor_ref.mailbox().downgrade());

    tokio::spawn(async move {
        while let Some(mut message) = rx.recv().await {
            let result = AssertUnwindSafe(message.handle(&mut actor, &context))
                .catch_unwind()
                .await;
            // handler paniced?
            if let Err(why) = result {
                log::error!("actor paniced: {:?}", why);
                match actor.on_fail(why) {
                    SupervisionStrategy::Resume => {}
                    SupervisionStrategy::Stop => break,
                }
            }
        }
        log::debug!("actor stopped");
    });

    actor_ref
}

#[cfg(test)]
mod tests {
    use std::any::Any;

    use async_trait::async_trait;

    use super::*;
    use crate::{
        actor::ActorError,
        handler::{Handler, Message},
    };

    struct Counter {
        count: i64,
        stop_on_fail: bool,
    }

    impl Actor for Counter {
        fn on_fail(&mut self, _: Box<dyn Any + Send>) -> SupervisionStrategy {
            if self.stop_on_fail {
                SupervisionStrategy::Stop
            } else {
                SupervisionStrategy::Resume
            }
        }
    }

    struct Increment(i64);

    impl Message for Increment {
        type Response = ();
    }

    struct GetValue;

    impl Message for GetValue {
        type Response = i64;
    }

    struct Explode;

    impl Message for Explode {
        type Response = ();
    }

    /// Increments later, by sending itself a message from a spawned task.
    struct IncrementLater(i64);

    impl Message for IncrementLater {
        type Response = ();
    }

    #[async_trait]
    impl Handler<Increment> for Counter {
        async fn handle(&mut self, message: Increment, _: &Context<Self>) {
            self.count += message.0;
        }
    }

    #[async_trait]
    impl Handler<GetValue> for Counter {
        async fn handle(&mut self, _: GetValue, _: &Context<Self>) -> i64 {
            self.count
        }
    }

    #[async_trait]
    impl Handler<Explode> for Counter {
        async fn handle(&mut self, _: Explode, _: &Context<Self>) {
            panic!("boom");
        }
    }

    #[async_trait]
    impl Handler<IncrementLater> for Counter {
        async fn handle(&mut self, message: IncrementLater, ctx: &Context<Self>) {
            if let Some(myself) = ctx.myself() {
                tokio::spawn(async move {
                    let _ = myself.tell(Increment(message.0)).await;
                });
            }
        }
    }

    #[tokio::test]
    async fn messages_are_handled_in_order() {
        let counter = run(Counter {
            count: 0,
            stop_on_fail: false,
        });
        counter.tell(Increment(1)).await.unwrap();
        counter.tell(Increment(5)).await.unwrap();
        counter.tell(Increment(-2)).await.unwrap();

        assert_eq!(counter.ask(GetValue).await.unwrap(), 4);
    }

    #[tokio::test]
    async fn panicking_handler_resumes_with_state() {
        let counter = run(Counter {
            count: 3,
            stop_on_fail: false,
        });

        assert_eq!(counter.ask(Explode).await, Err(ActorError::NoResponse));
        assert_eq!(counter.ask(GetValue).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn panicking_handler_can_stop_the_actor() {
        let counter = run(Counter {
            count: 0,
            stop_on_fail: true,
        });

        assert_eq!(counter.ask(Explode).await, Err(ActorError::NoResponse));
        assert!(counter.ask(GetValue).await.is_err());
        assert!(counter.is_stopped());
    }

    #[tokio::test]
    async fn handlers_can_message_themselves() {
        let counter = run(Counter {
            count: 0,
            stop_on_fail: false,
        });
        counter.tell(IncrementLater(7)).await.unwrap();

        let mut value = 0;
        for _ in 0..100 {
            value = counter.ask(GetValue).await.unwrap();
            if value == 7 {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(value, 7);
    }
}
