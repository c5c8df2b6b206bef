use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::{
    messaging::port::{ChatBackend, MessageHandler},
    Result,
};

/// Poll `backend` until `cancel` fires.
///
/// Sleeps `interval` between polls. The first error from `serve_once` (client
/// or handler) stops the loop and is returned unchanged; there is no retry.
/// Returns the total number of messages dispatched.
pub async fn serve_forever<B>(
    backend: &B,
    handler: &dyn MessageHandler,
    interval: Duration,
    cancel: CancellationToken,
) -> Result<u64>
where
    B: ChatBackend + ?Sized,
{
    tracing::info!(
        mode = backend.mode(),
        bot = %backend.bot_identifier(),
        interval_ms = interval.as_millis() as u64,
        "serving"
    );

    let mut total: u64 = 0;
    while !cancel.is_cancelled() {
        let dispatched = match backend.serve_once(handler).await {
            Ok(n) => n,
            Err(e) => {
                tracing::error!(error = %e, dispatched = total, "poll failed, stopping");
                return Err(e);
            }
        };
        if dispatched > 0 {
            tracing::debug!(dispatched, "poll dispatched messages");
        }
        total += dispatched as u64;

        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(interval) => {}
        }
    }

    tracing::info!(dispatched = total, "serve loop stopped");
    Ok(total)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::{
        domain::{Identifier, RoomId},
        messaging::{port::RoomPort, types::Message},
        presence::{Presence, PresenceStatus},
        Error,
    };

    struct NullRoom(RoomId);

    #[async_trait]
    impl RoomPort for NullRoom {
        fn id(&self) -> &RoomId {
            &self.0
        }
        async fn join(&self) -> Result<()> {
            Ok(())
        }
        async fn leave(&self, _reason: Option<&str>) -> Result<()> {
            Ok(())
        }
        async fn create(&self) -> Result<()> {
            Ok(())
        }
        async fn destroy(&self) -> Result<()> {
            Ok(())
        }
        async fn exists(&self) -> Result<bool> {
            Ok(true)
        }
        async fn joined(&self) -> Result<bool> {
            Ok(false)
        }
        async fn topic(&self) -> Result<Option<String>> {
            Ok(None)
        }
        async fn set_topic(&self, _topic: &str) -> Result<()> {
            Ok(())
        }
        async fn occupants(&self) -> Result<Vec<Identifier>> {
            Ok(vec![])
        }
        async fn invite(&self, _identifiers: &[Identifier]) -> Result<()> {
            Ok(())
        }
    }

    /// Dispatches one message per poll; cancels after `stop_after` polls or
    /// fails on poll number `fail_on`.
    struct ScriptedBackend {
        bot: Identifier,
        polls: AtomicUsize,
        stop_after: usize,
        fail_on: Option<usize>,
        cancel: CancellationToken,
    }

    impl ScriptedBackend {
        fn new(stop_after: usize, fail_on: Option<usize>, cancel: CancellationToken) -> Self {
            Self {
                bot: Identifier::user("bot"),
                polls: AtomicUsize::new(0),
                stop_after,
                fail_on,
                cancel,
            }
        }
    }

    #[async_trait]
    impl ChatBackend for ScriptedBackend {
        type Room = NullRoom;
        type Connection = ();

        fn mode(&self) -> &'static str {
            "scripted"
        }
        fn bot_identifier(&self) -> &Identifier {
            &self.bot
        }
        fn build_identifier(&self, text: &str) -> Result<Identifier> {
            Err(Error::UnrecognizedIdentifier(text.to_string()))
        }
        fn build_reply(&self, msg: &Message, text: &str, _private: bool) -> Message {
            let mut reply = self.build_message(text).with_from(self.bot.clone());
            reply.to = msg.from.clone().map(Into::into);
            reply
        }
        fn prefix_groupchat_reply(&self, _msg: &mut Message, _identifier: &Identifier) {}
        async fn serve_once(&self, handler: &dyn MessageHandler) -> Result<usize> {
            let n = self.polls.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail_on == Some(n) {
                return Err(Error::Client("connection reset".to_string()));
            }
            handler.on_message(&Message::new(format!("poll {n}"))).await?;
            if n >= self.stop_after {
                self.cancel.cancel();
            }
            Ok(1)
        }
        async fn send_message(&self, _msg: &Message) -> Result<()> {
            Ok(())
        }
        fn connect(&self) -> Self::Connection {}
        async fn query_room(&self, name: &str) -> Result<Self::Room> {
            Ok(NullRoom(RoomId::new(name)))
        }
        async fn rooms(&self) -> Result<Vec<Self::Room>> {
            Ok(vec![])
        }
        async fn change_presence(&self, _status: PresenceStatus, _message: &str) -> Result<()> {
            Ok(())
        }
        async fn presence(&self) -> Presence {
            Presence::default()
        }
    }

    #[derive(Default)]
    struct CountingHandler {
        seen: AtomicUsize,
    }

    #[async_trait]
    impl MessageHandler for CountingHandler {
        async fn on_message(&self, _msg: &Message) -> Result<()> {
            self.seen.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn stops_when_cancelled() {
        let cancel = CancellationToken::new();
        let backend = ScriptedBackend::new(3, None, cancel.clone());
        let handler = CountingHandler::default();

        let total = serve_forever(&backend, &handler, Duration::from_millis(1), cancel)
            .await
            .unwrap();

        assert_eq!(total, 3);
        assert_eq!(handler.seen.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn returns_first_error_without_retry() {
        let cancel = CancellationToken::new();
        let backend = ScriptedBackend::new(10, Some(2), cancel.clone());
        let handler = CountingHandler::default();

        let err = serve_forever(&backend, &handler, Duration::from_millis(1), cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Client(_)));
        assert_eq!(backend.polls.load(Ordering::SeqCst), 2);
        assert_eq!(handler.seen.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn already_cancelled_token_never_polls() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let backend = ScriptedBackend::new(1, None, cancel.clone());
        let handler = CountingHandler::default();

        let total = serve_forever(&backend, &handler, Duration::from_millis(1), cancel)
            .await
            .unwrap();

        assert_eq!(total, 0);
        assert_eq!(backend.polls.load(Ordering::SeqCst), 0);
    }
}
