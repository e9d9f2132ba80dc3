use std::{convert::Infallible, time::Duration};

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::{Stream, StreamExt};
use time::OffsetDateTime;
use tokio::{sync::watch, task::JoinHandle, time::interval};
use tokio_stream::wrappers::WatchStream;
use tracing::info;

use crate::{dto::prediction::CountdownResponse, state::SharedState};

/// One observation of the time remaining until the prediction deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownTick {
    /// Whole seconds left before the deadline, floored at zero.
    pub remaining_seconds: i64,
    /// True once the deadline has been reached; never flips back.
    pub locked: bool,
}

impl CountdownTick {
    /// Compute the tick for `deadline` as seen at `now`.
    pub fn at(deadline: OffsetDateTime, now: OffsetDateTime) -> Self {
        let remaining = (deadline - now).whole_seconds();
        Self {
            remaining_seconds: remaining.max(0),
            locked: remaining <= 0,
        }
    }
}

/// Owner of the 1-second countdown ticker task.
///
/// The task publishes ticks over a watch channel; once the deadline passes
/// it latches the locked tick and exits. Dropping the handle aborts the
/// task, so the ticker cannot outlive the state that owns it.
pub struct CountdownHandle {
    receiver: watch::Receiver<CountdownTick>,
    task: JoinHandle<()>,
}

impl CountdownHandle {
    /// Spawn the ticker for `deadline`.
    pub fn spawn(deadline: OffsetDateTime) -> Self {
        let initial = CountdownTick::at(deadline, OffsetDateTime::now_utc());
        let (sender, receiver) = watch::channel(initial);
        let task = tokio::spawn(run_ticker(sender, deadline));
        Self { receiver, task }
    }

    /// The most recent tick.
    pub fn snapshot(&self) -> CountdownTick {
        *self.receiver.borrow()
    }

    /// Subscribe to subsequent ticks.
    pub fn subscribe(&self) -> watch::Receiver<CountdownTick> {
        self.receiver.clone()
    }
}

impl Drop for CountdownHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Forward countdown ticks to an SSE response, one event per second.
///
/// The stream owns its watch subscription, so the returned response does not
/// borrow the state (`use<>` opts out of capturing its lifetime). It ends
/// with the locked tick once the deadline passes; axum drops the
/// subscription when the client disconnects.
pub fn sse_stream(
    state: &SharedState,
) -> Sse<impl Stream<Item = Result<Event, Infallible>> + use<>> {
    let deadline = state.config().deadline;
    let stream = WatchStream::new(state.countdown().subscribe()).map(move |tick| {
        let payload = CountdownResponse::new(tick, deadline);
        let event = Event::default().event("countdown");
        Ok(match serde_json::to_string(&payload) {
            Ok(data) => event.data(data),
            Err(_) => event.data("{}"),
        })
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

async fn run_ticker(sender: watch::Sender<CountdownTick>, deadline: OffsetDateTime) {
    let mut ticker = interval(Duration::from_secs(1));
    loop {
        ticker.tick().await;
        let tick = CountdownTick::at(deadline, OffsetDateTime::now_utc());
        if sender.send(tick).is_err() {
            break;
        }
        if tick.locked {
            info!("prediction deadline reached; countdown stopped");
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fake_remote::{FakeRemote, test_state};
    use time::Duration as TimeDuration;
    use time::macros::datetime;

    #[test]
    fn tick_before_deadline_counts_down() {
        let deadline = datetime!(2025-08-08 19:00 UTC);
        let tick = CountdownTick::at(deadline, datetime!(2025-08-08 18:58:30 UTC));
        assert_eq!(tick.remaining_seconds, 90);
        assert!(!tick.locked);
    }

    #[test]
    fn tick_at_deadline_is_locked() {
        let deadline = datetime!(2025-08-08 19:00 UTC);
        let tick = CountdownTick::at(deadline, deadline);
        assert_eq!(tick.remaining_seconds, 0);
        assert!(tick.locked);
    }

    #[test]
    fn tick_after_deadline_floors_at_zero() {
        let deadline = datetime!(2025-08-08 19:00 UTC);
        let tick = CountdownTick::at(deadline, datetime!(2025-08-09 00:00 UTC));
        assert_eq!(tick.remaining_seconds, 0);
        assert!(tick.locked);
    }

    #[tokio::test]
    async fn handle_starts_locked_for_past_deadline() {
        let handle = CountdownHandle::spawn(OffsetDateTime::now_utc() - TimeDuration::hours(1));
        assert!(handle.snapshot().locked);
    }

    #[tokio::test]
    async fn handle_starts_open_for_future_deadline() {
        let handle = CountdownHandle::spawn(OffsetDateTime::now_utc() + TimeDuration::days(30));
        let tick = handle.snapshot();
        assert!(!tick.locked);
        assert!(tick.remaining_seconds > 0);
    }

    #[tokio::test]
    async fn sse_response_does_not_borrow_the_state() {
        let (state, _remote) = test_state(FakeRemote::new());

        // The response must be returnable past the end of the state borrow,
        // as route handlers do.
        let sse = {
            let local = state.clone();
            sse_stream(&local)
        };

        drop(state);
        drop(sse);
    }
}
