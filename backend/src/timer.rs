//! Deferred commands
//!
//! A timer is a spawned task that sleeps, then posts one command back to the
//! game server. Dropping the [`TimerHandle`] aborts the task, so a timer
//! stored next to the state it belongs to dies with that state. A timer that
//! already fired cannot be recalled, so every timer command also carries the
//! identity it was scheduled for and is re-checked on delivery.

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::AbortHandle;

/// Abort-on-drop handle of a scheduled command
#[derive(Debug)]
pub struct TimerHandle(AbortHandle);

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Post `command` to `sender` after `delay`
pub fn schedule<C>(sender: UnboundedSender<C>, delay: Duration, command: C) -> TimerHandle
where
    C: Send + 'static,
{
    let task = tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let _ = sender.send(command);
    });
    TimerHandle(task.abort_handle())
}
