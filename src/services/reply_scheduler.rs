use std::future::Future;
use std::time::Duration;

use tokio::task::AbortHandle;

/// Cancel handle for one deferred reply.
#[derive(Debug)]
pub struct ReplyHandle {
    abort: AbortHandle,
}

impl ReplyHandle {
    pub fn cancel(&self) {
        self.abort.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.abort.is_finished()
    }
}

/// Runs `deliver` once `delay` has elapsed. The caller does not wait.
pub fn schedule<F>(delay: Duration, deliver: F) -> ReplyHandle
where
    F: Future<Output = ()> + Send + 'static,
{
    let task = tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        deliver.await;
    });
    ReplyHandle { abort: task.abort_handle() }
}
