use tokio::sync::Mutex;
use tokio::task::JoinSet;

/// Tracks the background tasks that execute research runs.
///
/// Every run spawned through the supervisor is joined on shutdown, so the
/// server never drops the database mid-write by exiting while a run is
/// still streaming.
#[derive(Default)]
pub struct RunSupervisor {
    tasks: Mutex<JoinSet<()>>,
}

impl RunSupervisor {
    /// Creates an empty supervisor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns a run task. Finished tasks are reaped opportunistically so
    /// the set does not grow without bound on a long-lived server.
    pub async fn spawn<F>(&self, task: F)
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let mut tasks = self.tasks.lock().await;

        while let Some(finished) = tasks.try_join_next() {
            if let Err(e) = finished {
                tracing::error!(error = %e, "Research run task panicked");
            }
        }

        tasks.spawn(task);
    }

    /// Number of run tasks not yet reaped. Finished-but-unreaped tasks
    /// count until the next `spawn` or `shutdown`.
    pub async fn active(&self) -> usize {
        self.tasks.lock().await.len()
    }

    /// Waits for every outstanding run task to finish.
    pub async fn shutdown(&self) {
        let mut tasks = self.tasks.lock().await;

        while let Some(finished) = tasks.join_next().await {
            if let Err(e) = finished {
                tracing::error!(error = %e, "Research run task panicked");
            }
        }
    }
}
