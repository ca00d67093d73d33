// One-time initialization barrier for the process-wide client. The first call
// builds the client (which may run an interactive sign-in); concurrent callers
// wait for that attempt instead of starting their own. A failed attempt leaves
// the gate empty, so the next call tries again.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::OnceCell;

pub struct ClientGate<T> {
    cell: OnceCell<Arc<T>>,
}

impl<T> Default for ClientGate<T> {
    fn default() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }
}

impl<T> ClientGate<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the client, building it with `init` if this is the first
    /// successful call.
    pub async fn get_or_init<F, Fut, E>(&self, init: F) -> Result<Arc<T>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let client = self
            .cell
            .get_or_try_init(|| async {
                tracing::info!("Initializing Google API client");
                init().await.map(Arc::new)
            })
            .await?;
        Ok(Arc::clone(client))
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.initialized()
    }
}
