//! Cross-thread handle and the UI-thread mailbox.
//!
//! Every message posted through a [`WebviewHandle`] lands in the instance's
//! FIFO mailbox and wakes its event loop. Messages are executed on the UI
//! thread during the next loop iteration, never inline in the caller.

use tracing::debug;
use weave_common::{Result, WeaveError};

use crate::registry::{self, InstanceId, Lifecycle, Shared};
use crate::webview::Webview;

/// Work item executed on the UI thread.
pub type Task = Box<dyn FnOnce(&mut Webview) + Send + 'static>;

pub(crate) enum UiMessage {
    Dispatch(Task),
    Resolve {
        request_id: String,
        status: i32,
        result: String,
    },
    Terminate,
}

/// Thread-safe reference to an instance.
///
/// Cheap to copy. Every call re-checks the id against the registry, so a
/// handle that outlives its instance fails with `InvalidInstance` instead of
/// touching freed state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WebviewHandle {
    id: InstanceId,
}

impl WebviewHandle {
    pub fn from_id(id: InstanceId) -> Self {
        Self { id }
    }

    pub fn id(&self) -> InstanceId {
        self.id
    }

    /// `true` while the instance exists and has not terminated.
    pub fn is_alive(&self) -> bool {
        registry::lookup(self.id).is_some_and(|shared| shared.lifecycle() != Lifecycle::Terminated)
    }

    fn shared(&self) -> Result<std::sync::Arc<Shared>> {
        registry::lookup(self.id).ok_or_else(|| WeaveError::InvalidInstance(self.id.to_string()))
    }

    /// Run `task` on the UI thread, after everything dispatched before it.
    pub fn dispatch<F>(&self, task: F) -> Result<()>
    where
        F: FnOnce(&mut Webview) + Send + 'static,
    {
        let shared = self.shared()?;
        if shared.lifecycle() == Lifecycle::Terminated {
            return Err(WeaveError::InvalidInstance(format!(
                "{} has terminated",
                self.id
            )));
        }
        shared.post(UiMessage::Dispatch(Box::new(task)))
    }

    /// Settle a pending script call from any thread.
    ///
    /// Resolutions that arrive after the instance terminated are dropped.
    pub fn resolve(
        &self,
        request_id: impl Into<String>,
        status: i32,
        result: impl Into<String>,
    ) -> Result<()> {
        let shared = self.shared()?;
        let request_id = request_id.into();
        if shared.lifecycle() == Lifecycle::Terminated {
            debug!(instance = %self.id, request_id = %request_id, "late resolution ignored");
            return Ok(());
        }
        shared.post(UiMessage::Resolve {
            request_id,
            status,
            result: result.into(),
        })
    }

    /// Ask the event loop to exit. Idempotent; tasks already queued still run.
    pub fn terminate(&self) -> Result<()> {
        self.shared()?.request_terminate()
    }
}
