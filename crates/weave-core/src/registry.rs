//! Generation-checked instance handles.
//!
//! Every live [`Webview`](crate::Webview) owns one slot in a process-wide
//! table. The slot holds only the thread-safe half of the instance (mailbox
//! sender, backend waker, lifecycle flag), so any thread can post into it.
//! Destroying an instance bumps the slot's generation: ids handed out before
//! the destroy stop resolving, even after the index is reused.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::ThreadId;

use weave_common::{Result, WeaveError};

use crate::platform::Waker;
use crate::queue::UiMessage;

/// Opaque instance identifier: a slot index plus the slot generation it was
/// issued for. Generations start at 1, so the raw form is never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceId {
    index: u32,
    generation: u32,
}

impl InstanceId {
    pub fn index(self) -> u32 {
        self.index
    }

    pub fn generation(self) -> u32 {
        self.generation
    }

    /// Pack into a non-zero `u64` (generation in the high half).
    pub fn to_raw(self) -> u64 {
        (u64::from(self.generation) << 32) | u64::from(self.index)
    }

    pub fn from_raw(raw: u64) -> Option<Self> {
        let generation = (raw >> 32) as u32;
        if generation == 0 {
            return None;
        }
        Some(Self {
            index: raw as u32,
            generation,
        })
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "webview#{}v{}", self.index, self.generation)
    }
}

struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Slot table with generation-checked ids.
pub struct SlotTable<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    len: usize,
}

impl<T> SlotTable<T> {
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }

    pub fn insert(&mut self, value: T) -> InstanceId {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.value = Some(value);
            return InstanceId {
                index,
                generation: slot.generation,
            };
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 1,
            value: Some(value),
        });
        InstanceId {
            index,
            generation: 1,
        }
    }

    pub fn get(&self, id: InstanceId) -> Option<&T> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.value.as_ref())
    }

    pub fn remove(&mut self, id: InstanceId) -> Option<T> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let value = slot.value.take()?;
        // Skip 0 on wrap-around so raw ids stay non-zero.
        slot.generation = slot.generation.wrapping_add(1).max(1);
        self.free.push(id.index);
        self.len -= 1;
        Some(value)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<T> Default for SlotTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Instance lifecycle: `Created -> Running -> Terminated`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Lifecycle {
    Created = 0,
    Running = 1,
    Terminated = 2,
}

impl Lifecycle {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => Self::Created,
            1 => Self::Running,
            _ => Self::Terminated,
        }
    }
}

/// Thread-safe half of an instance.
pub(crate) struct Shared {
    sender: Sender<UiMessage>,
    waker: Arc<dyn Waker>,
    lifecycle: AtomicU8,
    terminate_requested: AtomicBool,
    owner: ThreadId,
}

impl Shared {
    pub(crate) fn new(sender: Sender<UiMessage>, waker: Arc<dyn Waker>) -> Self {
        Self {
            sender,
            waker,
            lifecycle: AtomicU8::new(Lifecycle::Created as u8),
            terminate_requested: AtomicBool::new(false),
            owner: std::thread::current().id(),
        }
    }

    pub(crate) fn lifecycle(&self) -> Lifecycle {
        Lifecycle::from_u8(self.lifecycle.load(Ordering::Acquire))
    }

    pub(crate) fn set_lifecycle(&self, state: Lifecycle) {
        self.lifecycle.store(state as u8, Ordering::Release);
    }

    pub(crate) fn owner(&self) -> ThreadId {
        self.owner
    }

    /// Queue a message for the UI thread and wake its loop.
    pub(crate) fn post(&self, message: UiMessage) -> Result<()> {
        self.sender
            .send(message)
            .map_err(|_| WeaveError::InvalidInstance("mailbox closed".into()))?;
        self.waker.wake();
        Ok(())
    }

    /// Idempotent: only the first request posts a `Terminate` message.
    pub(crate) fn request_terminate(&self) -> Result<()> {
        if self.terminate_requested.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        self.post(UiMessage::Terminate)
    }
}

static INSTANCES: Mutex<SlotTable<Arc<Shared>>> = Mutex::new(SlotTable::new());

fn table() -> MutexGuard<'static, SlotTable<Arc<Shared>>> {
    // The table holds no invariants a panicking holder could break.
    INSTANCES.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub(crate) fn register(shared: Arc<Shared>) -> InstanceId {
    table().insert(shared)
}

pub(crate) fn lookup(id: InstanceId) -> Option<Arc<Shared>> {
    table().get(id).cloned()
}

pub(crate) fn unregister(id: InstanceId) -> bool {
    table().remove(id).is_some()
}

/// Thread that created (and owns) the instance, if it is still alive.
pub fn owner_thread(id: InstanceId) -> Option<ThreadId> {
    lookup(id).map(|shared| shared.owner())
}
