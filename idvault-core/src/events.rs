//! Vault change notifications.
//!
//! A single [`EventBus`] carries every [`VaultEvent`]. Listeners are called
//! synchronously, in subscription order, on the thread that emits.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use serde::Serialize;
use strum::{Display, EnumString};

use crate::vault_id::VaultId;

/// Kind of file access reported by [`VaultEvent::FileChanged`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FileOperation {
    /// A file was read.
    Read,
    /// A file was written.
    Write,
    /// A file was deleted.
    Delete,
}

/// A change notification.
///
/// Serializes as `{"type": "<dotted name>", "payload": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "payload")]
pub enum VaultEvent {
    /// The active vault was switched.
    #[serde(rename = "vault.changed")]
    VaultChanged {
        /// Previously active vault.
        previous: Option<VaultId>,
        /// Newly active vault.
        current: Option<VaultId>,
    },
    /// A routed file operation completed.
    #[serde(rename = "file.changed", rename_all = "camelCase")]
    FileChanged {
        /// Full path of the file after routing.
        file_path: String,
        /// Vault the file belongs to.
        vault_id: VaultId,
        /// What was done to the file.
        operation: FileOperation,
    },
    /// A DID record changed.
    #[serde(rename = "did.changed", rename_all = "camelCase")]
    DidChanged {
        /// The DID.
        did: String,
        /// Owning vault.
        vault_id: VaultId,
    },
    /// A key record changed.
    #[serde(rename = "key.changed", rename_all = "camelCase")]
    KeyChanged {
        /// Key id or public key hex.
        key_id: String,
        /// Owning vault.
        vault_id: VaultId,
    },
    /// A credential record changed.
    #[serde(rename = "vc.changed", rename_all = "camelCase")]
    VcChanged {
        /// Credential id.
        vc_id: String,
        /// Owning vault.
        vault_id: VaultId,
    },
}

impl VaultEvent {
    /// Dotted event type name, e.g. `vault.changed`.
    #[must_use]
    pub const fn event_type(&self) -> &'static str {
        match self {
            Self::VaultChanged { .. } => "vault.changed",
            Self::FileChanged { .. } => "file.changed",
            Self::DidChanged { .. } => "did.changed",
            Self::KeyChanged { .. } => "key.changed",
            Self::VcChanged { .. } => "vc.changed",
        }
    }

    /// Vault the event concerns. For `VaultChanged` this is the new vault.
    #[must_use]
    pub const fn vault_id(&self) -> Option<&VaultId> {
        match self {
            Self::VaultChanged { current, .. } => current.as_ref(),
            Self::FileChanged { vault_id, .. }
            | Self::DidChanged { vault_id, .. }
            | Self::KeyChanged { vault_id, .. }
            | Self::VcChanged { vault_id, .. } => Some(vault_id),
        }
    }
}

impl fmt::Display for VaultEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VaultChanged { previous, current } => write!(
                f,
                "vault.changed: {} -> {}",
                previous.as_ref().map_or("none", VaultId::value),
                current.as_ref().map_or("none", VaultId::value),
            ),
            Self::FileChanged {
                file_path,
                vault_id,
                operation,
            } => write!(f, "file.changed: {operation} {file_path} ({vault_id})"),
            Self::DidChanged { did, vault_id } => write!(f, "did.changed: {did} ({vault_id})"),
            Self::KeyChanged { key_id, vault_id } => {
                write!(f, "key.changed: {key_id} ({vault_id})")
            }
            Self::VcChanged { vc_id, vault_id } => write!(f, "vc.changed: {vc_id} ({vault_id})"),
        }
    }
}

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Listener = Arc<dyn Fn(&VaultEvent) + Send + Sync>;

/// Synchronous fan-out of [`VaultEvent`]s to subscribed listeners.
#[derive(Default)]
pub struct EventBus {
    next_id: AtomicU64,
    listeners: RwLock<Vec<(SubscriptionId, Listener)>>,
}

impl EventBus {
    /// Creates a bus with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `listener` for every future event.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&VaultEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(listener)));
        id
    }

    /// Removes a listener. Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self
            .listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let before = listeners.len();
        listeners.retain(|(sub, _)| *sub != id);
        listeners.len() != before
    }

    /// Delivers `event` to every listener in subscription order.
    ///
    /// Listeners run outside the bus lock, so they may subscribe or
    /// unsubscribe; such changes apply from the next event on.
    pub fn emit(&self, event: &VaultEvent) {
        let listeners: Vec<Listener> = self
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        log::trace!("emitting {} to {} listener(s)", event.event_type(), listeners.len());
        for listener in listeners {
            listener(event);
        }
    }

    /// Number of subscribed listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listener_count())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    fn vault_id(id: &str) -> VaultId {
        VaultId::create(id).unwrap()
    }

    fn recorder(bus: &EventBus) -> (SubscriptionId, Arc<Mutex<Vec<VaultEvent>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let id = bus.subscribe(move |event| sink.lock().unwrap().push(event.clone()));
        (id, seen)
    }

    #[test]
    fn test_emit_reaches_every_listener_in_order() {
        let bus = EventBus::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        for n in 0..3 {
            let order = Arc::clone(&order);
            bus.subscribe(move |_| order.lock().unwrap().push(n));
        }

        bus.emit(&VaultEvent::DidChanged {
            did: "did:key:z6Mk".into(),
            vault_id: vault_id("vault-a"),
        });
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_unsubscribe() {
        let bus = EventBus::new();
        let (id, seen) = recorder(&bus);
        assert_eq!(bus.listener_count(), 1);

        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.emit(&VaultEvent::VcChanged {
            vc_id: "urn:vc:1".into(),
            vault_id: vault_id("vault-a"),
        });
        assert!(seen.lock().unwrap().is_empty());
        assert_eq!(bus.listener_count(), 0);
    }

    #[test]
    fn test_listener_may_subscribe_during_emit() {
        let bus = Arc::new(EventBus::new());
        let inner = Arc::clone(&bus);
        bus.subscribe(move |_| {
            inner.subscribe(|_| {});
        });
        bus.emit(&VaultEvent::KeyChanged {
            key_id: "abc".into(),
            vault_id: vault_id("vault-a"),
        });
        assert_eq!(bus.listener_count(), 2);
    }

    #[test]
    fn test_event_wire_shape() {
        let event = VaultEvent::FileChanged {
            file_path: "/base/vault-a/dids/x.json".into(),
            vault_id: vault_id("vault-a"),
            operation: FileOperation::Write,
        };
        assert_eq!(event.event_type(), "file.changed");
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "file.changed");
        assert_eq!(value["payload"]["filePath"], "/base/vault-a/dids/x.json");
        assert_eq!(value["payload"]["vaultId"], "vault-a");
        assert_eq!(value["payload"]["operation"], "write");

        let event = VaultEvent::VaultChanged {
            previous: None,
            current: Some(vault_id("vault-b")),
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "vault.changed");
        assert!(value["payload"]["previous"].is_null());
        assert_eq!(value["payload"]["current"], "vault-b");
        assert_eq!(event.to_string(), "vault.changed: none -> vault-b");
        assert_eq!(event.vault_id().map(VaultId::value), Some("vault-b"));
    }
}
