//! The active-vault context shared by the router and its observers.

use std::sync::{Arc, PoisonError, RwLock};

use crate::error::{StorageError, StorageResult};
use crate::events::{EventBus, VaultEvent};
use crate::vault_id::VaultId;

#[derive(Debug, Default)]
struct Inner {
    active: RwLock<Option<VaultId>>,
    events: EventBus,
}

/// Holds the active vault id and the event bus that announces changes.
///
/// Cloning is cheap and every clone sees the same state. Independent
/// contexts are fully isolated, so separate tasks can route to separate
/// vaults at the same time.
#[derive(Debug, Clone, Default)]
pub struct VaultContext {
    inner: Arc<Inner>,
}

impl VaultContext {
    /// Creates a context with no active vault.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context with `vault_id` already active. No event is emitted.
    #[must_use]
    pub fn with_active_vault(vault_id: VaultId) -> Self {
        let ctx = Self::new();
        *ctx.write_active() = Some(vault_id);
        ctx
    }

    /// Switches the active vault and emits [`VaultEvent::VaultChanged`].
    ///
    /// Passing `None` clears the selection.
    pub fn set_active_vault(&self, vault_id: Option<VaultId>) {
        let previous = {
            let mut active = self.write_active();
            std::mem::replace(&mut *active, vault_id.clone())
        };
        log::debug!(
            "active vault changed: {} -> {}",
            previous.as_ref().map_or("none", VaultId::value),
            vault_id.as_ref().map_or("none", VaultId::value),
        );
        self.inner.events.emit(&VaultEvent::VaultChanged {
            previous,
            current: vault_id,
        });
    }

    /// The active vault id, if any.
    #[must_use]
    pub fn active_vault_id(&self) -> Option<VaultId> {
        self.inner
            .active
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns `true` if a vault is active.
    #[must_use]
    pub fn has_active_vault(&self) -> bool {
        self.inner
            .active
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// The active vault id.
    ///
    /// # Errors
    /// Returns [`StorageError::NoActiveVault`] if no vault is active.
    pub fn require_active_vault(&self) -> StorageResult<VaultId> {
        self.active_vault_id().ok_or(StorageError::NoActiveVault)
    }

    /// The event bus for this context.
    #[must_use]
    pub fn events(&self) -> &EventBus {
        &self.inner.events
    }

    /// Shorthand for `self.events().emit(&event)`.
    pub fn emit(&self, event: &VaultEvent) {
        self.inner.events.emit(event);
    }

    fn write_active(&self) -> std::sync::RwLockWriteGuard<'_, Option<VaultId>> {
        self.inner
            .active
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
