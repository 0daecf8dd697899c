//! Named read-only operations over a vault.
//!
//! An [`OperationRegistry`] maps operation names to handlers taking the vault
//! and JSON arguments and returning a JSON result. Hosts register their own
//! operations next to the built-in diagnostics.

use std::fmt;

use indexmap::IndexMap;
use serde_json::{json, Value};

use crate::error::{VaultError, VaultResult};
use crate::vault::IdentityVault;

/// Signature of a registered operation.
pub type OperationHandler =
    Box<dyn Fn(&IdentityVault, &Value) -> VaultResult<Value> + Send + Sync>;

/// Name of the built-in statistics operation.
pub const OP_STATS: &str = "stats";
/// Name of the built-in integrity operation.
pub const OP_VALIDATE: &str = "validate";
/// Name of the built-in credential lookup operation.
pub const OP_FIND_VC: &str = "find-vc";

/// Operation handlers keyed by name, in registration order.
#[derive(Default)]
pub struct OperationRegistry {
    handlers: IndexMap<String, OperationHandler>,
}

impl OperationRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in operations:
    ///
    /// - `stats`: the vault's [`crate::VaultStats`].
    /// - `validate`: `{"valid": bool, "violations": [...]}`. Never fails;
    ///   violations are data here.
    /// - `find-vc`: takes `{"id": "<credential id>"}` or a bare id string and
    ///   returns the first matching credential, or `null`.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(OP_STATS, |vault, _| {
            serde_json::to_value(vault.stats())
                .map_err(|err| VaultError::Serialization(err.to_string()))
        });
        registry.register(OP_VALIDATE, |vault, _| {
            let report = vault.integrity_report();
            Ok(json!({
                "valid": report.is_ok(),
                "violations": report.violations(),
            }))
        });
        registry.register(OP_FIND_VC, |vault, args| {
            let id = args
                .as_str()
                .or_else(|| args.get("id").and_then(Value::as_str))
                .ok_or_else(|| VaultError::operation("find-vc requires an \"id\" argument"))?;
            serde_json::to_value(vault.find_vc(id))
                .map_err(|err| VaultError::Serialization(err.to_string()))
        });
        registry
    }

    /// Registers `handler` under `name`, replacing any previous handler.
    pub fn register<H>(&mut self, name: impl Into<String>, handler: H)
    where
        H: Fn(&IdentityVault, &Value) -> VaultResult<Value> + Send + Sync + 'static,
    {
        let name = name.into();
        if self.handlers.insert(name.clone(), Box::new(handler)).is_some() {
            log::debug!("replaced handler for operation {name}");
        }
    }

    /// Returns `true` if an operation named `name` is registered.
    #[must_use]
    pub fn can_handle(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Registered operation names, in registration order.
    #[must_use]
    pub fn operations(&self) -> Vec<&str> {
        self.handlers.keys().map(String::as_str).collect()
    }

    /// Runs operation `name` against `vault`.
    ///
    /// # Errors
    /// Returns [`VaultError::UnknownOperation`] if nothing is registered under
    /// `name`, or whatever the handler returns.
    pub fn execute(&self, name: &str, vault: &IdentityVault, args: &Value) -> VaultResult<Value> {
        let handler = self
            .handlers
            .get(name)
            .ok_or_else(|| VaultError::UnknownOperation(name.to_string()))?;
        log::debug!("executing operation {name} on vault {}", vault.id());
        handler(vault, args)
    }
}

impl fmt::Debug for OperationRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationRegistry")
            .field("operations", &self.operations())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{populated_props, sample_vc, SAMPLE_VC_ID};
    use crate::vault::VaultProps;

    fn vault() -> IdentityVault {
        IdentityVault::create(populated_props("ops-vault")).unwrap()
    }

    #[test]
    fn test_builtins_are_registered() {
        let registry = OperationRegistry::with_builtins();
        assert_eq!(registry.operations(), vec!["stats", "validate", "find-vc"]);
        assert!(registry.can_handle("stats"));
        assert!(!registry.can_handle("rotate-keys"));
    }

    #[test]
    fn test_unknown_operation() {
        let registry = OperationRegistry::new();
        let err = registry
            .execute("stats", &vault(), &Value::Null)
            .expect_err("empty registry");
        match err {
            VaultError::UnknownOperation(name) => assert_eq!(name, "stats"),
            _ => panic!("unexpected error: {err}"),
        }
    }

    #[test]
    fn test_stats_operation() {
        let registry = OperationRegistry::with_builtins();
        let vault = vault();
        let stats = registry.execute(OP_STATS, &vault, &Value::Null).unwrap();
        assert_eq!(stats["dids"], 1);
        assert_eq!(stats["privateKeys"], 1);
        assert_eq!(stats["hasIdentity"], false);
        assert_eq!(stats["size"], vault.estimate_size());
    }

    #[test]
    fn test_validate_operation_reports_violations() {
        let registry = OperationRegistry::with_builtins();
        let ok = registry
            .execute(OP_VALIDATE, &vault(), &Value::Null)
            .unwrap();
        assert_eq!(ok, json!({"valid": true, "violations": []}));

        let mut bad = crate::Identifier::new("nope");
        bad.alias = Some("broken".into());
        let broken = IdentityVault::create(VaultProps::new("broken").dids(vec![bad])).unwrap();
        let report = registry
            .execute(OP_VALIDATE, &broken, &Value::Null)
            .unwrap();
        assert_eq!(report["valid"], false);
        assert_eq!(report["violations"][0]["store"], "didStore");
        assert_eq!(report["violations"][0]["item"], "nope");
    }

    #[test]
    fn test_find_vc_operation() {
        let registry = OperationRegistry::with_builtins();
        let vault = vault();
        let expected = serde_json::to_value(sample_vc()).unwrap();

        let found = registry
            .execute(OP_FIND_VC, &vault, &json!({ "id": SAMPLE_VC_ID }))
            .unwrap();
        assert_eq!(found, expected);
        let found = registry
            .execute(OP_FIND_VC, &vault, &json!(SAMPLE_VC_ID))
            .unwrap();
        assert_eq!(found, expected);
        let missing = registry
            .execute(OP_FIND_VC, &vault, &json!({ "id": "urn:missing" }))
            .unwrap();
        assert!(missing.is_null());

        let err = registry
            .execute(OP_FIND_VC, &vault, &json!({}))
            .expect_err("no id");
        assert!(matches!(err, VaultError::Operation(_)));
    }

    #[test]
    fn test_custom_operation_replaces_builtin() {
        let mut registry = OperationRegistry::with_builtins();
        registry.register("stats", |vault, _| Ok(json!(vault.id().value())));
        registry.register("did-count", |vault, _| Ok(json!(vault.did_store().len())));

        assert_eq!(
            registry.execute("stats", &vault(), &Value::Null).unwrap(),
            json!("ops-vault")
        );
        assert_eq!(
            registry.execute("did-count", &vault(), &Value::Null).unwrap(),
            json!(1)
        );
        assert_eq!(
            registry.operations(),
            vec!["stats", "validate", "find-vc", "did-count"]
        );
    }
}
