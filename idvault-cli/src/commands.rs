use std::path::{Path, PathBuf};
use std::sync::Arc;

use eyre::{bail, Result, WrapErr};
use idvault_core::{
    DynamicVaultFilesystem, IdentityVault, LocalFileSystem, OperationRegistry, StorageAdapters,
    StorageError, VaultContext, VaultError, VaultOperator, VaultStore, OP_STATS,
};
use serde_json::Value;

type Router = Arc<DynamicVaultFilesystem<LocalFileSystem>>;

/// Vaults under a base directory, with the local filesystem routed to the
/// selected one.
pub struct Workspace {
    operator: VaultOperator<LocalFileSystem>,
    router: Router,
    context: VaultContext,
}

impl Workspace {
    pub fn open(base_dir: &Path) -> Self {
        let context = VaultContext::new();
        context
            .events()
            .subscribe(|event| tracing::debug!(%event, "vault event"));

        let operator = VaultOperator::new(
            VaultStore::new(LocalFileSystem::new(), base_dir),
            context.clone(),
        );
        let router = Arc::new(DynamicVaultFilesystem::new(
            LocalFileSystem::new(),
            base_dir,
            context.clone(),
        ));
        Self {
            operator,
            router,
            context,
        }
    }

    fn vault_dir(&self) -> Result<PathBuf> {
        Ok(self.router.active_vault_dir()?)
    }

    /// Selects vault `id` and reads its document.
    fn load(&self, id: &str) -> Result<IdentityVault> {
        self.operator
            .use_vault(id)
            .and_then(|_| self.operator.get_vault(id))
            .wrap_err_with(|| format!("reading vault {id}"))
    }
}

pub fn new_vault(workspace: &Workspace, id: &str, force: bool) -> Result<String> {
    let vault = match workspace.operator.create_new(id) {
        Ok(vault) => vault,
        Err(StorageError::AlreadyExists(_)) if force => {
            let vault = IdentityVault::create_new(id)?;
            workspace.operator.update_vault(&vault)?;
            vault
        }
        Err(StorageError::AlreadyExists(_)) => {
            bail!("vault {id} already exists (pass --force to overwrite)")
        }
        Err(err) => return Err(err.into()),
    };
    workspace.operator.use_vault(id)?;
    Ok(format!(
        "created vault {} in {}",
        vault.id(),
        workspace.vault_dir()?.display()
    ))
}

pub fn show(workspace: &Workspace, id: &str, pretty: bool) -> Result<String> {
    let vault = workspace.load(id)?;
    if pretty {
        Ok(vault.to_json_pretty()?)
    } else {
        Ok(vault.to_string())
    }
}

pub fn stats(workspace: &Workspace, id: &str) -> Result<String> {
    let vault = workspace.load(id)?;
    let stats = OperationRegistry::with_builtins().execute(OP_STATS, &vault, &Value::Null)?;
    Ok(serde_json::to_string_pretty(&stats)?)
}

pub fn validate(workspace: &Workspace, id: &str) -> Result<String> {
    let vault = workspace.load(id)?;
    match vault.validate_integrity() {
        Ok(()) => Ok(format!("vault {} is valid", vault.id())),
        Err(VaultError::Integrity(report)) => {
            for violation in report.violations() {
                tracing::error!("{violation}");
            }
            bail!(
                "vault {} failed {} integrity check(s)",
                vault.id(),
                report.len()
            )
        }
        Err(err) => Err(err.into()),
    }
}

pub fn adapters(workspace: &Workspace, id: &str) -> Result<String> {
    let vault = workspace.load(id)?;
    Ok(serde_json::to_string_pretty(&vault.to_adapters())?)
}

pub fn export(workspace: &Workspace, id: &str) -> Result<String> {
    let vault = workspace.load(id)?;
    let data = vault.to_adapters();
    StorageAdapters::in_directory(&workspace.router, "")
        .with_context(workspace.context.clone())
        .save(&data)
        .wrap_err_with(|| format!("exporting vault {}", vault.id()))?;
    Ok(format!(
        "exported {} record(s) to {}",
        data.len(),
        workspace.vault_dir()?.display()
    ))
}

pub fn list(workspace: &Workspace) -> Result<String> {
    let vaults = workspace.operator.list_vaults()?;
    if vaults.is_empty() {
        let root = workspace.operator.store().paths().root();
        return Ok(format!("no vaults in {}", root.display()));
    }
    let lines: Vec<_> = vaults
        .iter()
        .map(|vault| format!("{}\t{} record(s)", vault.id(), vault.to_adapters().len()))
        .collect();
    Ok(lines.join("\n"))
}

pub fn delete(workspace: &Workspace, id: &str) -> Result<String> {
    workspace
        .operator
        .delete_vault(id)
        .wrap_err_with(|| format!("deleting vault {id}"))?;
    Ok(format!("deleted vault {id}"))
}

pub fn exec(workspace: &Workspace, id: &str, operation: &str, args: &str) -> Result<String> {
    let args: Value = serde_json::from_str(args).wrap_err("--args must be valid JSON")?;
    let vault = workspace.load(id)?;
    let result = OperationRegistry::with_builtins().execute(operation, &vault, &args)?;
    Ok(serde_json::to_string_pretty(&result)?)
}

#[cfg(test)]
mod tests {
    use idvault_core::{Identifier, Key, VaultProps, VAULT_DOCUMENT_MODE};

    use super::*;

    fn store(workspace: &Workspace, vault: &IdentityVault) {
        workspace
            .operator
            .store()
            .create(vault)
            .expect("store vault");
    }

    #[test]
    fn test_invalid_id() {
        let dir = tempfile::tempdir().expect("tempdir");
        let ws = Workspace::open(dir.path());
        assert!(new_vault(&ws, "no spaces", false).is_err());
        assert!(show(&ws, "no spaces", false).is_err());
    }

    #[test]
    fn test_new_then_show() {
        let dir = tempfile::tempdir().expect("tempdir");
        let ws = Workspace::open(dir.path());

        let message = new_vault(&ws, "alice-main", false).expect("new");
        assert!(message.starts_with("created vault alice-main"));
        assert!(dir.path().join("alice-main").join("vault.json").is_file());

        let err = new_vault(&ws, "alice-main", false).expect_err("already exists");
        assert!(err.to_string().contains("already exists"));
        new_vault(&ws, "alice-main", true).expect("forced overwrite");

        let shown: Value =
            serde_json::from_str(&show(&ws, "alice-main", false).expect("show")).unwrap();
        assert_eq!(shown["id"], "alice-main");
        assert_eq!(shown["didStore"], serde_json::json!([]));
    }

    #[test]
    fn test_force_replaces_populated_vault() {
        let dir = tempfile::tempdir().expect("tempdir");
        let ws = Workspace::open(dir.path());
        let vault = IdentityVault::create(
            VaultProps::new("reset").dids(vec![Identifier::new("did:key:z6MkReset")]),
        )
        .unwrap();
        store(&ws, &vault);

        new_vault(&ws, "reset", true).expect("forced overwrite");
        let counts: Value = serde_json::from_str(&stats(&ws, "reset").expect("stats")).unwrap();
        assert_eq!(counts["dids"], 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_document_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("tempdir");
        new_vault(&Workspace::open(dir.path()), "private", false).expect("new");
        let mode = std::fs::metadata(dir.path().join("private/vault.json"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, VAULT_DOCUMENT_MODE);
    }

    #[test]
    fn test_missing_vault() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = show(&Workspace::open(dir.path()), "ghost", true).expect_err("no document");
        assert!(err.to_string().contains("reading vault ghost"));
    }

    #[test]
    fn test_stats_and_exec() {
        let dir = tempfile::tempdir().expect("tempdir");
        let ws = Workspace::open(dir.path());
        new_vault(&ws, "counted", false).expect("new");

        let counts: Value = serde_json::from_str(&stats(&ws, "counted").expect("stats")).unwrap();
        assert_eq!(counts["dids"], 0);

        let report: Value =
            serde_json::from_str(&exec(&ws, "counted", "validate", "null").expect("exec"))
                .unwrap();
        assert_eq!(report["valid"], true);

        assert!(exec(&ws, "counted", "rotate", "null").is_err());
        assert!(exec(&ws, "counted", "find-vc", "{not json").is_err());
    }

    #[test]
    fn test_validate_fails_on_broken_vault() {
        let dir = tempfile::tempdir().expect("tempdir");
        let ws = Workspace::open(dir.path());
        let vault = IdentityVault::create(
            VaultProps::new("broken").dids(vec![Identifier::new("not-a-did")]),
        )
        .unwrap();
        store(&ws, &vault);

        let err = validate(&ws, "broken").expect_err("integrity failure");
        assert!(err.to_string().contains("failed 1 integrity check"));
    }

    #[test]
    fn test_export_writes_records_under_vault_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        let ws = Workspace::open(dir.path());
        let key = Key::new("key-1", "04abcd", "Ed25519");
        let vault = IdentityVault::create(
            VaultProps::new("exported")
                .dids(vec![Identifier::new("did:key:z6MkExport")])
                .keys(vec![key.clone()]),
        )
        .unwrap();
        store(&ws, &vault);

        let message = export(&ws, "exported").expect("export");
        assert!(message.starts_with("exported 2 record(s)"));

        let vault_dir = dir.path().join("exported");
        assert!(vault_dir.join("dids").is_dir());
        assert!(vault_dir.join("keys").is_dir());

        let loaded = StorageAdapters::in_directory(&ws.router, "")
            .load()
            .expect("load");
        assert_eq!(loaded.keys.get("04abcd"), Some(&key));
    }

    #[test]
    fn test_list_and_delete() {
        let dir = tempfile::tempdir().expect("tempdir");
        let ws = Workspace::open(dir.path());
        assert!(list(&ws).expect("empty list").starts_with("no vaults in"));

        new_vault(&ws, "work-vault", false).expect("new");
        store(
            &ws,
            &IdentityVault::create(
                VaultProps::new("home-vault").dids(vec![Identifier::new("did:key:z6MkHome")]),
            )
            .unwrap(),
        );
        std::fs::create_dir(dir.path().join("scratch")).unwrap();
        assert_eq!(
            list(&ws).expect("list"),
            "home-vault\t1 record(s)\nwork-vault\t0 record(s)"
        );

        export(&ws, "home-vault").expect("export");
        assert_eq!(
            delete(&ws, "home-vault").expect("delete"),
            "deleted vault home-vault"
        );
        assert!(!dir.path().join("home-vault").exists());
        assert!(!ws.context.has_active_vault());

        let err = delete(&ws, "home-vault").expect_err("already gone");
        assert!(err.to_string().contains("deleting vault home-vault"));
        assert_eq!(list(&ws).expect("list"), "work-vault\t0 record(s)");
    }
}
