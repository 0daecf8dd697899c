//! Vault lifecycle: creation, JSON and adapter round trips, integrity and options.

mod common;

use idvault_core::{
    AdapterData, IdentityVault, StorageAdapters, VaultError, VaultIdError, VaultOptions,
    VaultProps,
};
use test_case::test_case;

#[test_case("" => matches Err(VaultIdError::Empty) ; "empty")]
#[test_case("a" => matches Err(VaultIdError::LengthOutOfRange { len: 1 }) ; "one char")]
#[test_case("ab" => matches Ok(_) ; "two chars")]
#[test_case("bad id" => matches Err(VaultIdError::InvalidCharacters) ; "space")]
#[test_case("vault.json" => matches Err(VaultIdError::InvalidCharacters) ; "dot")]
#[test_case("Alice_Main-01" => matches Ok(_) ; "mixed")]
fn vault_id_grammar(raw: &str) -> Result<(), VaultIdError> {
    match IdentityVault::create_new(raw) {
        Ok(_) => Ok(()),
        Err(VaultError::InvalidVaultId(err)) => Err(err),
        Err(err) => panic!("unexpected error: {err}"),
    }
}

#[test]
fn test_document_round_trip_preserves_everything() {
    let vault = common::alice_vault("alice-main");
    let document = vault.to_json_pretty().expect("pretty json");

    let restored = IdentityVault::from_json(&document).expect("from_json");
    assert_eq!(restored, vault);
    assert_eq!(restored.to_string(), vault.to_string());
    assert_eq!(restored.stats(), vault.stats());
}

#[test]
fn test_unknown_fields_survive_round_trip() {
    let document = serde_json::json!({
        "id": "foreign-vault",
        "didStore": [{
            "did": "did:web:example.com",
            "keys": [],
            "services": [{"id": "#hub", "type": "LinkedDomains"}],
            "x-origin": "imported"
        }],
        "vcStore": [{
            "id": "urn:vc:1",
            "type": "VerifiableCredential",
            "issuer": "did:web:example.com",
            "expirationDate": "2030-01-01T00:00:00Z"
        }]
    })
    .to_string();

    let vault = IdentityVault::from_json(&document).expect("from_json");
    let value: serde_json::Value = serde_json::from_str(&vault.to_string()).expect("json");
    assert_eq!(value["didStore"][0]["x-origin"], "imported");
    assert_eq!(value["vcStore"][0]["expirationDate"], "2030-01-01T00:00:00Z");
    assert_eq!(value["vcStore"][0]["issuer"], "did:web:example.com");
    assert!(vault.validate_integrity().is_ok());
}

#[test]
fn test_adapter_round_trip_through_memory_stores() {
    let vault = common::alice_vault("alice-main");
    let adapters = StorageAdapters::in_memory();
    adapters.save_vault(&vault).expect("save");

    let rebuilt = adapters
        .load_vault(vault.id().value(), Some(*vault.options()))
        .expect("load");
    assert_eq!(rebuilt.to_adapters(), vault.to_adapters());
    assert!(rebuilt.identity().is_none());
    assert!(rebuilt.wg_key_store().is_empty());
}

#[test]
fn test_duplicate_keys_collapse_to_last_item() {
    let mut renamed = common::did(common::ALICE_DID, common::ALICE_KEY_HEX);
    renamed.alias = Some("renamed".into());
    let vault = IdentityVault::create(VaultProps::new("dup-vault").dids(vec![
        common::did(common::ALICE_DID, common::ALICE_KEY_HEX),
        renamed.clone(),
    ]))
    .expect("vault");

    let data = vault.to_adapters();
    assert_eq!(data.dids.len(), 1);
    assert_eq!(data.dids[common::ALICE_DID], renamed);

    let rebuilt =
        IdentityVault::from_adapters("dup-vault", data, None).expect("from_adapters");
    assert_eq!(rebuilt.did_store(), &[renamed]);
}

#[test]
fn test_from_adapters_with_default_options() {
    let vault = IdentityVault::from_adapters("empty-adapters", AdapterData::default(), None)
        .expect("from_adapters");
    assert!(vault.is_empty());
    assert_eq!(vault.options(), &VaultOptions::default());
}

#[test]
fn test_integrity_failure_lists_all_problems() {
    let mut bad_did = common::did("web:example.com", common::ALICE_KEY_HEX);
    bad_did.alias = Some("missing prefix".into());
    let mut bad_vc = common::vc("", common::ALICE_DID);
    bad_vc.issuer = idvault_core::Issuer::Id(String::new());

    let vault = IdentityVault::create(
        VaultProps::new("broken-vault")
            .dids(vec![bad_did])
            .vcs(vec![bad_vc]),
    )
    .expect("vault");

    let err = vault.validate_integrity().expect_err("integrity");
    let message = err.to_string();
    assert!(message.starts_with("Vault integrity check failed"));
    assert!(message.contains("web:example.com"));
    assert!(message.contains("id, issuer"));
}
