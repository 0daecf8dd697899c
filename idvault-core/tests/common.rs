//! Common test utilities shared across integration tests.

#![allow(dead_code, missing_docs)]

use std::sync::{Arc, Mutex};

use idvault_core::{
    Identifier, IdentityVault, Key, ManagedPrivateKey, VaultContext, VaultEvent, VaultProps,
    VerifiableCredential,
};
use serde_json::json;

pub const ALICE_DID: &str = "did:key:z6MkttjNynPdkYY7vcnBvwsRJEgNe6ei1SoPxh4u7dFuVWsx";
pub const ALICE_KEY_HEX: &str =
    "d68a0b4ecc7e9317510a3f64a6f659547e27f325b0feba5d95bcdc3175d114ff";
pub const ALICE_VC_ID: &str = "urn:uuid:123e4567-e89b-12d3-a456-426614174000";

pub fn key(public_key_hex: &str) -> Key {
    serde_json::from_value(json!({
        "type": "Ed25519",
        "kid": public_key_hex,
        "publicKeyHex": public_key_hex,
        "kms": "local",
        "meta": {"algorithms": ["EdDSA", "Ed25519"]}
    }))
    .expect("key fixture")
}

pub fn did(did: &str, key_hex: &str) -> Identifier {
    serde_json::from_value(json!({
        "did": did,
        "provider": "did:key",
        "controllerKeyId": key_hex,
        "keys": [key(key_hex)],
        "services": []
    }))
    .expect("did fixture")
}

pub fn private_key(alias: &str) -> ManagedPrivateKey {
    ManagedPrivateKey::new(alias, format!("00{alias}"), "Ed25519")
}

pub fn vc(id: &str, holder: &str) -> VerifiableCredential {
    serde_json::from_value(json!({
        "@context": ["https://www.w3.org/2018/credentials/v1"],
        "id": id,
        "type": ["VerifiableCredential", "IdentityCredential"],
        "issuer": {"id": holder},
        "issuanceDate": "2023-01-01T00:00:00Z",
        "credentialSubject": {"id": holder, "name": "Alice"},
        "proof": {"type": "JwtProof2020", "jwt": "eyJhbGciOiJFZERTQSJ9.e30.c2ln"}
    }))
    .expect("vc fixture")
}

/// Alice's vault with one of each adapter-backed record.
pub fn alice_vault(id: &str) -> IdentityVault {
    IdentityVault::create(
        VaultProps::new(id)
            .dids(vec![did(ALICE_DID, ALICE_KEY_HEX)])
            .keys(vec![key(ALICE_KEY_HEX)])
            .private_keys(vec![private_key(ALICE_KEY_HEX)])
            .vcs(vec![vc(ALICE_VC_ID, ALICE_DID)]),
    )
    .expect("alice vault")
}

/// Collects every event emitted on `ctx`.
pub fn record_events(ctx: &VaultContext) -> Arc<Mutex<Vec<VaultEvent>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    ctx.events()
        .subscribe(move |event| sink.lock().expect("events lock").push(event.clone()));
    seen
}
