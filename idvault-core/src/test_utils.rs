//! Sample identity material shared by unit tests.

#![allow(dead_code)]

use serde_json::json;

use crate::types::{
    Identifier, Identity, Key, ManagedPrivateKey, VerifiableCredential, WireGuardKey,
};

pub const SAMPLE_DID: &str = "did:key:z6MkttjNynPdkYY7vcnBvwsRJEgNe6ei1SoPxh4u7dFuVWsx";
pub const SAMPLE_KEY_HEX: &str =
    "d68a0b4ecc7e9317510a3f64a6f659547e27f325b0feba5d95bcdc3175d114ff";
pub const SAMPLE_VC_ID: &str = "urn:uuid:123e4567-e89b-12d3-a456-426614174000";

pub fn sample_key() -> Key {
    serde_json::from_value(json!({
        "type": "Ed25519",
        "kid": SAMPLE_KEY_HEX,
        "publicKeyHex": SAMPLE_KEY_HEX,
        "meta": {"algorithms": ["EdDSA", "Ed25519"]},
        "kms": "local"
    }))
    .expect("sample key")
}

pub fn sample_did() -> Identifier {
    serde_json::from_value(json!({
        "did": SAMPLE_DID,
        "controllerKeyId": SAMPLE_KEY_HEX,
        "keys": [sample_key()],
        "services": [],
        "provider": "did:key"
    }))
    .expect("sample did")
}

pub fn sample_private_key() -> ManagedPrivateKey {
    ManagedPrivateKey::new(
        SAMPLE_KEY_HEX,
        format!("755984826f8ba909ec60579daf429333e7add8caa3216023f1507a9fd1ae8904{SAMPLE_KEY_HEX}"),
        "Ed25519",
    )
}

pub fn sample_vc() -> VerifiableCredential {
    serde_json::from_value(json!({
        "@context": ["https://www.w3.org/2018/credentials/v1"],
        "id": SAMPLE_VC_ID,
        "type": ["VerifiableCredential", "IdentityCredential"],
        "issuer": {"id": SAMPLE_DID},
        "issuanceDate": "2023-01-01T00:00:00Z",
        "credentialSubject": {
            "id": SAMPLE_DID,
            "type": "Person",
            "holder": {"id": SAMPLE_DID, "type": "Person"}
        },
        "proof": {"type": "JwtProof2020", "jwt": "eyJhbGciOiJFZERTQSJ9..."}
    }))
    .expect("sample vc")
}

pub fn sample_wg_key() -> WireGuardKey {
    serde_json::from_value(json!({
        "publicKey": "xTIBA5rboUvnH4htodjb6e697QjLERt1NAB4mZqp8Dg=",
        "privateKey": "yAnz5TF+lXXJte14tji3zlMNq+hd2rYUIgJBgB3fBmk="
    }))
    .expect("sample wireguard key")
}

pub fn sample_identity() -> Identity {
    serde_json::from_value(json!({
        "alias": "alice",
        "did": SAMPLE_DID,
        "kid": SAMPLE_KEY_HEX,
        "publicKeyHex": SAMPLE_KEY_HEX,
        "provider": "did:key",
        "credential": sample_vc(),
        "metadata": {"device": "laptop"},
        "createdAt": "2024-03-01T12:00:00Z"
    }))
    .expect("sample identity")
}

pub fn populated_props(id: &str) -> crate::VaultProps {
    crate::VaultProps::new(id)
        .dids(vec![sample_did()])
        .keys(vec![sample_key()])
        .private_keys(vec![sample_private_key()])
        .vcs(vec![sample_vc()])
}
