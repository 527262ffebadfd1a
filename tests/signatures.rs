//! This module is an integration test that exercises signature parsing,
//! canonical rendering, and the hashes derived from them.
#![cfg(test)]

use contract_abi_codec::{canonical::CanonicalOpts, Codec};

mod common;

#[test]
fn canonical_rendering_round_trips_canonical_input() {
    let codec = Codec::new();
    for signature in [
        "baz(uint32,bool)",
        "price(string)",
        "sam(bytes,bool,uint256[])",
        "f(uint256,uint32[],bytes10,bytes)",
        "bar(bytes3[2])",
        "g(fixed128x19,ufixed8x1)",
        "nested(((uint256,address)[4],string)[])",
        "()",
        "(address[])",
    ] {
        assert_eq!(codec.canonical(signature).unwrap(), signature);
    }
}

#[test]
fn canonical_rendering_widens_shorthand_integers() {
    let codec = Codec::new();
    assert_eq!(codec.canonical("f(uint,int)").unwrap(), "f(uint256,int256)");
    assert_eq!(
        codec.canonical("g(uint[3][],int)").unwrap(),
        "g(uint256[3][],int256)"
    );
}

#[test]
fn canonical_rendering_strips_names_and_indexed_markers() {
    let codec = Codec::new();
    assert_eq!(
        codec
            .canonical("Transfer(address indexed from, address indexed to, uint256 amount)")
            .unwrap(),
        "Transfer(address,address,uint256)"
    );
}

#[test]
fn annotated_rendering_restores_names_and_markers() {
    let codec = Codec::new();
    let selector = codec
        .parse("Transfer(address indexed from, address indexed to, uint256 amount)")
        .unwrap();

    let opts = CanonicalOpts {
        names:   true,
        indexed: true,
    };
    assert_eq!(
        codec.canonical_with(&selector, opts).unwrap(),
        "Transfer(address indexed from,address indexed to,uint256 amount)"
    );
}

#[test]
fn computes_reference_method_identifiers() {
    let codec = Codec::new();
    for (signature, method_id) in [
        ("baz(uint32,bool)", "cdcd77c0"),
        ("bar(bytes3[2])", "fce353f6"),
        ("sam(bytes,bool,uint256[])", "a5643bf2"),
        ("f(uint256,uint32[],bytes10,bytes)", "8be65246"),
    ] {
        let id = codec.method_id(signature).unwrap().unwrap();
        assert_eq!(hex::encode(id), method_id, "wrong identifier for {signature}");
    }
}

#[test]
fn unnamed_selectors_carry_no_identifier() {
    let codec = Codec::new();
    assert_eq!(codec.method_id("(uint256)").unwrap(), None);
    assert_eq!(codec.topic0("(uint256)").unwrap(), None);
}

#[test]
fn method_identifiers_prefix_the_full_signature_hash() {
    let codec = Codec::new();
    let signature = "withdraw(uint256,address)";

    let id = codec.method_id(signature).unwrap().unwrap();
    let topic = codec.topic0(signature).unwrap().unwrap();
    assert_eq!(id, topic[..4]);
}

#[test]
fn struct_descriptors_hash_as_plain_tuples() {
    let codec = Codec::new();
    let document = serde_json::json!([{
        "type": "function",
        "name": "deposit",
        "inputs": [{
            "type": "tuple",
            "name": "entry",
            "internalType": "struct Vault.Entry",
            "components": [
                { "type": "address", "name": "owner" },
                { "type": "uint256", "name": "amount" },
            ],
        }],
    }]);

    let selectors = codec.parse_document(&document).unwrap();
    assert_eq!(
        codec.canonical(&selectors[0]).unwrap(),
        "deposit((address,uint256))"
    );
    assert_eq!(
        codec.method_id(&selectors[0]).unwrap(),
        codec.method_id("deposit((address,uint256))").unwrap(),
    );
}
