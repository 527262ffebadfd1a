//! This module contains the loader that translates JSON ABI documents, as
//! emitted by the Solidity compiler, into normalized descriptors.
//!
//! The loader takes a generic [`serde_json::Value`] tree rather than raw
//! text; parsing the JSON itself is the caller's concern. Each item in a
//! document is processed independently, and items of kinds the codec does
//! not understand are dropped silently rather than rejected, so documents
//! from newer compilers remain loadable.

use serde_json::Value as Json;

use crate::{
    error::document::{Error, Result},
    parser,
    selector::{FunctionSelector, SelectorKind, StateMutability},
    types::{AbiType, Param},
};

/// Translates a whole ABI document — an array of items — into descriptors.
///
/// Items of unrecognised kinds are skipped.
///
/// # Errors
///
/// When the document is not an array, or when any recognised item is
/// structurally malformed.
pub fn parse_document(document: &Json) -> Result<Vec<FunctionSelector>> {
    let items = document.as_array().ok_or(Error::NotAnArray)?;
    items
        .iter()
        .filter_map(|item| parse_item(item).transpose())
        .collect()
}

/// Translates a single ABI item into a descriptor.
///
/// Returns [`None`] for items of kinds the codec does not understand.
///
/// Only fallback and receive entries may go nameless. Constructor items,
/// which the compiler never names, are given the name `constructor`; a
/// nameless function, event, or error item is malformed.
///
/// # Errors
///
/// When the item is structurally malformed, or when a component type string
/// does not parse.
pub fn parse_item(item: &Json) -> Result<Option<FunctionSelector>> {
    let object = item
        .as_object()
        .ok_or_else(|| Error::ItemNotAnObject(item.to_string()))?;

    // The compiler omits `"type"` for plain functions.
    let declared = object.get("type").and_then(Json::as_str).unwrap_or("function");
    let kind = match declared {
        "function" => SelectorKind::Function,
        "constructor" => SelectorKind::Constructor,
        "fallback" => SelectorKind::Fallback,
        "receive" => SelectorKind::Receive,
        "event" => SelectorKind::Event,
        "error" => SelectorKind::Error,
        _ => return Ok(None),
    };

    let name = object
        .get("name")
        .and_then(Json::as_str)
        .filter(|name| !name.is_empty())
        .map(str::to_string);
    let name = match kind {
        SelectorKind::Constructor => name.or_else(|| Some("constructor".to_string())),
        SelectorKind::Function | SelectorKind::Event | SelectorKind::Error if name.is_none() => {
            return Err(Error::UnnamedItem(declared.to_string()));
        }
        _ => name,
    };

    let state_mutability = object
        .get("stateMutability")
        .and_then(Json::as_str)
        .and_then(mutability);

    let inputs = components(object.get("inputs"))?;
    let outputs = match object.get("outputs") {
        Some(list) => Some(components(Some(list))?),
        // A function with no outputs key is declared as returning nothing;
        // for every other kind outputs are simply not applicable.
        None if kind == SelectorKind::Function => Some(vec![]),
        None => None,
    };

    Ok(Some(FunctionSelector {
        name,
        kind,
        state_mutability,
        inputs,
        outputs,
    }))
}

/// Maps a `stateMutability` string onto the descriptor model. Unknown
/// mutabilities are treated as undeclared.
fn mutability(value: &str) -> Option<StateMutability> {
    match value {
        "pure" => Some(StateMutability::Pure),
        "view" => Some(StateMutability::View),
        "nonpayable" => Some(StateMutability::NonPayable),
        "payable" => Some(StateMutability::Payable),
        _ => None,
    }
}

/// Translates an optional component list. An absent list is empty.
fn components(list: Option<&Json>) -> Result<Vec<Param>> {
    let Some(list) = list else {
        return Ok(vec![]);
    };
    let list = list
        .as_array()
        .ok_or_else(|| Error::ComponentsNotAnArray(list.to_string()))?;
    list.iter().map(parse_component).collect()
}

/// Translates a single component into a field.
fn parse_component(component: &Json) -> Result<Param> {
    let object = component
        .as_object()
        .ok_or_else(|| Error::ComponentNotAnObject(component.to_string()))?;

    let type_str = object
        .get("type")
        .and_then(Json::as_str)
        .ok_or(Error::MissingComponentType)?;
    let name = object
        .get("name")
        .and_then(Json::as_str)
        .filter(|name| !name.is_empty())
        .map(str::to_string);
    let indexed = object
        .get("indexed")
        .and_then(Json::as_bool)
        .unwrap_or(false);

    let tp = component_type(type_str, component)?;
    Ok(Param { tp, name, indexed })
}

/// Resolves a component's type.
///
/// Tuple components carry their element types in a `components` key, with
/// the `type` string reduced to `tuple` plus any array suffixes; everything
/// else round-trips through the signature parser. A tuple whose
/// `internalType` names a struct is promoted to a struct, with `var<index>`
/// names synthesized for any nameless elements so that every field of the
/// struct remains addressable.
fn component_type(type_str: &str, component: &Json) -> Result<AbiType> {
    let Some(suffix) = type_str.strip_prefix("tuple") else {
        return Ok(parser::parse_type(type_str)?);
    };

    let elements = component
        .get("components")
        .ok_or(Error::MissingTupleComponents)?;
    let elements = elements
        .as_array()
        .ok_or_else(|| Error::ComponentsNotAnArray(elements.to_string()))?;
    let mut elements: Vec<Param> = elements.iter().map(parse_component).collect::<Result<_>>()?;

    let tuple = match struct_name(component) {
        Some(name) => {
            for (index, element) in elements.iter_mut().enumerate() {
                if element.name.is_none() {
                    element.name = Some(format!("var{index}"));
                }
            }
            AbiType::Struct { name, elements }
        }
        None => AbiType::Tuple { elements },
    };
    array_suffixes(tuple, suffix)
}

/// Extracts the struct name from a component's `internalType`, if it names
/// one.
fn struct_name(component: &Json) -> Option<String> {
    component
        .get("internalType")
        .and_then(Json::as_str)
        .and_then(|internal| internal.strip_prefix("struct "))
        .map(str::to_string)
}

/// Applies the array suffixes in `suffix` (for example `[3][]`) to `tp`,
/// innermost first.
fn array_suffixes(tp: AbiType, suffix: &str) -> Result<AbiType> {
    let malformed = || Error::MalformedArraySuffix(suffix.to_string());

    let mut tp = tp;
    let mut rest = suffix;
    while !rest.is_empty() {
        let stripped = rest.strip_prefix('[').ok_or_else(malformed)?;
        let (dimension, remainder) = stripped.split_once(']').ok_or_else(malformed)?;

        if dimension.is_empty() {
            tp = AbiType::dyn_array(tp);
        } else if dimension.bytes().all(|byte| byte.is_ascii_digit()) {
            let size = dimension.parse::<usize>().map_err(|_| malformed())?;
            tp = AbiType::array(size, tp);
        } else {
            return Err(malformed());
        }
        rest = remainder;
    }
    Ok(tp)
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::{parse_document, parse_item};
    use crate::{
        error::document::Error,
        selector::{SelectorKind, StateMutability},
        types::{AbiType, Param},
    };

    #[test]
    fn loads_a_function_item() {
        let item = json!({
            "type": "function",
            "name": "transfer",
            "stateMutability": "nonpayable",
            "inputs": [
                { "type": "address", "name": "to" },
                { "type": "uint256", "name": "amount" },
            ],
            "outputs": [{ "type": "bool", "name": "" }],
        });

        let selector = parse_item(&item).unwrap().unwrap();
        assert_eq!(selector.kind, SelectorKind::Function);
        assert_eq!(selector.name.as_deref(), Some("transfer"));
        assert_eq!(selector.state_mutability, Some(StateMutability::NonPayable));
        assert_eq!(
            selector.inputs,
            vec![
                Param::named(AbiType::Address, "to"),
                Param::named(AbiType::uint(256), "amount"),
            ]
        );
        assert_eq!(selector.outputs, Some(vec![Param::new(AbiType::Bool)]));
    }

    #[test]
    fn defaults_the_kind_to_function() {
        let item = json!({ "name": "ping" });
        let selector = parse_item(&item).unwrap().unwrap();
        assert_eq!(selector.kind, SelectorKind::Function);
        assert_eq!(selector.outputs, Some(vec![]));
    }

    #[test]
    fn drops_unrecognised_kinds() {
        let item = json!({ "type": "receiveButBetter", "name": "x" });
        assert_eq!(parse_item(&item).unwrap(), None);
    }

    #[test]
    fn carries_indexed_through_event_inputs() {
        let item = json!({
            "type": "event",
            "name": "Transfer",
            "inputs": [
                { "type": "address", "name": "from", "indexed": true },
                { "type": "address", "name": "to", "indexed": true },
                { "type": "uint256", "name": "amount", "indexed": false },
            ],
        });

        let selector = parse_item(&item).unwrap().unwrap();
        assert_eq!(selector.kind, SelectorKind::Event);
        assert_eq!(selector.outputs, None);
        assert!(selector.inputs[0].indexed);
        assert!(selector.inputs[1].indexed);
        assert!(!selector.inputs[2].indexed);
    }

    #[test]
    fn translates_tuple_components() {
        let item = json!({
            "type": "function",
            "name": "submit",
            "inputs": [{
                "type": "tuple[]",
                "name": "orders",
                "components": [
                    { "type": "address", "name": "maker" },
                    { "type": "uint256", "name": "amount" },
                ],
            }],
        });

        let selector = parse_item(&item).unwrap().unwrap();
        let expected = AbiType::dyn_array(AbiType::Tuple {
            elements: vec![
                Param::named(AbiType::Address, "maker"),
                Param::named(AbiType::uint(256), "amount"),
            ],
        });
        assert_eq!(selector.inputs, vec![Param::named(expected, "orders")]);
    }

    #[test]
    fn promotes_named_tuples_to_structs_and_names_their_fields() {
        let item = json!({
            "type": "function",
            "name": "deposit",
            "inputs": [{
                "type": "tuple",
                "name": "entry",
                "internalType": "struct Vault.Entry",
                "components": [
                    { "type": "address", "name": "owner" },
                    { "type": "uint256" },
                ],
            }],
        });

        let selector = parse_item(&item).unwrap().unwrap();
        let expected = AbiType::Struct {
            name:     "Vault.Entry".to_string(),
            elements: vec![
                Param::named(AbiType::Address, "owner"),
                Param::named(AbiType::uint(256), "var1"),
            ],
        };
        assert_eq!(selector.inputs, vec![Param::named(expected, "entry")]);
    }

    #[test]
    fn parses_fixed_size_tuple_arrays() {
        let item = json!({
            "type": "function",
            "name": "pair",
            "inputs": [{
                "type": "tuple[2][]",
                "name": "grid",
                "components": [{ "type": "bool", "name": "set" }],
            }],
        });

        let selector = parse_item(&item).unwrap().unwrap();
        let tuple = AbiType::Tuple {
            elements: vec![Param::named(AbiType::Bool, "set")],
        };
        let expected = AbiType::dyn_array(AbiType::array(2, tuple));
        assert_eq!(selector.inputs, vec![Param::named(expected, "grid")]);
    }

    #[test]
    fn loads_documents_and_skips_what_it_must() {
        let document = json!([
            { "type": "function", "name": "a", "inputs": [] },
            { "type": "flashLoanFee", "name": "??" },
            { "type": "event", "name": "B", "inputs": [] },
            { "type": "constructor", "inputs": [{ "type": "uint8", "name": "x" }] },
        ]);

        let selectors = parse_document(&document).unwrap();
        assert_eq!(selectors.len(), 3);
        assert_eq!(selectors[0].kind, SelectorKind::Function);
        assert_eq!(selectors[1].kind, SelectorKind::Event);
        assert_eq!(selectors[2].kind, SelectorKind::Constructor);
        assert_eq!(selectors[2].name.as_deref(), Some("constructor"));
    }

    #[test]
    fn requires_names_where_the_descriptor_model_does() {
        // Constructors are never named by the compiler, so the loader names
        // them itself.
        let item = json!({ "type": "constructor", "inputs": [] });
        let selector = parse_item(&item).unwrap().unwrap();
        assert_eq!(selector.name.as_deref(), Some("constructor"));

        // Functions, events, and errors must arrive named.
        for kind in ["function", "event", "error"] {
            let item = json!({ "type": kind, "inputs": [] });
            assert!(
                matches!(parse_item(&item).unwrap_err(), Error::UnnamedItem(_)),
                "a nameless {kind} item must be rejected"
            );
        }

        // Fallback and receive entries legitimately have no name.
        for kind in ["fallback", "receive"] {
            let item = json!({ "type": kind });
            let selector = parse_item(&item).unwrap().unwrap();
            assert_eq!(selector.name, None);
        }
    }

    #[test]
    fn rejects_malformed_items() {
        assert!(matches!(
            parse_item(&json!("not an object")).unwrap_err(),
            Error::ItemNotAnObject(_)
        ));
        assert!(matches!(
            parse_item(&json!({ "type": "function", "name": "f", "inputs": [{}] }))
                .unwrap_err(),
            Error::MissingComponentType
        ));
        assert!(matches!(
            parse_item(&json!({
                "type": "function",
                "name": "f",
                "inputs": [{ "type": "tuple" }],
            }))
            .unwrap_err(),
            Error::MissingTupleComponents
        ));
        assert!(matches!(
            parse_item(&json!({
                "type": "function",
                "name": "f",
                "inputs": [{ "type": "uint257" }],
            }))
            .unwrap_err(),
            Error::BadComponentType(_)
        ));
        assert!(matches!(
            parse_document(&json!({})).unwrap_err(),
            Error::NotAnArray
        ));
    }
}
