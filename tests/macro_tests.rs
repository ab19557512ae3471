use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use yaml_records::family::{self, struct_fields};
use yaml_records::{
    from_node, from_str, from_str_with_options, node, to_node, to_string, variant_family, Error,
    Family, Node, NodeDeserializer, NodeMap, Options,
};

#[test]
fn test_node_macro_null() {
    assert_eq!(node!(null), Node::Absent);
}

#[test]
fn test_node_macro_scalars() {
    assert_eq!(node!(true), Node::scalar("true"));
    assert_eq!(node!(false), Node::scalar("false"));
    assert_eq!(node!(42), Node::scalar("42"));
    assert_eq!(node!(3.5), Node::scalar("3.5"));
    assert_eq!(node!("hello world"), Node::scalar("hello world"));
    assert_eq!(node!(""), Node::scalar(""));
}

#[test]
fn test_node_macro_quotes_when_needed() {
    assert_eq!(node!("res://x"), Node::scalar("\"res://x\""));
    assert_eq!(node!(" padded"), Node::scalar("\" padded\""));
    assert_eq!(node!("-"), Node::scalar("\"-\""));
}

#[test]
fn test_node_macro_sequences() {
    assert_eq!(node!([]), Node::Sequence(vec![]));
    assert_eq!(
        node!([1, "hello", true, null]),
        Node::Sequence(vec![
            Node::scalar("1"),
            Node::scalar("hello"),
            Node::scalar("true"),
            Node::Absent,
        ])
    );
}

#[test]
fn test_node_macro_nested() {
    let tree = node!({
        "user": {
            "id": 123,
            "name": "Bob",
            "active": true
        },
        "tags": ["admin", "developer"],
        "count": 42
    });

    let map = tree.as_mapping().unwrap();
    assert_eq!(map.keys().collect::<Vec<_>>(), vec!["user", "tags", "count"]);

    let user = tree.get("user").unwrap();
    assert_eq!(user.get("id"), Some(&Node::scalar("123")));
    assert_eq!(user.get("name").and_then(Node::as_token), Some("Bob"));
    assert_eq!(user.get("active"), Some(&Node::scalar("true")));

    let tags = tree.get("tags").and_then(Node::as_sequence).unwrap();
    assert_eq!(tags.len(), 2);
    assert_eq!(tags[1], Node::scalar("developer"));
}

#[test]
fn test_node_macro_quoted_keys() {
    let tree = node!({ "a: b": 1 });
    let mut expected = NodeMap::new();
    expected.insert("\"a: b\"".to_string(), Node::scalar("1"));
    assert_eq!(tree, Node::Mapping(expected));

    let back: BTreeMap<String, u8> = from_node(tree).unwrap();
    assert_eq!(back["a: b"], 1);
}

#[test]
fn test_node_accessors() {
    let tree = node!({ "k": "'v'", "list": [1], "empty": null });
    assert!(tree.is_mapping());
    assert!(!tree.is_sequence());
    assert!(tree.get("list").is_some_and(Node::is_sequence));
    assert!(tree.get("empty").is_some_and(Node::is_absent));
    assert!(tree.get("empty").is_some_and(Node::is_empty));
    assert_eq!(tree.get("k").and_then(Node::as_str).as_deref(), Some("'v'"));
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct TransitionAction {
    new_state: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct VariantAction {
    new_variant: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct DelayedTransition {
    new_state: String,
    #[serde(default)]
    delay: u32,
}

variant_family! {
    #[derive(Debug, Clone, PartialEq)]
    enum StateAction {
        Transition(TransitionAction),
        Variant(VariantAction),
    }
}

// `Delayed` recognizes a superset of `Transition`'s keys, so its position
// decides which variant plain `newState` mappings resolve to.
variant_family! {
    #[derive(Debug, PartialEq)]
    enum Narrow {
        Transition(TransitionAction),
        Delayed(DelayedTransition),
    }
}

variant_family! {
    #[derive(Debug, PartialEq)]
    enum Wide {
        Delayed(DelayedTransition),
        Transition(TransitionAction),
    }
}

#[test]
fn test_family_constants() {
    assert_eq!(StateAction::NAME, "StateAction");
    assert_eq!(StateAction::VARIANTS, &["Transition", "Variant"]);

    let names: Vec<_> = StateAction::descriptors().iter().map(|d| d.name).collect();
    assert_eq!(names, vec!["Transition", "Variant"]);
}

#[test]
fn test_descriptor_keys_include_both_spellings() {
    let descriptor = &StateAction::descriptors()[0];
    assert_eq!(
        descriptor.keys(),
        Some(&["new_state".to_string(), "newState".to_string()][..])
    );
    assert!(descriptor.accepts(["newState"]));
    assert!(descriptor.accepts(["new_state"]));
    assert!(!descriptor.accepts(["newState", "delay"]));
}

#[test]
fn test_family_resolves_by_keys() {
    let action: StateAction = from_str("newState: labour").unwrap();
    assert_eq!(
        action,
        StateAction::Transition(TransitionAction {
            new_state: "labour".to_string()
        })
    );

    let action: StateAction = from_str("new_variant: labour").unwrap();
    assert_eq!(
        action,
        StateAction::Variant(VariantAction {
            new_variant: "labour".to_string()
        })
    );
}

#[test]
fn test_declaration_order_decides_ties() {
    let narrow: Narrow = from_str("newState: x").unwrap();
    assert!(matches!(narrow, Narrow::Transition(_)));

    let wide: Wide = from_str("newState: x").unwrap();
    assert_eq!(
        wide,
        Wide::Delayed(DelayedTransition {
            new_state: "x".to_string(),
            delay: 0,
        })
    );
}

#[test]
fn test_superset_keys_skip_narrow_variant() {
    let narrow: Narrow = from_str("newState: x\ndelay: 5").unwrap();
    assert_eq!(
        narrow,
        Narrow::Delayed(DelayedTransition {
            new_state: "x".to_string(),
            delay: 5,
        })
    );
}

#[test]
fn test_family_serializes_untagged() {
    let action = StateAction::Variant(VariantAction {
        new_variant: "labour".to_string(),
    });
    assert_eq!(to_string(&action).unwrap(), "newVariant: labour");
    assert_eq!(to_node(&action).unwrap(), node!({ "newVariant": "labour" }));
}

#[test]
fn test_family_inside_map() {
    let text = "health:\n  newVariant: labour\nrest:\n  newState: idle";
    let actions: BTreeMap<String, StateAction> = from_str(text).unwrap();
    assert!(matches!(actions["health"], StateAction::Variant(_)));
    assert!(matches!(actions["rest"], StateAction::Transition(_)));
    assert_eq!(to_string(&actions).unwrap(), text);
}

#[test]
fn test_resolve_without_materializing() {
    let tree = node!({ "newVariant": "x" });
    assert_eq!(family::resolve::<StateAction>(&tree).map(|d| d.name), Some("Variant"));
    assert_eq!(family::resolve::<StateAction>(&node!({ "other": 1 })), None);
    assert_eq!(family::resolve::<StateAction>(&node!("x")), None);
}

#[test]
fn test_materialize_unknown_name() {
    let deserializer = NodeDeserializer::<Error>::new(node!({}));
    let err = StateAction::materialize("Missing", deserializer).unwrap_err();
    assert_eq!(
        err,
        Error::UnknownVariant {
            family: "StateAction".to_string(),
            candidates: "Transition, Variant".to_string(),
        }
    );
}

#[test]
fn test_struct_fields_listing() {
    assert_eq!(
        struct_fields::<DelayedTransition>(),
        Some(&["new_state", "delay"][..])
    );
    assert_eq!(struct_fields::<String>(), None);
}

#[test]
fn test_zero_fill_carries_into_families() {
    #[derive(Debug, Deserialize)]
    struct Timer {
        seconds: u32,
        on_elapsed: StateAction,
    }

    let options = Options::new().with_zero_fill(true);

    let timer: Timer = from_str_with_options("seconds: 5", &options).unwrap();
    assert_eq!(timer.seconds, 5);
    assert_eq!(
        timer.on_elapsed,
        StateAction::Transition(TransitionAction { new_state: String::new() })
    );

    let delayed: BTreeMap<String, Wide> = from_str_with_options("a:\n  delay: 5", &options).unwrap();
    assert_eq!(
        delayed["a"],
        Wide::Delayed(DelayedTransition { new_state: String::new(), delay: 5 })
    );

    let err = from_str::<BTreeMap<String, Wide>>("a:\n  delay: 5").unwrap_err();
    assert_eq!(err, Error::Structure("missing field `new_state`".to_string()));
}
