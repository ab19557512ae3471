//! Writes a small game configuration, reads it back and writes it again.
//!
//! Run with `cargo run --example game_config`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use yaml_records::{from_str, to_string, variant_family};

#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(default)]
struct GameConfig {
    card_types: BTreeMap<String, CardType>,
    game_flows: BTreeMap<String, GameFlow>,
    starting_cards: Vec<String>,
    starting_flows: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug)]
struct CardType {
    title: String,
    icon_path: String,
}

#[derive(Serialize, Deserialize, Debug)]
struct GameFlow {
    icon_path: String,
    start_state: String,
    states: BTreeMap<String, FlowState>,
}

#[derive(Serialize, Deserialize, Debug)]
struct StateVariant {
    title: String,
    description: String,
    action_label: String,
    on_action: Option<StateAction>,
}

#[derive(Serialize, Deserialize, Debug)]
struct SocketState {
    variants: BTreeMap<String, StateVariant>,
    default_variant: String,
    sockets: Vec<SocketConfig>,
}

#[derive(Serialize, Deserialize, Debug)]
struct SocketConfig {
    title: String,
    accepts: Vec<String>,
    on_accept: BTreeMap<String, StateAction>,
}

#[derive(Serialize, Deserialize, Debug)]
struct TimerState {
    variants: BTreeMap<String, StateVariant>,
    default_variant: String,
    seconds: i32,
    socket: Option<SocketConfig>,
    on_elapsed: StateAction,
}

#[derive(Serialize, Deserialize, Debug)]
struct TransitionAction {
    new_state: String,
}

#[derive(Serialize, Deserialize, Debug)]
struct VariantAction {
    new_variant: String,
}

variant_family! {
    #[derive(Debug)]
    enum FlowState {
        Socket(SocketState),
        Timer(TimerState),
    }
}

variant_family! {
    #[derive(Debug)]
    enum StateAction {
        Transition(TransitionAction),
        Variant(VariantAction),
    }
}

fn variant(description: &str, label: &str, on_action: Option<StateAction>) -> StateVariant {
    StateVariant {
        title: "Work".into(),
        description: description.into(),
        action_label: label.into(),
        on_action,
    }
}

fn create_model() -> GameConfig {
    let choose_path = FlowState::Socket(SocketState {
        variants: BTreeMap::from([
            ("default".into(), variant("Choose your path to earn funds", "Start", None)),
            (
                "labour".into(),
                variant(
                    "Physical work for small pay",
                    "Start",
                    Some(StateAction::Transition(TransitionAction {
                        new_state: "labour".into(),
                    })),
                ),
            ),
        ]),
        default_variant: "default".into(),
        sockets: vec![SocketConfig {
            title: "work".into(),
            accepts: vec!["reason".into(), "health".into(), "passion".into()],
            on_accept: BTreeMap::from([(
                "health".into(),
                StateAction::Variant(VariantAction {
                    new_variant: "labour".into(),
                }),
            )]),
        }],
    });

    let labour = FlowState::Timer(TimerState {
        variants: BTreeMap::from([(
            "default".into(),
            variant("The day stretches long, your hand's burn", "Running...", None),
        )]),
        default_variant: "default".into(),
        seconds: 60,
        socket: None,
        on_elapsed: StateAction::Transition(TransitionAction {
            new_state: "choose_path".into(),
        }),
    });

    GameConfig {
        card_types: BTreeMap::from([
            (
                "funds".into(),
                CardType {
                    title: "Funds".into(),
                    icon_path: "res://assets/wealth_icon.png".into(),
                },
            ),
            (
                "health".into(),
                CardType {
                    title: "Health".into(),
                    icon_path: "res://assets/reputation_icon.png".into(),
                },
            ),
        ]),
        game_flows: BTreeMap::from([(
            "work".into(),
            GameFlow {
                icon_path: "res://assets/authority_icon.png".into(),
                start_state: "choose_path".into(),
                states: BTreeMap::from([("choose_path".into(), choose_path), ("labour".into(), labour)]),
            },
        )]),
        starting_cards: vec!["funds".into(), "funds".into(), "health".into(), "health".into()],
        starting_flows: vec!["work".into()],
    }
}

fn main() -> Result<(), yaml_records::Error> {
    println!("testing serialization...\n");
    let text = to_string(&create_model())?;
    println!("{}", text);

    println!("\ntesting deserialization...\n");
    let config: GameConfig = from_str(&text)?;
    println!("{}", to_string(&config)?);

    Ok(())
}
