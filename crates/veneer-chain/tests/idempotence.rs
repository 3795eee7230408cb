//! Property tests: idempotent wrap/revert and full chain discard

use proptest::prelude::*;
use std::sync::Arc;
use veneer_chain::{SlotState, Veneer};
use veneer_object::{Args, Callable, Layer, ObjectSpace, OpName, OverrideGroup, OwnerId, Value};

fn constant(text: String) -> Callable {
    Callable::new(move |_| Ok(Value::from(text.clone())))
}

fn prefixing(text: String) -> Layer {
    Layer::new(move |args, forward| {
        let inner = forward.call(args)?;
        Ok(Value::from(format!(
            "{text}/{}",
            inner.as_str().unwrap_or_default()
        )))
    })
}

fn veneer_with(name: &str) -> Veneer {
    let space = Arc::new(ObjectSpace::new());
    space.define("X", name, constant(format!("X#{name}")));
    Veneer::new(space)
}

fn call(veneer: &Veneer, name: &str) -> String {
    veneer
        .space()
        .call(&OwnerId::new("X"), &OpName::new(name), &Args::none())
        .unwrap()
        .as_str()
        .unwrap()
        .to_owned()
}

/// One step of a configuration sequence
#[derive(Debug, Clone)]
enum Step {
    Wrap,
    Revert,
    Compose,
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![Just(Step::Wrap), Just(Step::Revert), Just(Step::Compose)]
}

proptest! {
    // P1: wrapping twice is observably identical to wrapping once.
    #[test]
    fn wrap_is_idempotent(name in "[a-z]{1,8}", extra_wraps in 0usize..3) {
        let once = veneer_with(&name);
        once.wrap("X", [name.as_str()]);

        let many = veneer_with(&name);
        for _ in 0..=extra_wraps {
            many.wrap("X", [name.as_str()]);
        }

        prop_assert_eq!(once.slot_state("X", name.as_str()), many.slot_state("X", name.as_str()));
        prop_assert_eq!(once.slots().len(), many.slots().len());
        prop_assert_eq!(call(&once, &name), call(&many, &name));
    }

    // P2: a second revert is a no-op.
    #[test]
    fn revert_is_idempotent(name in "[a-z]{1,8}", extra_reverts in 0usize..3) {
        let once = veneer_with(&name);
        once.wrap("X", [name.as_str()]);
        once.revert("X", [name.as_str()]);

        let many = veneer_with(&name);
        many.wrap("X", [name.as_str()]);
        for _ in 0..=extra_reverts {
            many.revert("X", [name.as_str()]);
        }

        prop_assert_eq!(once.slot_state("X", name.as_str()), SlotState::Unwrapped);
        prop_assert_eq!(many.slot_state("X", name.as_str()), SlotState::Unwrapped);
        prop_assert_eq!(call(&once, &name), call(&many, &name));
    }

    // P5: one revert discards any number of layered groups.
    #[test]
    fn single_revert_discards_all_layers(layer_count in 0usize..6) {
        let veneer = veneer_with("foo");
        for i in 0..layer_count {
            let group = OverrideGroup::new(format!("M{i}"))
                .define("foo", prefixing(format!("M{i}#foo")));
            veneer.wrap_group("X", &group);
        }

        veneer.revert("X", ["foo"]);

        prop_assert_eq!(veneer.slot_state("X", "foo"), SlotState::Unwrapped);
        prop_assert_eq!(call(&veneer, "foo"), "X#foo");
    }

    // Arbitrary interleavings of wrap/revert/compose track a simple model
    // of the slot state machine and the resolved output.
    #[test]
    fn interleavings_match_state_machine(steps in proptest::collection::vec(step_strategy(), 0..12)) {
        let veneer = veneer_with("foo");
        let base = "X#foo".to_owned();

        // Model: is the original locally defined, is the slot wrapped, and
        // what would the shadowed composed entry produce if reachable.
        let mut locally_defined = true;
        let mut wrapped = false;
        let mut entry_output: Option<String> = None;

        for (i, step) in steps.iter().enumerate() {
            match step {
                Step::Wrap => {
                    veneer.wrap("X", ["foo"]);
                    if locally_defined && !wrapped {
                        locally_defined = false;
                        wrapped = true;
                        entry_output = Some(base.clone());
                    }
                }
                Step::Revert => {
                    veneer.revert("X", ["foo"]);
                    if wrapped {
                        wrapped = false;
                        locally_defined = true;
                    }
                }
                Step::Compose => {
                    let prefix = format!("L{i}");
                    let group = OverrideGroup::new(prefix.clone())
                        .define("foo", prefixing(prefix.clone()));
                    veneer.space().compose(&OwnerId::new("X"), &group);

                    let previous = if locally_defined {
                        base.clone()
                    } else {
                        entry_output.clone().unwrap_or_default()
                    };
                    entry_output = Some(format!("{prefix}/{previous}"));
                }
            }

            let expected_state = if wrapped { SlotState::Wrapped } else { SlotState::Unwrapped };
            prop_assert_eq!(veneer.slot_state("X", "foo"), expected_state);

            let expected_output = if locally_defined {
                base.clone()
            } else {
                entry_output.clone().unwrap_or_default()
            };
            prop_assert_eq!(call(&veneer, "foo"), expected_output);
        }
    }
}
