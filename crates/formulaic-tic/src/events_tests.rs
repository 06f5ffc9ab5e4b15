use indoc::indoc;

use super::*;
use crate::test_utils;
use crate::Error;

#[test]
fn events_from_json() {
    let input = indoc! {r#"
        [
            { "op": "bind_int_literal", "node": 0, "literal": { "value": 5, "radix": "decimal" } },
            { "op": "bind_equation", "name": "x", "expr": 0 },
            { "op": "bind_var", "name": "x", "node": 1 },
            { "op": "build_array", "result": 2, "elements": [1] },
            { "op": "bind_equation", "name": "xs", "expr": 2 }
        ]
    "#};
    let events: Vec<SetupEvent> = serde_json::from_str(input).unwrap();

    let result = solve_events(&events, &Config::new()).unwrap();

    insta::assert_snapshot!(test_utils::named_types(&result), @r"
    x: real
    xs: real[]
    ");
}

#[test]
fn event_json_shape() {
    let event = SetupEvent::RecordCall {
        callee: CallTarget::Named("f".into()),
        args: vec![1],
        ret: 2,
    };

    assert_eq!(
        serde_json::to_string(&event).unwrap(),
        r#"{"op":"record_call","callee":{"named":"f"},"args":[1],"ret":2}"#
    );
}

#[test]
fn apply_matches_direct_calls() {
    let events = vec![
        SetupEvent::BindVar {
            name: "n".into(),
            node: 0,
        },
        SetupEvent::DefineFunction {
            name: "id".into(),
            args: vec!["n".into()],
            body: 0,
            declared_ret: None,
        },
    ];
    let mut replayed = GraphBuilder::new();
    for event in &events {
        replayed.apply(event).unwrap();
    }

    let mut direct = GraphBuilder::new();
    direct.bind_var("n", 0).unwrap();
    direct.define_function("id", &["n"], 0, None).unwrap();

    assert_eq!(replayed.dump(), direct.dump());
    assert_eq!(replayed.solve().unwrap(), direct.solve().unwrap());
}

#[test]
fn failing_event_stops_replay() {
    let events = vec![
        SetupEvent::DefineFunction {
            name: "f".into(),
            args: vec![],
            body: 0,
            declared_ret: None,
        },
        SetupEvent::DefineFunction {
            name: "f".into(),
            args: vec![],
            body: 1,
            declared_ret: None,
        },
    ];

    let err = solve_events(&events, &Config::new()).unwrap_err();

    assert_eq!(err, Error::DuplicateDefinition { name: "f".into() });
}

#[test]
fn signature_callee_from_json() {
    let callee: CallTarget = serde_json::from_value(serde_json::json!({
        "signature": {
            "generics": [{
                "descendant": null,
                "ancestor": "real",
                "preferred": null,
                "comparable": false
            }],
            "args": [{ "generic": 0 }],
            "ret": { "generic": 0 }
        }
    }))
    .unwrap();

    assert_eq!(callee, CallTarget::Signature(test_utils::abs()));
}
