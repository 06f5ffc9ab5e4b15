use super::*;

#[test]
fn defaults_to_real() {
    let config = Config::new();
    assert_eq!(config.default_type, Primitive::Real);
    assert_eq!(config.integer_preferred, Primitive::Real);
}

#[test]
fn setters_chain() {
    let config = Config::new()
        .default_type(Primitive::Any)
        .integer_preferred(Primitive::I32);
    assert_eq!(config.default_type, Primitive::Any);
    assert_eq!(config.integer_preferred, Primitive::I32);
}

#[test]
fn deserialize_partial() {
    let config: Config = serde_json::from_str(r#"{ "integer_preferred": "int64" }"#).unwrap();
    assert_eq!(config, Config::new().integer_preferred(Primitive::I64));
}

#[test]
fn deserialize_rejects_unknown_fields() {
    let err = serde_json::from_str::<Config>(r#"{ "integer": "int64" }"#).unwrap_err();
    assert!(err.to_string().contains("unknown field `integer`"));
}
