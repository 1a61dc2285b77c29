use dg_core::errors::{DgError, ErrorInfo};
use dg_core::{IndexPosition, Signature};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("slot", 1)
        .with_context("signature", "ulu")
}

#[test]
fn signature_error_surface() {
    let err = DgError::Signature(sample_info("signature-mismatch", "uuu vs lll"));
    assert_eq!(err.info().code, "signature-mismatch");
    assert!(err.info().context.contains_key("signature"));
}

#[test]
fn position_error_surface() {
    let err = DgError::Position(sample_info("already-lower", "index already downstairs"));
    assert_eq!(err.info().code, "already-lower");
    assert_eq!(err.info().context["slot"], "1");
}

#[test]
fn lookup_and_shape_shorthands() {
    let err = DgError::lookup("unknown-name", "psi is not a coordinate");
    assert!(matches!(err, DgError::Lookup(_)));
    let err = DgError::shape("non-square", "metric must be square");
    assert!(matches!(err, DgError::Shape(_)));
}

#[test]
fn error_display_includes_context_and_hint() {
    let err = DgError::Singular(
        ErrorInfo::new("singular-matrix", "no pivot in column")
            .with_context("column", 0)
            .with_hint("check the metric for degenerate rows"),
    );
    let rendered = err.to_string();
    assert!(rendered.starts_with("singular matrix: no pivot in column"));
    assert!(rendered.contains("column=0"));
    assert!(rendered.contains("hint: check the metric"));
}

#[test]
fn errors_roundtrip_through_json() {
    let err = DgError::NameCollision(sample_info("parameter-collision", "s is a coordinate"));
    let json = serde_json::to_string(&err).expect("serialize");
    let restored: DgError = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(err, restored);
}

#[test]
fn signatures_parse_and_render() {
    let sig: Signature = "ulD".parse().expect("parse signature");
    assert_eq!(sig.rank(), 3);
    assert_eq!(sig.get(0), Some(IndexPosition::Up));
    assert_eq!(sig.get(2), Some(IndexPosition::Down));
    assert_eq!(sig.to_string(), "ull");
    assert_eq!(sig.without(&[0, 2]).to_string(), "l");
    assert_eq!(sig.with_position(1, IndexPosition::Up).to_string(), "uul");
    assert_eq!(sig.pushed(IndexPosition::Down).to_string(), "ulll");

    let err = "ux".parse::<Signature>().unwrap_err();
    assert!(matches!(err, DgError::Position(_)));
}

#[test]
fn signature_serializes_as_string() {
    let sig: Signature = "ul".parse().expect("parse signature");
    assert_eq!(serde_json::to_string(&sig).expect("serialize"), "\"ul\"");
    let restored: Signature = serde_json::from_str("\"ul\"").expect("deserialize");
    assert_eq!(restored, sig);
}
