use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        PixmorphError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        PixmorphError::decode("x")
            .to_string()
            .contains("decode error:")
    );
    assert!(
        PixmorphError::surface("x")
            .to_string()
            .contains("surface error:")
    );
    assert!(
        PixmorphError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = PixmorphError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
