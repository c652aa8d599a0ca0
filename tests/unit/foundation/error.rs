use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        SingularityError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        SingularityError::graph("x")
            .to_string()
            .contains("material graph error:")
    );
    assert!(
        SingularityError::animation("x")
            .to_string()
            .contains("animation error:")
    );
    assert!(
        SingularityError::missing_host("x")
            .to_string()
            .contains("missing host runtime:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = SingularityError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
