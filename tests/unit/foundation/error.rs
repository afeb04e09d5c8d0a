use super::*;

#[test]
fn display_prefixes_are_stable() {
    let text = PetError::validation("x").to_string();
    assert!(text.contains("validation error:"));
    assert!(PetError::decode("x").to_string().contains("decode error:"));
    assert!(PetError::config("x").to_string().contains("config error:"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = PetError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn anyhow_context_converts_with_question_mark() {
    fn read_missing() -> PetResult<Vec<u8>> {
        use anyhow::Context;
        let bytes = std::fs::read("/definitely/not/here.gif").context("read sprite bytes")?;
        Ok(bytes)
    }

    let err = read_missing().unwrap_err();
    assert!(matches!(err, PetError::Other(_)));
    assert!(err.to_string().contains("read sprite bytes"));
}
