use encoding_rs::WINDOWS_1252;

/// Map text exported by old Windows toolchains is code page 1252, newer
/// exports are UTF-8.
pub fn decode_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            let (decoded, _, _) = WINDOWS_1252.decode(bytes);
            decoded.to_string()
        }
    }
}

#[test]
fn test_decode_windows_1252() {
    assert_eq!("café", decode_text(b"caf\xe9"));
    assert_eq!("café", decode_text("café".as_bytes()));
}
