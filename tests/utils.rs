use credito_api::repos::store::{session::session_key, utils::hashing_composite_key};

/// For trying to hash string of numbers (concatenated) in to sha256
#[test]
fn hashing_numbers() {
    let first_number = "123".to_string();

    assert_eq!(
        "a665a45920422f9d417e4867efdc4fb8a04a1f3fff1fa07e998e86f7f7a27ae3".to_uppercase(),
        hashing_composite_key(&[&first_number])
    );

    assert_eq!(
        hashing_composite_key(&["1", "23"]),
        hashing_composite_key(&[&first_number]),
        "Las partes se concatenan antes de calcular el hash"
    );
}

/// The raw token must never be part of a redis key
#[test]
fn session_key_hides_the_token() {
    let token = "9944b09199c62bcf9418ad846dd0e4bbdfc6ee4b";
    let key = session_key(token);

    assert!(key.starts_with("sessions:"));
    assert!(!key.contains(token));
    assert_eq!(key, session_key(token), "La clave debe ser estable");
}
