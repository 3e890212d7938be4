use keygate_crypto::{hash_password, verify_password, KeyError};

#[test]
fn correct_password_verifies() {
    let hash = hash_password("hunter2-but-longer").unwrap();
    assert!(verify_password("hunter2-but-longer", &hash).unwrap());
}

#[test]
fn wrong_password_is_ok_false_not_error() {
    let hash = hash_password("correct horse").unwrap();
    assert!(!verify_password("battery staple", &hash).unwrap());
}

#[test]
fn hashes_are_salted() {
    let a = hash_password("same-password").unwrap();
    let b = hash_password("same-password").unwrap();
    assert_ne!(a, b);
}

#[test]
fn unparseable_stored_hash_is_an_error() {
    let err = verify_password("anything", "not-a-phc-string").unwrap_err();
    assert!(matches!(err, KeyError::PasswordHash(_)));
}

#[test]
fn hash_is_phc_format() {
    let hash = hash_password("pw").unwrap();
    assert!(hash.starts_with("$argon2"));
}
