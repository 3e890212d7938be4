//! Property-based tests for signing and the envelope codec.
//!
//! Security properties that must always hold:
//! - Any payload roundtrips through seal/parse/verify
//! - A signature never verifies a different payload
//! - Parsing never panics on arbitrary input

use keygate_crypto::{sign_detached, verify_detached, Keyring, SignedEnvelope};
use keygate_types::KeyId;
use proptest::prelude::*;

fn seed_strategy() -> impl Strategy<Value = [u8; 32]> {
    prop::array::uniform32(any::<u8>())
}

fn payload_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..2000)
}

proptest! {
    #[test]
    fn envelope_roundtrip_any_payload(seed in seed_strategy(), payload in payload_strategy()) {
        let ring = Keyring::from_seed(KeyId::new("p"), &seed);
        let (envelope, kid) = SignedEnvelope::seal(&ring, &payload).unwrap();
        let parsed = SignedEnvelope::parse(&envelope.encode()).unwrap();
        prop_assert!(parsed.verify(&ring, &kid).is_ok());
        prop_assert_eq!(parsed.payload().unwrap(), payload);
    }

    #[test]
    fn detached_signature_rejects_other_payloads(
        seed in seed_strategy(),
        a in payload_strategy(),
        b in payload_strategy(),
    ) {
        prop_assume!(a != b);
        let ring = Keyring::from_seed(KeyId::new("p"), &seed);
        let (kid, sig) = sign_detached(&ring, &a).unwrap();
        prop_assert!(verify_detached(&ring, &kid, &b, &sig).is_err());
    }

    #[test]
    fn parse_never_panics(input in "\\PC*") {
        let _ = SignedEnvelope::parse(&input);
    }
}
