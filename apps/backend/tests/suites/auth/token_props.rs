//! Property tests for token issuance and validation.

use std::time::{Duration, SystemTime};

use proptest::prelude::*;
use serde_json::Map;

use crate::support::auth::{tamper_signature, tokens_with};

fn username() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{2,20}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_fresh_token_validates_for_its_subject(
        user in username(),
        ttl_ms in 1_000u64..=86_400_000,
    ) {
        let tokens = tokens_with("property-secret", Duration::from_millis(ttl_ms));
        let token = tokens.generate(user.as_str(), Map::new()).unwrap();

        prop_assert!(tokens.validate_token(&token, user.as_str()));
        prop_assert_eq!(tokens.extract_username(&token).unwrap(), user);
    }

    #[test]
    fn prop_token_rejects_other_subjects(
        user in username(),
        other in username(),
    ) {
        prop_assume!(user != other);
        let tokens = tokens_with("property-secret", Duration::from_secs(3600));
        let token = tokens.generate(user.as_str(), Map::new()).unwrap();

        prop_assert!(!tokens.validate_token(&token, other.as_str()));
    }

    #[test]
    fn prop_token_invalid_after_expiry(
        user in username(),
        ttl_ms in 1_000u64..=86_400_000,
    ) {
        let tokens = tokens_with("property-secret", Duration::from_millis(ttl_ms));
        let issued = SystemTime::now();
        let token = tokens.generate_at(user.as_str(), Map::new(), issued).unwrap();

        let after = issued + Duration::from_millis(ttl_ms) + Duration::from_secs(1);
        prop_assert!(!tokens.validate_token_at(&token, user.as_str(), after));
        // Expired tokens still decode
        prop_assert_eq!(tokens.extract_username(&token).unwrap(), user);
    }

    #[test]
    fn prop_foreign_or_tampered_tokens_never_validate(user in username()) {
        let tokens = tokens_with("property-secret", Duration::from_secs(3600));
        let foreign = tokens_with("another-secret", Duration::from_secs(3600));
        let token = tokens.generate(user.as_str(), Map::new()).unwrap();

        prop_assert!(!foreign.validate_token(&token, user.as_str()));
        prop_assert!(foreign.extract_username(&token).is_err());
        prop_assert!(!tokens.validate_token(&tamper_signature(&token), user.as_str()));
    }
}
