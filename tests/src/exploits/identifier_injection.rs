//! # Identifier Injection
//!
//! Malformed or hostile account identifiers (SQL fragments, path tricks,
//! oversized input, lookalike Unicode) must be rejected before any store
//! access, through every public entry point.

#[cfg(test)]
mod tests {
    use crate::fixtures::{TrustStack, ALICE};
    use am_01_trust_engine::{
        is_valid_identifier, TrustError, TrustLevel, TrustLevelApi, VerificationTokenApi,
    };
    use proptest::prelude::*;

    fn hostile_identifiers() -> Vec<String> {
        vec![
            String::new(),
            "' OR '1'='1".to_string(),
            "123e4567-e89b-12d3-a456-426614174000' --".to_string(),
            "123e4567-e89b-12d3-a456-42661417400;".to_string(),
            "../../etc/passwd-0000-0000-000000000000".to_string(),
            "{123e4567-e89b-12d3-a456-426614174000}".to_string(),
            "urn:uuid:123e4567-e89b-12d3-a456-426614174000".to_string(),
            "123e4567e89b12d3a456426614174000".to_string(),
            "123e4567-e89b-12d3-a456-42661417400\0".to_string(),
            // Fullwidth digit in place of an ASCII one
            "１23e4567-e89b-12d3-a456-42661417400".to_string(),
            "a".repeat(1 << 16),
        ]
    }

    #[tokio::test]
    async fn test_hostile_identifiers_never_reach_store() {
        let stack = TrustStack::new();
        stack.seed(ALICE, TrustLevel::Trusted, true);
        // Any store access would fail with StoreUnavailable instead.
        stack.store.set_unavailable(true);
        stack.tokens_store.set_unavailable(true);

        for id in hostile_identifiers() {
            let checks = [
                stack.engine.get_level(&id).await.map(|_| ()),
                stack.engine.lookup(&id).await.map(|_| ()),
                stack.engine.set_level(&id, TrustLevel::Trusted).await,
                stack.engine.set_level_ordinal(&id, 4).await,
                stack.engine.mark_verified(&id).await,
                stack.engine.recompute_after_order(&id).await.map(|_| ()),
                stack
                    .engine
                    .ensure_at_least(&id, TrustLevel::Verified)
                    .await
                    .map(|_| ()),
                stack.engine.admit(&id, TrustLevel::New).await.map(|_| ()),
                stack.tokens.issue(&id).await.map(|_| ()),
            ];

            for result in checks {
                assert!(
                    matches!(result, Err(TrustError::InvalidIdentifier(_))),
                    "{:?} accepted for {:?}",
                    result,
                    id.chars().take(40).collect::<String>()
                );
            }
        }
        assert_eq!(stack.store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_rejection_echo_is_bounded() {
        let stack = TrustStack::new();
        let huge = "x".repeat(1 << 16);

        let err = stack.engine.get_level(&huge).await.unwrap_err();
        assert!(err.to_string().len() < 256);
    }

    #[tokio::test]
    async fn test_identifier_casing_is_preserved_not_merged() {
        let stack = TrustStack::new();
        stack.seed(ALICE, TrustLevel::Trusted, true);

        // Uppercase form is valid but keys a different row.
        let upper = ALICE.to_ascii_uppercase();
        assert!(is_valid_identifier(&upper));
        assert_eq!(stack.engine.lookup(&upper).await.unwrap(), None);
    }

    proptest! {
        #[test]
        fn prop_arbitrary_input_rejected_or_well_formed(s in "\\PC{0,64}") {
            if is_valid_identifier(&s) {
                prop_assert_eq!(s.len(), 36);
                prop_assert!(s.bytes().all(|b| b == b'-' || b.is_ascii_hexdigit()));
            }
        }

        #[test]
        fn prop_uuid_v4_always_accepted(bytes in any::<[u8; 16]>()) {
            let id = uuid::Builder::from_random_bytes(bytes).into_uuid();
            prop_assert!(is_valid_identifier(&id.hyphenated().to_string()));
            prop_assert!(!is_valid_identifier(&id.simple().to_string()));
            prop_assert!(!is_valid_identifier(&id.braced().to_string()));
        }
    }
}
