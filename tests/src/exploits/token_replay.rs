//! # Token Replay
//!
//! An attacker who captured a verification link (proxy log, shared inbox,
//! browser history) replays it after the owner used it, or after expiry.

#[cfg(test)]
mod tests {
    use crate::fixtures::{TrustStack, ALICE};
    use am_01_trust_engine::{Redemption, TrustLevel, TrustLevelApi, VerificationTokenApi};
    use chrono::Duration;

    #[tokio::test]
    async fn test_replay_after_use_is_rejected() {
        let stack = TrustStack::new();
        stack.sign_up(ALICE);

        let token = stack.tokens.issue(ALICE).await.unwrap();
        assert!(stack.tokens.redeem(token.value.expose()).await.unwrap().valid);

        for _ in 0..10 {
            let replay = stack.tokens.redeem(token.value.expose()).await.unwrap();
            assert_eq!(replay, Redemption::invalid());
        }
    }

    #[tokio::test]
    async fn test_replay_after_expiry_is_rejected_forever() {
        let stack = TrustStack::new();
        stack.sign_up(ALICE);

        let token = stack.tokens.issue(ALICE).await.unwrap();
        stack.clock.advance(Duration::hours(24));

        for _ in 0..3 {
            assert!(!stack.tokens.redeem(token.value.expose()).await.unwrap().valid);
            stack.clock.advance(Duration::days(30));
        }

        // Expired tokens are left unconsumed, never reused.
        assert!(!stack.tokens_store.get(&token.value).unwrap().consumed);
    }

    #[tokio::test]
    async fn test_replay_of_verification_link_does_not_rewrite_level() {
        let stack = TrustStack::new();
        stack.sign_up(ALICE);

        let token = stack.flow.start(ALICE).await.unwrap();
        stack.flow.complete(token.value.expose()).await.unwrap();

        // Admin demotes after abuse; the old link must not restore VERIFIED.
        stack.engine.set_level(ALICE, TrustLevel::New).await.unwrap();
        stack.flow.complete(token.value.expose()).await.unwrap();
        assert_eq!(stack.engine.get_level(ALICE).await.unwrap(), TrustLevel::New);
    }

    #[tokio::test]
    async fn test_guessing_does_not_hit() {
        let stack = TrustStack::new();
        stack.sign_up(ALICE);
        stack.tokens.issue(ALICE).await.unwrap();

        for i in 0..256u32 {
            let guess = format!("{:064x}", i);
            assert!(!stack.tokens.redeem(&guess).await.unwrap().valid);
        }
    }

    #[tokio::test]
    async fn test_case_altered_token_is_rejected() {
        let stack = TrustStack::new();
        stack.sign_up(ALICE);

        let token = stack.tokens.issue(ALICE).await.unwrap();
        let shouted = token.value.expose().to_ascii_uppercase();
        assert!(!stack.tokens.redeem(&shouted).await.unwrap().valid);

        // The genuine token is unaffected.
        assert!(stack.tokens.redeem(token.value.expose()).await.unwrap().valid);
    }
}
