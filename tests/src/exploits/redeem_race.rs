//! # Redeem Race
//!
//! Many concurrent redeems of one token (double-click, replay burst, two
//! devices). Exactly one may succeed.

#[cfg(test)]
mod tests {
    use crate::fixtures::{TrustStack, ALICE};
    use am_01_trust_engine::{TrustLevel, TrustLevelApi, VerificationOutcome, VerificationTokenApi};
    use futures::future::join_all;
    use std::sync::Arc;

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_hundred_concurrent_redeems_one_valid() {
        let stack = TrustStack::new();
        stack.sign_up(ALICE);
        let token = stack.tokens.issue(ALICE).await.unwrap();

        let handles: Vec<_> = (0..100)
            .map(|_| {
                let tokens = Arc::clone(&stack.tokens);
                let raw = token.value.expose().to_string();
                tokio::spawn(async move { tokens.redeem(&raw).await })
            })
            .collect();

        let valid = join_all(handles)
            .await
            .into_iter()
            .map(|joined| joined.unwrap().unwrap())
            .filter(|redemption| redemption.valid)
            .count();

        assert_eq!(valid, 1);
        assert!(stack.tokens_store.get(&token.value).unwrap().consumed);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_concurrent_flow_completion_verifies_once() {
        let stack = Arc::new(TrustStack::new());
        stack.sign_up(ALICE);
        let token = stack.flow.start(ALICE).await.unwrap();

        let handles: Vec<_> = (0..50)
            .map(|_| {
                let stack = Arc::clone(&stack);
                let raw = token.value.expose().to_string();
                tokio::spawn(async move { stack.flow.complete(&raw).await })
            })
            .collect();

        let verified = join_all(handles)
            .await
            .into_iter()
            .map(|joined| joined.unwrap().unwrap())
            .filter(|outcome| matches!(outcome, VerificationOutcome::Verified { .. }))
            .count();

        assert_eq!(verified, 1);
        // The verified flag alone derives VERIFIED; no level is written.
        assert_eq!(stack.store.write_count(), 0);
        assert_eq!(stack.engine.get_level(ALICE).await.unwrap(), TrustLevel::Verified);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_distinct_tokens_redeem_independently() {
        let stack = TrustStack::new();
        stack.sign_up(ALICE);

        let mut issued = Vec::new();
        for _ in 0..20 {
            issued.push(stack.tokens.issue(ALICE).await.unwrap());
        }

        let handles: Vec<_> = issued
            .iter()
            .map(|token| {
                let tokens = Arc::clone(&stack.tokens);
                let raw = token.value.expose().to_string();
                tokio::spawn(async move { tokens.redeem(&raw).await })
            })
            .collect();

        let valid = join_all(handles)
            .await
            .into_iter()
            .filter(|joined| matches!(joined, Ok(Ok(r)) if r.valid))
            .count();
        assert_eq!(valid, issued.len());
    }
}
