//! # Gate Flows
//!
//! The HTTP trust gate in front of routes, driven by engine state changes.

#[cfg(test)]
mod tests {
    use crate::fixtures::{TrustStack, ALICE};
    use am_01_trust_engine::{TrustLevel, TrustLevelApi};
    use am_02_trust_gateway::{AuthenticatedIdentity, TrustContext, TrustGateLayer};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        routing::{get, post},
        Extension, Router,
    };
    use market_telemetry::GATE_DECISIONS;
    use tower::ServiceExt;

    fn app(stack: &TrustStack) -> Router {
        let listings = Router::new()
            .route(
                "/listings",
                post(|Extension(ctx): Extension<TrustContext>| async move {
                    ctx.account_id.to_string()
                }),
            )
            .layer(TrustGateLayer::new(
                stack.engine.clone(),
                TrustLevel::Established,
            ));

        let reviews = Router::new()
            .route("/reviews", get(|| async { "reviews" }))
            .layer(TrustGateLayer::new(
                stack.engine.clone(),
                TrustLevel::Verified,
            ));

        listings.merge(reviews)
    }

    fn request(method: &str, uri: &str, subject: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .extension(AuthenticatedIdentity::new(subject))
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_gate_follows_escalation() {
        let stack = TrustStack::new();
        let alice = stack.sign_up(ALICE);

        // NEW: both routes closed
        let response = app(&stack)
            .oneshot(request("GET", "/reviews", ALICE))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        // VERIFIED: reviews open, listings closed
        let token = stack.flow.start(ALICE).await.unwrap();
        stack.flow.complete(token.value.expose()).await.unwrap();

        let response = app(&stack)
            .oneshot(request("GET", "/reviews", ALICE))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app(&stack)
            .oneshot(request("POST", "/listings", ALICE))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        // ESTABLISHED: listings open, with the account attached
        stack.ledger.record_completed(&alice);
        stack.engine.recompute_after_order(ALICE).await.unwrap();

        let response = app(&stack)
            .oneshot(request("POST", "/listings", ALICE))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], ALICE.as_bytes());
    }

    #[tokio::test]
    async fn test_demotion_takes_effect_on_next_request() {
        let stack = TrustStack::new();
        stack.seed(ALICE, TrustLevel::Trusted, true);

        let response = app(&stack)
            .oneshot(request("POST", "/listings", ALICE))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        stack.engine.set_level(ALICE, TrustLevel::New).await.unwrap();

        let response = app(&stack)
            .oneshot(request("POST", "/listings", ALICE))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_decisions_are_counted() {
        let stack = TrustStack::new();
        stack.seed(ALICE, TrustLevel::Verified, true);
        let forbidden = GATE_DECISIONS.with_label_values(&["forbidden"]);
        let admitted = GATE_DECISIONS.with_label_values(&["admitted"]);
        let (forbidden_before, admitted_before) = (forbidden.get(), admitted.get());

        app(&stack)
            .oneshot(request("POST", "/listings", ALICE))
            .await
            .unwrap();
        app(&stack)
            .oneshot(request("GET", "/reviews", ALICE))
            .await
            .unwrap();

        assert!(forbidden.get() >= forbidden_before + 1.0);
        assert!(admitted.get() >= admitted_before + 1.0);
    }

    #[tokio::test]
    async fn test_outage_closes_every_route() {
        let stack = TrustStack::new();
        stack.seed(ALICE, TrustLevel::Trusted, true);
        stack.store.set_unavailable(true);

        for (method, uri) in [("GET", "/reviews"), ("POST", "/listings")] {
            let response = app(&stack)
                .oneshot(request(method, uri, ALICE))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }
}
