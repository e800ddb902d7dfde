//! Trust gate middleware.
//!
//! Admits a request only when its authenticated account meets a minimum
//! trust level. The level is recomputed from the store on every request.
//!
//! | Situation | Response |
//! |-----------|----------|
//! | No `AuthenticatedIdentity` extension | 403 |
//! | No trust record for the account | 403 |
//! | Level below the requirement | 403 naming both levels |
//! | Malformed identifier or store failure | 500 |
//! | Level meets the requirement | inner service, with `TrustContext` attached |

use crate::error::GateError;
use crate::identity::{AuthenticatedIdentity, TrustContext};
use am_01_trust_engine::{AccountId, TrustError, TrustLevel, TrustLevelApi};
use axum::{
    body::Body,
    http::Request,
    response::{IntoResponse, Response},
};
use market_telemetry::GATE_DECISIONS;
use std::sync::Arc;
use tower::{Layer, Service};
use tracing::{debug, error, warn};

/// Trust gate layer.
#[derive(Clone)]
pub struct TrustGateLayer {
    engine: Arc<dyn TrustLevelApi>,
    required: TrustLevel,
}

impl TrustGateLayer {
    /// Gate wrapped routes at `required`.
    pub fn new(engine: Arc<dyn TrustLevelApi>, required: TrustLevel) -> Self {
        Self { engine, required }
    }
}

impl<S> Layer<S> for TrustGateLayer {
    type Service = TrustGateService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        TrustGateService {
            inner,
            engine: Arc::clone(&self.engine),
            required: self.required,
        }
    }
}

/// Trust gate service.
#[derive(Clone)]
pub struct TrustGateService<S> {
    inner: S,
    engine: Arc<dyn TrustLevelApi>,
    required: TrustLevel,
}

impl<S> Service<Request<Body>> for TrustGateService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let engine = Arc::clone(&self.engine);
        let required = self.required;
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let identity = req.extensions().get::<AuthenticatedIdentity>().cloned();

            match decide(engine.as_ref(), identity.as_ref(), required).await {
                Ok(context) => {
                    GATE_DECISIONS.with_label_values(&["admitted"]).inc();
                    debug!(
                        account_id = %context.account_id,
                        level = %context.level,
                        required = %required,
                        outcome = "admitted",
                        "Trust gate admitted request"
                    );
                    req.extensions_mut().insert(context);
                    inner.call(req).await
                }
                Err(e) => {
                    let rejection = GateError::from(&e);
                    let outcome = if rejection.is_forbidden() {
                        "forbidden"
                    } else {
                        error!(
                            error = %e,
                            code = e.code(),
                            outcome = "error",
                            "Trust gate: check failed"
                        );
                        "error"
                    };
                    GATE_DECISIONS.with_label_values(&[outcome]).inc();
                    Ok(rejection.into_response())
                }
            }
        })
    }
}

/// Resolve the gate decision for one request. Denials are
/// `TrustError::Forbidden`; anything else is a failed check.
async fn decide(
    engine: &dyn TrustLevelApi,
    identity: Option<&AuthenticatedIdentity>,
    required: TrustLevel,
) -> Result<TrustContext, TrustError> {
    let Some(identity) = identity else {
        warn!(outcome = "forbidden", "Trust gate: no authenticated identity");
        return Err(TrustError::Forbidden("Authentication required".into()));
    };

    let account_id = AccountId::parse(&identity.subject)?;
    let Some(level) = engine.lookup(account_id.as_str()).await? else {
        warn!(account_id = %account_id, outcome = "forbidden", "Trust gate: no trust record");
        return Err(TrustError::Forbidden("No trust record for account".into()));
    };

    if !level.satisfies(required) {
        warn!(
            account_id = %account_id,
            level = %level,
            required = %required,
            outcome = "forbidden",
            "Trust gate: level too low"
        );
        return Err(TrustError::Forbidden(format!(
            "Trust level {required} required, account is {level}"
        )));
    }

    Ok(TrustContext { account_id, level })
}
