use std::sync::Arc;
use std::task::Context;
use std::task::Poll;

use tonic::body::BoxBody;
use tonic::codegen::http;
use tonic::codegen::BoxFuture;
use tonic::Status;
use tower::Layer;
use tower::Service;

use crate::credential::models::LedgerPolicy;
use crate::credential::models::VerifiedIdentity;
use crate::credential::ports::AuthServicePort;

/// Auth service methods callers reach without a bearer token.
pub const PUBLIC_METHODS: &[&str] = &[
    "/auth.AuthService/Register",
    "/auth.AuthService/Login",
    "/auth.AuthService/Logout",
    "/auth.AuthService/VerifyToken",
];

/// Tower layer that verifies the `authorization` metadata of every gRPC call
/// outside the allowed methods.
///
/// A verified call carries its `VerifiedIdentity` in the request extensions,
/// where `tonic::Request::extensions` exposes it to the handler. Revocation
/// is checked on every call and the `LedgerPolicy` decides ledger outages.
#[derive(Clone)]
pub struct AuthInterceptorLayer {
    service: Arc<dyn AuthServicePort>,
    ledger_policy: LedgerPolicy,
    public_methods: Vec<&'static str>,
}

impl AuthInterceptorLayer {
    pub fn new(service: Arc<dyn AuthServicePort>, ledger_policy: LedgerPolicy) -> Self {
        Self {
            service,
            ledger_policy,
            public_methods: Vec::new(),
        }
    }

    /// Let calls to `methods` (full gRPC paths) through without a token.
    pub fn allow(mut self, methods: &[&'static str]) -> Self {
        self.public_methods = methods.to_vec();
        self
    }

    fn is_public(&self, path: &str) -> bool {
        self.public_methods.contains(&path)
    }

    /// Resolve a bearer token to a verified identity.
    pub async fn authorize(&self, token: &str) -> Result<VerifiedIdentity, Status> {
        let outcome = self.service.verify_token(token).await;
        self.ledger_policy.resolve(outcome).map_err(|e| {
            tracing::warn!(error = %e, protocol = "grpc", "Bearer token rejected");
            Status::from(e)
        })
    }
}

impl<S> Layer<S> for AuthInterceptorLayer {
    type Service = AuthInterceptor<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthInterceptor {
            inner,
            layer: self.clone(),
        }
    }
}

#[derive(Clone)]
pub struct AuthInterceptor<S> {
    inner: S,
    layer: AuthInterceptorLayer,
}

impl<S, B> Service<http::Request<B>> for AuthInterceptor<S>
where
    S: Service<http::Request<B>, Response = http::Response<BoxBody>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = http::Response<BoxBody>;
    type Error = S::Error;
    type Future = BoxFuture<Self::Response, Self::Error>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: http::Request<B>) -> Self::Future {
        // The ready clone stays in `self`, the one polled ready serves this call.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        if self.layer.is_public(request.uri().path()) {
            return Box::pin(inner.call(request));
        }

        let token = extract_bearer_token(request.headers()).map(str::to_owned);
        let layer = self.layer.clone();

        Box::pin(async move {
            let verified = match token {
                Ok(token) => layer.authorize(&token).await,
                Err(status) => Err(status),
            };

            match verified {
                Ok(verified) => {
                    request.extensions_mut().insert(verified);
                }
                Err(status) => return Ok(status.to_http()),
            }

            inner.call(request).await
        })
    }
}

fn extract_bearer_token(headers: &http::HeaderMap) -> Result<&str, Status> {
    let value = headers
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| Status::unauthenticated("Missing authorization metadata"))?;

    value
        .to_str()
        .ok()
        .and_then(|value| value.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            Status::unauthenticated("Invalid authorization metadata. Expected: Bearer <token>")
        })
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use chrono::Utc;
    use tonic::Code;
    use tower::ServiceExt;

    use super::*;
    use crate::credential::errors::AuthError;
    use crate::credential::models::Identity;
    use crate::credential::models::Role;
    use crate::inbound::http::handlers::tests::MockTestAuthService;

    const PROTECTED: &str = "/mentor.MentorService/ListSessions";

    fn verified() -> VerifiedIdentity {
        VerifiedIdentity {
            identity: Identity::new("a@x.com").unwrap(),
            role: Role::Mentee,
            expires_at: Utc::now(),
        }
    }

    fn ledger_down() -> AuthError {
        AuthError::LedgerUnavailable {
            verified: verified(),
            reason: "connection refused".to_string(),
        }
    }

    /// Echo the verified identity back in a header, as a protected handler would read it.
    async fn call(
        service: MockTestAuthService,
        ledger_policy: LedgerPolicy,
        path: &str,
        authorization: Option<&str>,
    ) -> http::Response<BoxBody> {
        let layer = AuthInterceptorLayer::new(Arc::new(service), ledger_policy)
            .allow(PUBLIC_METHODS);
        let inner = tower::service_fn(|request: http::Request<()>| async move {
            let mut response = http::Response::new(tonic::body::empty_body());
            if let Some(verified) = request.extensions().get::<VerifiedIdentity>() {
                response.headers_mut().insert(
                    "x-verified-identity",
                    verified.identity.as_str().parse().unwrap(),
                );
            }
            Ok::<_, Infallible>(response)
        });

        let mut builder = http::Request::builder().uri(format!("http://localhost{}", path));
        if let Some(value) = authorization {
            builder = builder.header("authorization", value);
        }

        layer
            .layer(inner)
            .oneshot(builder.body(()).unwrap())
            .await
            .unwrap()
    }

    fn status_of(response: &http::Response<BoxBody>) -> Option<Code> {
        Status::from_header_map(response.headers()).map(|status| status.code())
    }

    #[tokio::test]
    async fn test_valid_token_inserts_verified_identity() {
        let mut service = MockTestAuthService::new();
        service
            .expect_verify_token()
            .withf(|token| token == "t")
            .times(1)
            .returning(|_| Ok(verified()));

        let response = call(service, LedgerPolicy::FailClosed, PROTECTED, Some("Bearer t")).await;

        assert_eq!(status_of(&response), None);
        assert_eq!(response.headers()["x-verified-identity"], "a@x.com");
    }

    #[tokio::test]
    async fn test_missing_metadata_is_unauthenticated() {
        let mut service = MockTestAuthService::new();
        service.expect_verify_token().times(0);

        let response = call(service, LedgerPolicy::FailClosed, PROTECTED, None).await;

        assert_eq!(status_of(&response), Some(Code::Unauthenticated));
    }

    #[tokio::test]
    async fn test_non_bearer_metadata_is_unauthenticated() {
        for authorization in ["Basic dXNlcjpwdw==", "Bearer ", "t"] {
            let mut service = MockTestAuthService::new();
            service.expect_verify_token().times(0);

            let response =
                call(service, LedgerPolicy::FailClosed, PROTECTED, Some(authorization)).await;

            assert_eq!(status_of(&response), Some(Code::Unauthenticated));
        }
    }

    #[tokio::test]
    async fn test_revoked_token_is_unauthenticated() {
        let mut service = MockTestAuthService::new();
        service.expect_verify_token().returning(|_| {
            Err(AuthError::Unauthenticated(
                "token has been revoked".to_string(),
            ))
        });

        let response = call(service, LedgerPolicy::FailOpen, PROTECTED, Some("Bearer t")).await;

        assert_eq!(status_of(&response), Some(Code::Unauthenticated));
        assert!(response.headers().get("x-verified-identity").is_none());
    }

    #[tokio::test]
    async fn test_ledger_outage_respects_policy() {
        let mut closed = MockTestAuthService::new();
        closed.expect_verify_token().returning(|_| Err(ledger_down()));
        let response = call(closed, LedgerPolicy::FailClosed, PROTECTED, Some("Bearer t")).await;
        assert_eq!(status_of(&response), Some(Code::Unavailable));

        let mut open = MockTestAuthService::new();
        open.expect_verify_token().returning(|_| Err(ledger_down()));
        let response = call(open, LedgerPolicy::FailOpen, PROTECTED, Some("Bearer t")).await;
        assert_eq!(status_of(&response), None);
        assert_eq!(response.headers()["x-verified-identity"], "a@x.com");
    }

    #[tokio::test]
    async fn test_public_methods_skip_verification() {
        let mut service = MockTestAuthService::new();
        service.expect_verify_token().times(0);

        let response = call(
            service,
            LedgerPolicy::FailClosed,
            "/auth.AuthService/Login",
            None,
        )
        .await;

        assert_eq!(status_of(&response), None);
    }
}
