use actix_service::{Service, Transform};
use actix_web::{
    Error, FromRequest, HttpMessage, HttpRequest,
    body::EitherBody,
    dev::{Payload, ServiceRequest, ServiceResponse},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use std::sync::Arc;
use tracing::{info, trace};

use crate::api::services::helpers::error_from_vault;
use crate::errors::UrlVaultError;
use crate::services::JwtService;

/// Identity of the caller, attached to the request by [`SessionAuth`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionUser {
    pub user_id: String,
}

impl FromRequest for SessionUser {
    type Error = UrlVaultError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<SessionUser>()
                .cloned()
                .ok_or_else(|| UrlVaultError::missing_token("Not authenticated")),
        )
    }
}

/// Bearer session middleware
#[derive(Clone)]
pub struct SessionAuth {
    sessions: Arc<JwtService>,
}

impl SessionAuth {
    pub fn new(sessions: Arc<JwtService>) -> Self {
        Self { sessions }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SessionAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionAuthMiddleware {
            service: Rc::new(service),
            sessions: self.sessions.clone(),
        }))
    }
}

pub struct SessionAuthMiddleware<S> {
    service: Rc<S>,
    sessions: Arc<JwtService>,
}

impl<S, B> SessionAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    fn handle_unauthorized(
        req: ServiceRequest,
        err: &UrlVaultError,
    ) -> ServiceResponse<EitherBody<B>> {
        info!("Session authentication failed: {}", err);
        req.into_response(error_from_vault(err).map_into_right_body())
    }

    /// 从 Authorization header 提取 Bearer token
    fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
        req.headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer "))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }
}

impl<S, B> Service<ServiceRequest> for SessionAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let sessions = self.sessions.clone();

        Box::pin(async move {
            let Some(token) = Self::extract_bearer_token(&req) else {
                let err = UrlVaultError::missing_token("Not authenticated");
                return Ok(Self::handle_unauthorized(req, &err));
            };

            match sessions.verify_session(&token) {
                Ok(user_id) => {
                    trace!("Session authentication successful for {}", user_id);
                    req.extensions_mut().insert(SessionUser { user_id });
                    let response = srv.call(req).await?.map_into_left_body();
                    Ok(response)
                }
                Err(err) => Ok(Self::handle_unauthorized(req, &err)),
            }
        })
    }
}
