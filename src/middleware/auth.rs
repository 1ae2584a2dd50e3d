use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, HttpMessage, ResponseError,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};

use crate::config::JwtSettings;
use crate::models::ROLE_ADMIN;
use crate::services::auth_service;
use crate::utils::error::AppError;

pub use crate::services::auth_service::Claims;

/// Verifies the bearer JWT and stores its `Claims` in request extensions.
///
/// `AuthMiddleware::admin()` additionally requires the admin role.
pub struct AuthMiddleware {
    required_role: Option<&'static str>,
}

impl AuthMiddleware {
    pub fn authenticated() -> Self {
        Self { required_role: None }
    }

    pub fn admin() -> Self {
        Self { required_role: Some(ROLE_ADMIN) }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service,
            required_role: self.required_role,
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
    required_role: Option<&'static str>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        match authorize(&req, self.required_role) {
            Ok(claims) => {
                req.extensions_mut().insert(claims);
                let fut = self.service.call(req);
                Box::pin(async move {
                    let res = fut.await?;
                    Ok(res.map_into_left_body())
                })
            }
            Err(e) => {
                log::warn!("🔒 {} {} rejected: {}", req.method(), req.path(), e);
                let response = e.error_response();
                Box::pin(async move { Ok(req.into_response(response).map_into_right_body()) })
            }
        }
    }
}

fn authorize(req: &ServiceRequest, required_role: Option<&str>) -> Result<Claims, AppError> {
    let settings = req
        .app_data::<web::Data<JwtSettings>>()
        .ok_or_else(|| AppError::Internal("JWT settings not configured".to_string()))?;

    let header = req
        .headers()
        .get(actix_web::http::header::AUTHORIZATION)
        .ok_or_else(|| AppError::Unauthorized("Missing authorization token".to_string()))?;

    let token = header
        .to_str()
        .ok()
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::Unauthorized("Invalid token format".to_string()))?;

    let claims = auth_service::verify_token(settings, token)?;

    if let Some(role) = required_role {
        if !claims.has_role(role) {
            return Err(AppError::Forbidden(format!("{} role required", role)));
        }
    }

    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{User, ROLE_CLIENT};
    use actix_web::{http::StatusCode, test, App, HttpResponse};

    fn settings() -> JwtSettings {
        JwtSettings {
            secret: "middleware-secret".into(),
            issuer: "trainer-marketplace".into(),
            audience: "trainer-marketplace-api".into(),
        }
    }

    fn token_for(roles: &[&str]) -> String {
        let user = User {
            id: None,
            user_id: "user-1".into(),
            email: "user@example.com".into(),
            first_name: "U".into(),
            last_name: "Ser".into(),
            password: String::new(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
            created_at: 0,
        };
        auth_service::generate_jwt(&settings(), &user).unwrap()
    }

    async fn whoami(claims: web::ReqData<Claims>) -> HttpResponse {
        HttpResponse::Ok().body(claims.sub.clone())
    }

    #[actix_rt::test]
    async fn test_admin_scope() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(settings()))
                .service(
                    web::scope("/admin")
                        .wrap(AuthMiddleware::admin())
                        .route("/whoami", web::get().to(whoami)),
                ),
        )
        .await;

        let missing = test::TestRequest::get().uri("/admin/whoami").to_request();
        assert_eq!(test::call_service(&app, missing).await.status(), StatusCode::UNAUTHORIZED);

        let malformed = test::TestRequest::get()
            .uri("/admin/whoami")
            .insert_header(("Authorization", "Token abc"))
            .to_request();
        assert_eq!(test::call_service(&app, malformed).await.status(), StatusCode::UNAUTHORIZED);

        let client = test::TestRequest::get()
            .uri("/admin/whoami")
            .insert_header(("Authorization", format!("Bearer {}", token_for(&[ROLE_CLIENT]))))
            .to_request();
        assert_eq!(test::call_service(&app, client).await.status(), StatusCode::FORBIDDEN);

        let admin = test::TestRequest::get()
            .uri("/admin/whoami")
            .insert_header((
                "Authorization",
                format!("Bearer {}", token_for(&[ROLE_CLIENT, ROLE_ADMIN])),
            ))
            .to_request();
        let response = test::call_service(&app, admin).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(test::read_body(response).await, "user-1");
    }

    #[actix_rt::test]
    async fn test_authenticated_scope_accepts_any_role() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(settings()))
                .service(
                    web::scope("/me")
                        .wrap(AuthMiddleware::authenticated())
                        .route("", web::get().to(whoami)),
                ),
        )
        .await;

        let request = test::TestRequest::get()
            .uri("/me")
            .insert_header(("Authorization", format!("Bearer {}", token_for(&[ROLE_CLIENT]))))
            .to_request();
        assert_eq!(test::call_service(&app, request).await.status(), StatusCode::OK);
    }
}
