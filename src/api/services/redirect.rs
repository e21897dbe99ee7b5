use actix_web::{HttpResponse, Responder, web};
use tracing::{debug, trace};

use super::helpers::error_from_vault;
use crate::config::RoutesConfig;
use crate::services::AppServices;

pub struct RedirectService;

impl RedirectService {
    pub async fn handle_redirect(
        path: web::Path<String>,
        services: web::Data<AppServices>,
    ) -> impl Responder {
        let code = path.into_inner();

        match services.redirect.resolve(&code).await {
            Ok(target) => {
                trace!("Redirecting {} -> {}", code, target);
                HttpResponse::TemporaryRedirect()
                    .insert_header(("Location", target))
                    .finish()
            }
            Err(e) => {
                debug!("Redirect failed for {}: {}", code, e);
                error_from_vault(&e)
            }
        }
    }

    pub async fn handle_root(routes: web::Data<RoutesConfig>) -> impl Responder {
        HttpResponse::TemporaryRedirect()
            .insert_header(("Location", routes.default_url.clone()))
            .finish()
    }
}

pub fn redirect_routes() -> actix_web::Scope {
    web::scope("")
        .route("/", web::get().to(RedirectService::handle_root))
        .route("/", web::head().to(RedirectService::handle_root))
        .route("/{code}", web::get().to(RedirectService::handle_redirect))
        .route("/{code}", web::head().to(RedirectService::handle_redirect))
}
