//! 管理员接口
//!
//! 权限判断在服务层完成，这里只负责加载当前账户。

use actix_web::{Responder, web};

use super::auth::current_account;
use super::helpers::api_result;
use super::types::{AccountSummary, MessageResponse, UpdateUserRequest};
use crate::api::middleware::SessionUser;
use crate::errors::UrlVaultError;
use crate::services::{AccountUpdate, AppServices};

pub struct AdminApi;

impl AdminApi {
    pub async fn list_all_links(
        services: web::Data<AppServices>,
        user: SessionUser,
    ) -> impl Responder {
        let result = async {
            let actor = current_account(&services, &user).await?;
            let mapping = services.links.list_all(&actor).await?;
            if mapping.is_empty() {
                return Err(UrlVaultError::empty("No URLs have been shortened yet."));
            }
            Ok::<_, UrlVaultError>(mapping)
        }
        .await;

        api_result(result)
    }

    pub async fn delete_link(
        services: web::Data<AppServices>,
        user: SessionUser,
        path: web::Path<String>,
    ) -> impl Responder {
        let code = path.into_inner();
        let result = async {
            let actor = current_account(&services, &user).await?;
            services.admin.delete_link(&actor, &code).await?;
            Ok::<_, UrlVaultError>(MessageResponse {
                message: format!("{} was successfully deleted.", code),
            })
        }
        .await;

        api_result(result)
    }

    pub async fn update_user(
        services: web::Data<AppServices>,
        user: SessionUser,
        path: web::Path<String>,
        body: web::Json<UpdateUserRequest>,
    ) -> impl Responder {
        let user_id = path.into_inner();
        let update = AccountUpdate {
            url_limit: body.url_limit,
            is_admin: body.is_admin,
        };
        let result = async {
            let actor = current_account(&services, &user).await?;
            let updated = services.admin.update_account(&actor, &user_id, update).await?;
            Ok::<_, UrlVaultError>(AccountSummary::from(updated))
        }
        .await;

        api_result(result)
    }
}
