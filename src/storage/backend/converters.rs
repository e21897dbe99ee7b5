use crate::storage::{ShortLink, UserAccount};
use migration::entities::{short_link, user_account};

/// 将 Sea-ORM Model 转换为 ShortLink
pub fn model_to_shortlink(model: short_link::Model) -> ShortLink {
    ShortLink {
        code: model.short_code,
        target_url: model.target_url,
        owner_id: model.owner_id,
        created_at: model.created_at,
    }
}

/// 将 ShortLink 转换为 ActiveModel（仅用于插入，记录创建后不可变）
pub fn shortlink_to_active_model(link: &ShortLink) -> short_link::ActiveModel {
    use sea_orm::ActiveValue::Set;

    short_link::ActiveModel {
        short_code: Set(link.code.clone()),
        target_url: Set(link.target_url.clone()),
        owner_id: Set(link.owner_id.clone()),
        created_at: Set(link.created_at),
    }
}

pub fn model_to_account(model: user_account::Model) -> UserAccount {
    UserAccount {
        user_id: model.user_id,
        password_hash: model.password_hash,
        is_admin: model.is_admin,
        url_limit: model.url_limit,
        url_count: model.url_count,
        created_at: model.created_at,
    }
}

pub fn account_to_active_model(account: &UserAccount) -> user_account::ActiveModel {
    use sea_orm::ActiveValue::Set;

    user_account::ActiveModel {
        user_id: Set(account.user_id.clone()),
        password_hash: Set(account.password_hash.clone()),
        is_admin: Set(account.is_admin),
        url_limit: Set(account.url_limit),
        url_count: Set(account.url_count),
        created_at: Set(account.created_at),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::ActiveValue;

    #[test]
    fn test_model_to_shortlink() {
        let now = Utc::now();
        let link = model_to_shortlink(short_link::Model {
            short_code: "abcdefghij".to_string(),
            target_url: "https://example.com/".to_string(),
            owner_id: "alice123".to_string(),
            created_at: now,
        });

        assert_eq!(link.code, "abcdefghij");
        assert_eq!(link.target_url, "https://example.com/");
        assert_eq!(link.owner_id, "alice123");
        assert_eq!(link.created_at, now);
    }

    #[test]
    fn test_shortlink_to_active_model() {
        let link = ShortLink::new("abcdefghij", "https://example.com/", "alice123");
        let model = shortlink_to_active_model(&link);

        assert_eq!(model.short_code, ActiveValue::Set("abcdefghij".to_string()));
        assert_eq!(model.owner_id, ActiveValue::Set("alice123".to_string()));
        assert_eq!(model.created_at, ActiveValue::Set(link.created_at));
    }

    #[test]
    fn test_account_conversion_preserves_counters() {
        let mut account = UserAccount::new("alice123", "$argon2id$x", 7);
        account.url_count = 3;
        account.is_admin = true;

        let model = account_to_active_model(&account);
        assert_eq!(model.url_limit, ActiveValue::Set(7));
        assert_eq!(model.url_count, ActiveValue::Set(3));
        assert_eq!(model.is_admin, ActiveValue::Set(true));

        let back = model_to_account(user_account::Model {
            user_id: account.user_id.clone(),
            password_hash: account.password_hash.clone(),
            is_admin: true,
            url_limit: 7,
            url_count: 3,
            created_at: account.created_at,
        });
        assert_eq!(back, account);
    }
}
