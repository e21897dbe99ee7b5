pub mod short_link;
pub mod user_account;

pub use short_link::Entity as ShortLinkEntity;
pub use user_account::Entity as UserAccountEntity;
