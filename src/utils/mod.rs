pub mod password;
pub mod url_validator;
pub mod validators;

use base64::Engine;

pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

pub fn generate_random_code(length: usize) -> String {
    use std::iter;

    // 随机选择字母和数字
    iter::repeat_with(|| CODE_ALPHABET[rand::random_range(0..CODE_ALPHABET.len())] as char)
        .take(length)
        .collect()
}

/// 生成加密安全的随机令牌（URL-safe Base64，无填充）
pub fn generate_secure_token(byte_len: usize) -> String {
    let bytes: Vec<u8> = iter_random_bytes().take(byte_len).collect();
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

fn iter_random_bytes() -> impl Iterator<Item = u8> {
    std::iter::repeat_with(rand::random::<u8>)
}
