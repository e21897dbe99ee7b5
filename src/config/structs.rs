use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, UrlVaultError};

/// 应用配置（从 TOML 加载，启动时构建一次并显式传递）
///
/// 包含：
/// - server: 服务器地址、端口、CPU 数量
/// - database: 数据库连接与重试配置
/// - auth: 会话令牌签名密钥与有效期
/// - links: 短码长度、碰撞重试次数、默认配额
/// - routes: 路由前缀与根路径跳转
/// - logging: 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub links: LinksConfig,
    #[serde(default)]
    pub routes: RoutesConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
pub const ENV_PREFIX: &str = "UV";

impl AppConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > config.toml > 默认值
    /// ENV 前缀：UV，分隔符：__
    /// 示例：UV__SERVER__PORT=9999
    pub fn load(path: Option<&Path>) -> Result<Self> {
        use config::{Config, Environment, File};

        let path = path.unwrap_or(Path::new(DEFAULT_CONFIG_PATH));

        let builder = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            );

        let settings = builder
            .build()
            .map_err(|e| UrlVaultError::config(format!("Failed to build config: {}", e)))?;

        let config = settings.try_deserialize::<AppConfig>().map_err(|e| {
            UrlVaultError::config(format!("Failed to deserialize config: {}", e))
        })?;

        if path.exists() {
            eprintln!("[INFO] Configuration loaded from: {}", path.display());
        }

        config.validate()?;
        Ok(config)
    }

    /// 启动前的一致性检查
    pub fn validate(&self) -> Result<()> {
        let length = self.links.default_code_length;
        if !(crate::services::code_generator::MIN_CODE_LENGTH
            ..=crate::services::code_generator::MAX_CODE_LENGTH)
            .contains(&length)
        {
            return Err(UrlVaultError::config(format!(
                "links.default_code_length must be between {} and {}, got {}",
                crate::services::code_generator::MIN_CODE_LENGTH,
                crate::services::code_generator::MAX_CODE_LENGTH,
                length
            )));
        }
        if self.links.max_collision_attempts == 0 {
            return Err(UrlVaultError::config(
                "links.max_collision_attempts must be at least 1",
            ));
        }
        if self.links.default_url_limit < 0 {
            return Err(UrlVaultError::config(
                "links.default_url_limit must not be negative",
            ));
        }
        if self.auth.access_token_minutes <= 0 {
            return Err(UrlVaultError::config(
                "auth.access_token_minutes must be positive",
            ));
        }
        Ok(())
    }

    /// Fills an empty `auth.jwt_secret` with a random value.
    ///
    /// Returns `true` when a secret was generated, so the caller can warn that
    /// sessions will not survive a restart.
    pub fn ensure_jwt_secret(&mut self) -> bool {
        if self.auth.jwt_secret.trim().is_empty() {
            self.auth.jwt_secret = crate::utils::generate_secure_token(32);
            true
        } else {
            false
        }
    }

    /// 保存配置到 TOML 文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| UrlVaultError::serialization(e.to_string()))?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default = "default_cpu_count")]
    pub cpu_count: usize,
}

/// 数据库连接配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_database_pool_size")]
    pub pool_size: u32,
    #[serde(default = "default_database_timeout")]
    pub timeout: u64,
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,
    #[serde(default = "default_retry_max_delay_ms")]
    pub retry_max_delay_ms: u64,
}

/// 会话认证配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HS256 签名密钥，留空则启动时随机生成
    #[serde(default)]
    pub jwt_secret: String,
    #[serde(default = "default_access_token_minutes")]
    pub access_token_minutes: i64,
}

/// 短链接分配策略
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinksConfig {
    #[serde(default = "default_code_length")]
    pub default_code_length: usize,
    #[serde(default = "default_max_collision_attempts")]
    pub max_collision_attempts: u32,
    #[serde(default = "default_url_limit")]
    pub default_url_limit: i64,
}

/// 路由配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutesConfig {
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,
    #[serde(default = "default_health_prefix")]
    pub health_prefix: String,
    #[serde(default = "default_root_url")]
    pub default_url: String,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default = "default_log_file")]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

// ============================================================
// Default value functions
// ============================================================

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_cpu_count() -> usize {
    num_cpus::get()
}

fn default_database_url() -> String {
    "urlvault.db".to_string()
}

fn default_database_pool_size() -> u32 {
    10
}

fn default_database_timeout() -> u64 {
    30
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_base_delay_ms() -> u64 {
    100
}

fn default_retry_max_delay_ms() -> u64 {
    2000
}

fn default_access_token_minutes() -> i64 {
    30
}

fn default_code_length() -> usize {
    10
}

fn default_max_collision_attempts() -> u32 {
    10
}

fn default_url_limit() -> i64 {
    20
}

fn default_api_prefix() -> String {
    "/api".to_string()
}

fn default_health_prefix() -> String {
    "/health".to_string()
}

fn default_root_url() -> String {
    "https://github.com/".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_log_file() -> Option<String> {
    None
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

// ============================================================
// Default implementations
// ============================================================

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            cpu_count: default_cpu_count(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            pool_size: default_database_pool_size(),
            timeout: default_database_timeout(),
            retry_count: default_retry_count(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
            retry_max_delay_ms: default_retry_max_delay_ms(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            access_token_minutes: default_access_token_minutes(),
        }
    }
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            default_code_length: default_code_length(),
            max_collision_attempts: default_max_collision_attempts(),
            default_url_limit: default_url_limit(),
        }
    }
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            api_prefix: default_api_prefix(),
            health_prefix: default_health_prefix(),
            default_url: default_root_url(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: default_log_file(),
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.auth.access_token_minutes, 30);
        assert_eq!(config.links.default_code_length, 10);
        assert_eq!(config.links.max_collision_attempts, 10);
        assert_eq!(config.links.default_url_limit, 20);
        assert_eq!(config.routes.api_prefix, "/api");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(
            &path,
            "[links]\ndefault_code_length = 12\ndefault_url_limit = 3\n\n[auth]\njwt_secret = \"s3cret\"\n",
        )
        .unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.links.default_code_length, 12);
        assert_eq!(config.links.default_url_limit, 3);
        assert_eq!(config.auth.jwt_secret, "s3cret");
        // untouched sections fall back to defaults
        assert_eq!(config.links.max_collision_attempts, 10);
    }

    #[test]
    fn test_load_rejects_out_of_range_length() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[links]\ndefault_code_length = 4\n").unwrap();

        let err = AppConfig::load(Some(&path)).unwrap_err();
        assert!(matches!(err, UrlVaultError::Config(_)));
    }

    #[test]
    fn test_ensure_jwt_secret() {
        let mut config = AppConfig::default();
        assert!(config.ensure_jwt_secret());
        assert!(!config.auth.jwt_secret.is_empty());

        let generated = config.auth.jwt_secret.clone();
        assert!(!config.ensure_jwt_secret());
        assert_eq!(config.auth.jwt_secret, generated);
    }

    #[test]
    fn test_default_config_serializes_to_toml() {
        let sample = toml::to_string_pretty(&AppConfig::default()).unwrap();
        assert!(sample.contains("[links]"));
        let parsed: AppConfig = toml::from_str(&sample).unwrap();
        assert_eq!(parsed.links.default_url_limit, 20);
    }

    #[test]
    fn test_save_to_file_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        AppConfig::default().save_to_file(&path).unwrap();
        assert!(path.exists());
    }
}
