use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    /// HMAC key shared with the payment gateway for callback signatures.
    pub payment_secret: String,
    pub db_max_connections: u32,
    pub mail_from: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET is not set"))?;
        let payment_secret = env::var("PAYMENT_SECRET")
            .map_err(|_| anyhow::anyhow!("PAYMENT_SECRET is not set"))?;
        let db_max_connections = env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);
        let mail_from =
            env::var("MAIL_FROM").unwrap_or_else(|_| "no-reply@foodspot.local".to_string());
        Ok(Self {
            port,
            database_url,
            host,
            jwt_secret,
            payment_secret,
            db_max_connections,
            mail_from,
        })
    }
}
