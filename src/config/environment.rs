//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.

use std::env;

use anyhow::{anyhow, Context, Result};

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub jwt_secret: String,
    /// Vida del token en segundos
    pub jwt_expiration: u64,
    pub cors_origins: Vec<String>,
    pub upload_dir: String,
    pub max_upload_size: usize,
}

impl EnvironmentConfig {
    /// Leer la configuración desde las variables de entorno
    pub fn from_env() -> Result<Self> {
        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow!("JWT_SECRET must be set"))?;
        if jwt_secret.trim().is_empty() {
            return Err(anyhow!("JWT_SECRET must not be empty"));
        }

        let port = env::var("PORT")
            .unwrap_or_else(|_| "3001".to_string())
            .parse()
            .context("PORT must be a valid number")?;

        let jwt_expiration = parse_expiration(
            &env::var("JWT_EXPIRES_IN").unwrap_or_else(|_| "7d".to_string()),
        )?;

        let max_upload_size = env::var("MAX_UPLOAD_SIZE")
            .unwrap_or_else(|_| "10485760".to_string())
            .parse()
            .context("MAX_UPLOAD_SIZE must be a valid number")?;

        Ok(Self {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            port,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            jwt_secret,
            jwt_expiration,
            cors_origins: parse_origins(
                &env::var("CORS_ORIGIN").unwrap_or_else(|_| "http://localhost:4200".to_string()),
            ),
            upload_dir: env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string()),
            max_upload_size,
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Obtener la dirección de escucha del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Convertir `7d`, `12h`, `30m`, `45s` o un número de segundos a segundos
pub fn parse_expiration(value: &str) -> Result<u64> {
    let value = value.trim();
    if value.is_empty() {
        return Err(anyhow!("JWT_EXPIRES_IN must not be empty"));
    }

    let (digits, multiplier) = match value.chars().last() {
        Some('d') => (&value[..value.len() - 1], 86_400),
        Some('h') => (&value[..value.len() - 1], 3_600),
        Some('m') => (&value[..value.len() - 1], 60),
        Some('s') => (&value[..value.len() - 1], 1),
        _ => (value, 1),
    };

    let amount: u64 = digits
        .parse()
        .with_context(|| format!("Invalid JWT_EXPIRES_IN value '{}'", value))?;

    Ok(amount * multiplier)
}

fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_expiration_units() {
        assert_eq!(parse_expiration("7d").unwrap(), 604_800);
        assert_eq!(parse_expiration("12h").unwrap(), 43_200);
        assert_eq!(parse_expiration("30m").unwrap(), 1_800);
        assert_eq!(parse_expiration("45s").unwrap(), 45);
        assert_eq!(parse_expiration("3600").unwrap(), 3_600);
    }

    #[test]
    fn test_parse_expiration_rejects_garbage() {
        assert!(parse_expiration("").is_err());
        assert!(parse_expiration("d").is_err());
        assert!(parse_expiration("sevend").is_err());
    }

    #[test]
    fn test_parse_origins() {
        let origins = parse_origins("http://localhost:4200, https://erp.example.com,");
        assert_eq!(origins, vec!["http://localhost:4200", "https://erp.example.com"]);
    }
}
