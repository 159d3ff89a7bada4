use std::env;

use crate::error::HarnessError;

#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Host of a live service to verify. `None` means the suites run against
    /// an in-process stub.
    pub base_url: Option<String>,
    pub log_level: String,
    pub stub_port: u16,
}

impl HarnessConfig {
    pub fn from_env() -> Result<Self, HarnessError> {
        let _ = dotenvy::dotenv();

        Ok(Self {
            base_url: env::var("DISPATCH_BASE_URL")
                .ok()
                .map(|raw| raw.trim().trim_end_matches('/').to_string())
                .filter(|raw| !raw.is_empty()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            stub_port: parse_or_default("STUB_PORT", 8080)?,
        })
    }
}

fn parse_or_default<T>(key: &str, default: T) -> Result<T, HarnessError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|err| HarnessError::Config(format!("invalid {key}: {err}"))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::parse_or_default;

    #[test]
    fn missing_variable_falls_back_to_default() {
        let port: u16 = parse_or_default("DISPATCH_CONTRACT_UNSET_PORT", 4321).unwrap();
        assert_eq!(port, 4321);
    }
}
