use crate::StoreError;
use secrecy::SecretString;

/// Where durable state lives.
#[derive(Clone, Debug)]
pub enum StoreBackend {
    /// Process-local maps; state is lost on restart.
    Memory,
    /// REST document store reached over HTTP.
    Http {
        base_url: String,
        api_key: SecretString,
    },
}

#[derive(Clone, Debug)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub max_retries: u32,
}

impl StoreConfig {
    pub fn from_env() -> Result<Self, StoreError> {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    /// Testable helper that reads configuration values using the provided
    /// function instead of the process environment.
    pub fn from_env_with<F>(mut get: F) -> Result<Self, StoreError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let max_retries = match get("MINDAIGLE_STORE_MAX_RETRIES") {
            Some(raw) => raw.trim().parse::<u32>().map_err(|_| {
                StoreError::Config(format!("MINDAIGLE_STORE_MAX_RETRIES is not a number: {raw}"))
            })?,
            None => 3,
        };

        let base_url = get("MINDAIGLE_STORE_URL").filter(|s| !s.trim().is_empty());
        let backend = match base_url {
            None => StoreBackend::Memory,
            Some(base_url) => {
                let api_key = get("MINDAIGLE_STORE_API_KEY")
                    .filter(|s| !s.trim().is_empty())
                    .ok_or_else(|| {
                        StoreError::Config(
                            "MINDAIGLE_STORE_API_KEY missing (required with MINDAIGLE_STORE_URL)"
                                .into(),
                        )
                    })?;
                StoreBackend::Http {
                    base_url,
                    api_key: SecretString::new(api_key.into()),
                }
            }
        };

        Ok(Self {
            backend,
            max_retries,
        })
    }
}
