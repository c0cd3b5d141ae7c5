use serde::{Deserialize, Serialize};

pub const API_KEY_ENV: &str = "GOOGLE_DRIVE_API_KEY";
pub const ROOT_FOLDER_ENV: &str = "GOOGLE_DRIVE_FOLDER_ID";

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub root_folder_id: Option<String>,
    pub api_base_url: String,
    pub page_size: u32,
    pub request_timeout_seconds: u64,
    /// Freshness window for folder listings, 0 disables the response cache
    pub cache_ttl_seconds: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            root_folder_id: None,
            api_base_url: "https://www.googleapis.com/drive/v3".to_string(),
            page_size: 1000,
            request_timeout_seconds: 30,
            cache_ttl_seconds: 300,
        }
    }
}

impl StoreConfig {
    /// API key from the config file, falling back to the environment.
    pub fn resolved_api_key(&self) -> Option<String> {
        resolve(self.api_key.as_deref(), API_KEY_ENV)
    }

    pub fn resolved_root_folder_id(&self) -> Option<String> {
        resolve(self.root_folder_id.as_deref(), ROOT_FOLDER_ENV)
    }
}

fn resolve(configured: Option<&str>, env_var: &str) -> Option<String> {
    configured
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .or_else(|| {
            std::env::var(env_var)
                .ok()
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        })
}
