//! Service endpoints

const DEFAULT_TASK_SERVICE_URL: &str = "http://localhost:8002";
const DEFAULT_AUTH_SERVICE_URL: &str = "http://localhost:8001";
const DEFAULT_NOTIFICATION_SERVICE_URL: &str = "http://localhost:8003";

/// Base URLs of the remote services
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub task_service_url: String,
    pub user_service_url: String,
    pub auth_service_url: String,
    pub notification_service_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            task_service_url: DEFAULT_TASK_SERVICE_URL.to_string(),
            user_service_url: DEFAULT_TASK_SERVICE_URL.to_string(),
            auth_service_url: DEFAULT_AUTH_SERVICE_URL.to_string(),
            notification_service_url: DEFAULT_NOTIFICATION_SERVICE_URL.to_string(),
        }
    }
}

fn env_url(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().trim_end_matches('/').to_string())
        .filter(|value| !value.is_empty())
}

impl ClientConfig {
    /// Every service behind one base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        let base = base_url.into().trim_end_matches('/').to_string();
        Self {
            task_service_url: base.clone(),
            user_service_url: base.clone(),
            auth_service_url: base.clone(),
            notification_service_url: base,
        }
    }

    /// Read `HM_*_SERVICE_URL` variables, falling back to the local defaults
    ///
    /// The user service defaults to the task service URL, which is where the
    /// task service exposes `/users`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let task_service_url = env_url("HM_TASK_SERVICE_URL").unwrap_or(defaults.task_service_url);
        Self {
            user_service_url: env_url("HM_USER_SERVICE_URL")
                .unwrap_or_else(|| task_service_url.clone()),
            auth_service_url: env_url("HM_AUTH_SERVICE_URL").unwrap_or(defaults.auth_service_url),
            notification_service_url: env_url("HM_NOTIFICATION_SERVICE_URL")
                .unwrap_or(defaults.notification_service_url),
            task_service_url,
        }
    }

    pub fn with_task_service_url(mut self, url: impl Into<String>) -> Self {
        self.task_service_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_user_service_url(mut self, url: impl Into<String>) -> Self {
        self.user_service_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_auth_service_url(mut self, url: impl Into<String>) -> Self {
        self.auth_service_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_notification_service_url(mut self, url: impl Into<String>) -> Self {
        self.notification_service_url = url.into().trim_end_matches('/').to_string();
        self
    }
}
