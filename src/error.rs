use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DashboardError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limit exceeded or forbidden: {0}")]
    RateLimitedOrForbidden(String),

    #[error("Request failed with status {status}: {detail}")]
    RequestFailed { status: u16, detail: String },

    #[error("Network unavailable: {0}")]
    NetworkUnavailable(String),

    #[error("Invalid organization name: {0:?}")]
    InvalidOrganization(String),
}

impl DashboardError {
    /// Text shown to the user next to the retry action.
    pub fn user_message(&self) -> String {
        match self {
            DashboardError::NotFound(_) => "Organization not found".to_string(),
            DashboardError::RateLimitedOrForbidden(_) => {
                "Rate limit exceeded or forbidden. Please check your token or try again later."
                    .to_string()
            }
            DashboardError::RequestFailed { status, detail } => {
                format!("Failed to fetch data ({}): {}", status, detail)
            }
            DashboardError::NetworkUnavailable(_) => {
                "Network unavailable. Check your connection and retry.".to_string()
            }
            DashboardError::InvalidOrganization(_) => {
                "Please enter an organization name".to_string()
            }
        }
    }

    pub fn is_retryable(&self) -> bool {
        !matches!(self, DashboardError::InvalidOrganization(_))
    }
}

impl From<reqwest::Error> for DashboardError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() || err.is_request() {
            return DashboardError::NetworkUnavailable(err.to_string());
        }

        DashboardError::RequestFailed {
            status: err.status().map(|s| s.as_u16()).unwrap_or(0),
            detail: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
