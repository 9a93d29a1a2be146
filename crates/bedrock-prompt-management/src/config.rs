//! AWS connection settings and their resolution from the environment.

/// Environment variable holding the AWS region.
pub const REGION_ENV: &str = "AWS_REGION";
/// Environment variable holding the named credential profile.
pub const PROFILE_ENV: &str = "AWS_PROFILE";
/// Environment variable overriding the `bedrock-agent` endpoint URL.
pub const ENDPOINT_ENV: &str = "BEDROCK_AGENT_ENDPOINT";

/// Region used when neither the caller, the environment, nor the SDK chain names one.
pub const FALLBACK_REGION: &str = "us-east-1";

/// Where and as whom to call the prompt management service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AwsSettings {
    pub region: Option<String>,
    pub profile: Option<String>,
    pub endpoint: Option<String>,
}

impl AwsSettings {
    /// Resolve settings: explicit values win, then environment variables.
    pub fn resolve(region: Option<&str>, profile: Option<&str>) -> Self {
        Self::resolve_with(region, profile, |key| std::env::var(key).ok())
    }

    /// Same as [`AwsSettings::resolve`], reading variables through `lookup`.
    pub fn resolve_with<F>(region: Option<&str>, profile: Option<&str>, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let pick = |explicit: Option<&str>, key: &str| {
            explicit
                .map(str::to_string)
                .or_else(|| lookup(key))
                .filter(|v| !v.trim().is_empty())
        };

        Self {
            region: pick(region, REGION_ENV),
            profile: pick(profile, PROFILE_ENV),
            endpoint: pick(None, ENDPOINT_ENV),
        }
    }

    /// Default service endpoint for a region.
    pub fn endpoint_for(region: &str) -> String {
        format!("https://bedrock-agent.{region}.amazonaws.com")
    }
}
