//! Configuration loading and resolution.

use bedrock_prompt_management::AwsSettings;

/// Environment variable holding the bearer token for the HTTP transport.
pub const TOKEN_ENV: &str = "BEDROCK_PROMPT_MCP_TOKEN";

/// Port used by the HTTP transport when none is given.
pub const DEFAULT_PORT: u16 = 8888;

/// Resolve AWS settings: CLI flags > `AWS_REGION` / `AWS_PROFILE`.
pub fn resolve_aws_settings(region: Option<&str>, profile: Option<&str>) -> AwsSettings {
    AwsSettings::resolve(region, profile)
}

/// Resolve the HTTP bearer token: CLI flag > env var.
pub fn resolve_token(explicit: Option<String>) -> Option<String> {
    explicit
        .or_else(|| std::env::var(TOKEN_ENV).ok())
        .filter(|t| !t.trim().is_empty())
}

/// Listen address for the HTTP transport.
pub fn bind_address(host: &str, port: u16) -> String {
    if host.contains(':') && !host.starts_with('[') {
        format!("[{host}]:{port}")
    } else {
        format!("{host}:{port}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_address() {
        assert_eq!(bind_address("127.0.0.1", DEFAULT_PORT), "127.0.0.1:8888");
        assert_eq!(bind_address("::1", 9999), "[::1]:9999");
    }

    #[test]
    fn test_explicit_token_wins() {
        assert_eq!(
            resolve_token(Some("secret".to_string())).as_deref(),
            Some("secret")
        );
    }
}
