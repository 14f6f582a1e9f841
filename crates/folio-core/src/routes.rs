//! Public route layout shared by the gating layer and the HTTP handlers.

/// Upload endpoint; the only path in the `UPLOAD` rate-limit category.
pub const UPLOAD_PATH: &str = "/api/v1/resume/upload";

/// Every path under this prefix is rate limited.
pub const API_PREFIX: &str = "/api/";

/// Prefix of the public download route.
pub const PORTFOLIOS_PREFIX: &str = "/api/v1/portfolios/";

/// Suffix of the public download route.
pub const DOWNLOAD_SUFFIX: &str = "/download";

/// Liveness probe.
pub const HEALTH_PATH: &str = "/health";

/// Public URL under which a portfolio is viewed.
pub fn portfolio_url(base_url: &str, id: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), id)
}

/// Public URL from which a portfolio is downloaded as an attachment.
pub fn download_url(base_url: &str, id: &str) -> String {
    format!(
        "{}{}{}{}",
        base_url.trim_end_matches('/'),
        PORTFOLIOS_PREFIX,
        id,
        DOWNLOAD_SUFFIX
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_ignore_trailing_slash() {
        assert_eq!(
            portfolio_url("http://localhost:8080/", "abcde"),
            "http://localhost:8080/abcde"
        );
        assert_eq!(
            download_url("http://localhost:8080", "abcde"),
            "http://localhost:8080/api/v1/portfolios/abcde/download"
        );
    }
}
