//! Shared User-Agent string for fetch traffic.
//!
//! Single source for the UA format so all outbound requests identify the tool
//! consistently (good citizenship; RFC 9308).

/// Default User-Agent for image fetch requests (identifies the tool).
#[must_use]
pub(crate) fn default_fetch_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("imgspider/{version} (bulk-image-harvester)")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ua_contains_crate_version() {
        let ua = default_fetch_user_agent();
        assert_eq!(
            env!("CARGO_PKG_VERSION"),
            ua.strip_prefix("imgspider/")
                .and_then(|s| s.split(' ').next())
                .expect("UA has version"),
            "fetch UA must contain crate version"
        );
    }
}
