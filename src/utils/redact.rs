// src/utils/redact.rs

use url::Url;

/// Connection string safe to show in health checks: password and query removed.
pub fn redact_connection_url(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(mut url) => {
            // Only fails for URLs that cannot carry credentials at all.
            let _ = url.set_password(None);
            url.set_query(None);
            url.to_string()
        }
        Err(_) => "unparseable connection url".to_string(),
    }
}
