//! Redaction of tokens and URLs before they reach log fields.

const SENSITIVE_PARAMS: [&str; 7] = [
    "token",
    "access_token",
    "refresh_token",
    "client_secret",
    "code",
    "secret",
    "password",
];

/// Redact a token, keeping a short prefix so log lines can be correlated
pub fn redact_token(token: &str) -> String {
    if token.chars().count() <= 8 {
        "[REDACTED]".to_string()
    } else {
        let prefix: String = token.chars().take(8).collect();
        format!("{}...[REDACTED]", prefix)
    }
}

/// Redact a URL, hiding secrets carried in query parameters
pub fn redact_url(url: &str) -> String {
    match url.split_once('?') {
        Some((base, query)) => format!("{}?{}", base, redact_query(query)),
        None => url.to_string(),
    }
}

fn redact_query(query: &str) -> String {
    query
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((key, _))
                if SENSITIVE_PARAMS
                    .iter()
                    .any(|s| key.eq_ignore_ascii_case(s)) =>
            {
                format!("{}=[REDACTED]", key)
            }
            _ => pair.to_string(),
        })
        .collect::<Vec<_>>()
        .join("&")
}
