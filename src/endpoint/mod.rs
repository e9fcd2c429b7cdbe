//! Endpoint Resolution
//!
//! Maps the OAuth token-issuing authority of a credential bundle to the
//! regional base URL of each Zoho product API. The mapping is a literal
//! table; unknown authorities fall back to the US data center.

use std::fmt;

/// Header carrying the organization id for subscription-style endpoints.
pub const ORGANIZATION_HEADER: &str = "X-com-zoho-subscriptions-organizationid";

/// Zoho data center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Region {
    #[default]
    Us,
    Eu,
    Au,
    In,
    Cn,
}

/// Authority URL, API domain and top-level domain per region.
const REGIONS: [(Region, &str, &str, &str); 5] = [
    (
        Region::Us,
        "https://accounts.zoho.com/oauth/v2/token",
        "https://www.zohoapis.com",
        "com",
    ),
    (
        Region::Eu,
        "https://accounts.zoho.eu/oauth/v2/token",
        "https://www.zohoapis.eu",
        "eu",
    ),
    (
        Region::Au,
        "https://accounts.zoho.com.au/oauth/v2/token",
        "https://www.zohoapis.com.au",
        "com.au",
    ),
    (
        Region::In,
        "https://accounts.zoho.in/oauth/v2/token",
        "https://www.zohoapis.in",
        "in",
    ),
    (
        Region::Cn,
        "https://accounts.zoho.com.cn/oauth/v2/token",
        "https://www.zohoapis.com.cn",
        "com.cn",
    ),
];

impl Region {
    /// All supported regions.
    pub const ALL: [Region; 5] = [Region::Us, Region::Eu, Region::Au, Region::In, Region::Cn];

    /// Resolve the region from an authority URL, falling back to [`Region::Us`].
    pub fn from_authority_url(authority_url: &str) -> Self {
        let normalized = authority_url.trim().trim_end_matches('/');
        REGIONS
            .iter()
            .find(|(_, authority, _, _)| authority.eq_ignore_ascii_case(normalized))
            .map(|(region, _, _, _)| *region)
            .unwrap_or_default()
    }

    fn entry(&self) -> &'static (Region, &'static str, &'static str, &'static str) {
        // REGIONS lists every variant exactly once, in declaration order.
        &REGIONS[*self as usize]
    }

    /// Token endpoint of this region.
    pub fn authority_url(&self) -> &'static str {
        self.entry().1
    }

    /// `www.zohoapis.*` domain of this region.
    pub fn api_domain(&self) -> &'static str {
        self.entry().2
    }

    /// Top-level domain used by product-specific hosts.
    pub fn tld(&self) -> &'static str {
        self.entry().3
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Us => "us",
            Self::Eu => "eu",
            Self::Au => "au",
            Self::In => "in",
            Self::Cn => "cn",
        };
        f.write_str(name)
    }
}

/// Resolve the subscription (Billing) API base URL for an authority URL.
pub fn resolve_base_url(authority_url: &str) -> String {
    Product::Billing.base_url(Region::from_authority_url(authority_url), None)
}

/// Zoho product API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Product {
    /// CRM-lite.
    Bigin,
    /// Subscriptions and invoicing.
    Billing,
    Calendar,
    /// Task tracking.
    Projects,
}

impl Product {
    /// Base URL of the product API.
    ///
    /// Bigin is served from the `api_domain` returned with the access token
    /// when one is known; every other product is resolved from the region.
    pub fn base_url(&self, region: Region, api_domain: Option<&str>) -> String {
        match self {
            Self::Bigin => {
                let domain = api_domain
                    .map(|d| d.trim_end_matches('/'))
                    .filter(|d| !d.is_empty())
                    .unwrap_or_else(|| region.api_domain());
                format!("{}/bigin/v2", domain)
            }
            Self::Billing => format!("{}/billing/v1", region.api_domain()),
            Self::Calendar => format!("https://calendar.zoho.{}/api/v1", region.tld()),
            Self::Projects => format!("https://projectsapi.zoho.{}/restapi", region.tld()),
        }
    }

    /// Whether calls must carry [`ORGANIZATION_HEADER`].
    pub fn requires_organization(&self) -> bool {
        matches!(self, Self::Billing)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bigin => "bigin",
            Self::Billing => "billing",
            Self::Calendar => "calendar",
            Self::Projects => "projects",
        }
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Join a base URL and a path with exactly one slash between them.
pub fn join_url(base: &str, path: &str) -> String {
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        return base.trim_end_matches('/').to_string();
    }
    format!("{}/{}", base.trim_end_matches('/'), path)
}
