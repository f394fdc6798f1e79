use serde::Serialize;
use std::net::IpAddr;

/// What a caller presented.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    /// Token from `Authorization: Bearer <token>`.
    pub bearer: Option<String>,
    /// Value of the `X-API-Key` header.
    pub api_key: Option<String>,
    pub source_ip: Option<IpAddr>,
}

impl Credentials {
    /// Build from raw header values. The scheme match is case-insensitive.
    pub fn from_headers(authorization: Option<&str>, api_key: Option<&str>) -> Self {
        let bearer = authorization.and_then(|value| {
            let (scheme, token) = value.split_once(' ')?;
            scheme
                .eq_ignore_ascii_case("bearer")
                .then(|| token.trim().to_string())
        });
        Self {
            bearer,
            api_key: api_key.map(|key| key.trim().to_string()),
            source_ip: None,
        }
    }

    pub fn with_source_ip(mut self, ip: IpAddr) -> Self {
        self.source_ip = Some(ip);
        self
    }

    /// The presented secret; the bearer token wins over `X-API-Key`.
    pub fn secret(&self) -> Option<&str> {
        self.bearer
            .as_deref()
            .or(self.api_key.as_deref())
            .filter(|secret| !secret.is_empty())
    }
}

/// An admitted caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Publisher {
    pub id: String,
    pub method: &'static str,
}

impl Publisher {
    pub fn anonymous() -> Self {
        Self {
            id: "anonymous".to_string(),
            method: "none",
        }
    }
}
