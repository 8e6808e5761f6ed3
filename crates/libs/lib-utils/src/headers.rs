use http::{header, HeaderMap, HeaderName, HeaderValue};

use crate::str_concat;

/// Header definitions shared by the proxy and the MCP client
#[derive(Debug, Clone, Copy)]
pub enum HeaderKey {
    /// `authorization`, like `Bearer {token}`
    Authorization,
    /// `content-type`
    ContentType,
    /// `access-control-allow-origin`
    AllowOrigin,
    /// `access-control-allow-headers`
    AllowHeaders,
    /// `access-control-allow-methods`
    AllowMethods,
}

impl HeaderKey {
    #[inline]
    pub const fn name(self) -> HeaderName {
        match self {
            Self::Authorization => header::AUTHORIZATION,
            Self::ContentType => header::CONTENT_TYPE,
            Self::AllowOrigin => header::ACCESS_CONTROL_ALLOW_ORIGIN,
            Self::AllowHeaders => header::ACCESS_CONTROL_ALLOW_HEADERS,
            Self::AllowMethods => header::ACCESS_CONTROL_ALLOW_METHODS,
        }
    }

    #[inline]
    pub const fn default_value(self) -> &'static str {
        match self {
            Self::ContentType => "application/json",
            Self::AllowOrigin => "*",
            Self::AllowHeaders => "Content-Type, Authorization",
            Self::AllowMethods => "POST, OPTIONS",
            Self::Authorization => "",
        }
    }
}

/// The three permissive CORS headers every proxy response carries.
pub const CORS_HEADERS: [HeaderKey; 3] = [
    HeaderKey::AllowOrigin,
    HeaderKey::AllowHeaders,
    HeaderKey::AllowMethods,
];

/// Insert permissive CORS headers, replacing any existing values.
pub fn apply_cors(headers: &mut HeaderMap) {
    for key in CORS_HEADERS {
        headers.insert(key.name(), HeaderValue::from_static(key.default_value()));
    }
}

/// Insert `content-type: application/json`.
pub fn apply_json_content_type(headers: &mut HeaderMap) {
    headers.insert(
        HeaderKey::ContentType.name(),
        HeaderValue::from_static(HeaderKey::ContentType.default_value()),
    );
}

/// The `authorization` header as received, bytes untouched.
///
/// [`HeaderMap`] lookups are case-insensitive, so both `authorization` and
/// `Authorization` are found. Empty when absent.
pub fn authorization_of(headers: &HeaderMap) -> HeaderValue {
    headers
        .get(HeaderKey::Authorization.name())
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static(HeaderKey::Authorization.default_value()))
}

/// Build `Bearer {token}` header value.
pub fn bearer(token: &str) -> Result<HeaderValue, http::header::InvalidHeaderValue> {
    let mut value = HeaderValue::try_from(str_concat!("Bearer ", token))?;
    value.set_sensitive(true);
    Ok(value)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_apply_cors() {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("x"));
        apply_cors(&mut headers);

        assert_eq!(headers["access-control-allow-origin"], "*");
        assert_eq!(
            headers["access-control-allow-headers"],
            "Content-Type, Authorization"
        );
        assert_eq!(headers["access-control-allow-methods"], "POST, OPTIONS");
        assert_eq!(headers.get_all("access-control-allow-origin").iter().count(), 1);
    }

    #[test]
    fn test_authorization_of() {
        let mut headers = HeaderMap::new();
        assert_eq!(authorization_of(&headers), "");

        headers.insert(
            HeaderName::from_static("authorization"),
            HeaderValue::from_static("Bearer token-0123456789"),
        );
        assert_eq!(authorization_of(&headers), "Bearer token-0123456789");

        let raw = HeaderValue::from_bytes("Bearer tök€n-0123456789".as_bytes()).unwrap();
        headers.insert(header::AUTHORIZATION, raw.clone());
        assert_eq!(authorization_of(&headers), raw);
        assert_eq!(authorization_of(&headers).as_bytes(), "Bearer tök€n-0123456789".as_bytes());
    }

    #[test]
    fn test_bearer() {
        let value = bearer("abc").unwrap();
        assert_eq!(value, "Bearer abc");
        assert!(value.is_sensitive());
        assert!(bearer("bad\ntoken").is_err());
    }
}
