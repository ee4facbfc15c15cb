//! Refresh-token cookie handling.
//!
//! The refresh token never appears in a response body. It travels in an
//! HttpOnly, SameSite=Strict cookie scoped to the auth routes.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use courtside_auth::jwt::encoder::IssuedToken;
use courtside_core::config::RefreshCookieConfig;

fn base(config: &RefreshCookieConfig, value: String) -> Cookie<'static> {
    Cookie::build((config.name.clone(), value))
        .http_only(true)
        .secure(config.secure)
        .same_site(SameSite::Strict)
        .path(config.path.clone())
        .build()
}

/// Store a freshly issued refresh token.
pub fn set_refresh(jar: CookieJar, config: &RefreshCookieConfig, token: &IssuedToken) -> CookieJar {
    let mut cookie = base(config, token.token.clone());
    cookie.set_max_age(time::Duration::days(config.max_age_days));
    jar.add(cookie)
}

/// Overwrite the cookie with an expired, empty one.
pub fn clear_refresh(jar: CookieJar, config: &RefreshCookieConfig) -> CookieJar {
    let mut cookie = base(config, String::new());
    cookie.make_removal();
    jar.add(cookie)
}

/// The raw refresh token sent by the client, if any.
pub fn read_refresh(jar: &CookieJar, config: &RefreshCookieConfig) -> Option<String> {
    jar.get(&config.name)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;
    use chrono::Utc;

    fn set_cookie_header(jar: CookieJar) -> String {
        let resp = jar.into_response();
        resp.headers()
            .get(axum::http::header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string()
    }

    #[test]
    fn refresh_cookie_attributes() {
        let config = RefreshCookieConfig::default();
        let token = IssuedToken {
            token: "abc.def.ghi".into(),
            expires_at: Utc::now(),
        };
        let header = set_cookie_header(set_refresh(CookieJar::new(), &config, &token));
        assert!(header.starts_with(&format!("{}=abc.def.ghi", config.name)));
        assert!(header.contains("HttpOnly"));
        assert!(header.contains("SameSite=Strict"));
        assert!(header.contains("Secure"));
        assert!(header.contains(&format!("Path={}", config.path)));
        assert!(header.contains(&format!("Max-Age={}", config.max_age_days * 86_400)));
    }

    #[test]
    fn clearing_expires_the_cookie() {
        let config = RefreshCookieConfig::default();
        let header = set_cookie_header(clear_refresh(CookieJar::new(), &config));
        assert!(header.starts_with(&format!("{}=;", config.name)));
        assert!(header.contains("Max-Age=0"));
    }
}
