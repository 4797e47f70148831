use tracing::{debug, error};

use crate::core::USER_AGENT;
use crate::data::{Credentials, Method, Session};
use crate::effects::http::{HttpClient, HttpRequest};
use crate::error::{Error, Result};

pub const AUTH_USER_HEADER: &str = "X-Auth-User";
pub const AUTH_KEY_HEADER: &str = "X-Auth-Key";
pub const STORAGE_URL_HEADER: &str = "X-Storage-Url";
pub const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";

/// Performs the v1 handshake: `GET {base_url}{auth_path}` with the user and
/// key in headers, answered by a storage URL and a token in headers.
pub struct AuthClient<'a, C: HttpClient> {
    http: &'a C,
}

impl<'a, C: HttpClient> AuthClient<'a, C> {
    pub fn new(http: &'a C) -> Self { Self { http } }

    pub async fn authenticate(&self, credentials: &Credentials) -> Result<Session> {
        let url = credentials.auth_url();
        let request = HttpRequest {
            method:  Method::Get,
            url:     url.clone(),
            headers: vec![
                ("User-Agent".to_string(), USER_AGENT.to_string()),
                (AUTH_USER_HEADER.to_string(), credentials.user.clone()),
                (AUTH_KEY_HEADER.to_string(), credentials.pass.clone()),
            ],
            body:    None,
        };

        let response = self.http.send(request).await.map_err(|e| {
            error!(%url, error = %e, "authentication request failed");
            Error::Authentication {
                url:    url.clone(),
                status: None,
                reason: e.to_string(),
            }
        })?;

        if !response.is_success() {
            error!(%url, status = response.status, "could not authenticate");
            return Err(Error::Authentication {
                url,
                status: Some(response.status),
                reason: format!("unexpected status {}", response.status),
            });
        }

        let missing = |header: &str| Error::Authentication {
            url:    url.clone(),
            status: Some(response.status),
            reason: format!("response carries no {header} header"),
        };
        let storage_url = response
            .header(STORAGE_URL_HEADER)
            .ok_or_else(|| missing(STORAGE_URL_HEADER))?
            .to_string();
        let token = response
            .header(AUTH_TOKEN_HEADER)
            .ok_or_else(|| missing(AUTH_TOKEN_HEADER))?
            .to_string();

        debug!(%storage_url, "authenticated");
        Ok(Session::new(token, storage_url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::testing::{StubHttp, StubResponse};
    use crate::error::ErrorKind;

    fn credentials() -> Credentials { Credentials::new("tester", "secret", "http://auth.local") }

    #[tokio::test]
    async fn test_session_comes_from_response_headers() {
        let http = StubHttp::new().respond(
            StubResponse::new(204)
                .header("X-Storage-Url", "http://store.local/v1/AUTH_tester")
                .header("X-Auth-Token", "AUTH_tk1"),
        );

        let session = AuthClient::new(&http)
            .authenticate(&credentials())
            .await
            .unwrap();

        assert_eq!(session.token, "AUTH_tk1");
        assert_eq!(session.storage_url, "http://store.local/v1/AUTH_tester");
        assert_eq!(session.account, "");

        let sent = &http.requests()[0];
        assert_eq!(sent.method, Method::Get);
        assert_eq!(sent.url, "http://auth.local/auth/1.0");
        assert!(sent.headers.contains(&("X-Auth-User".into(), "tester".into())));
        assert!(sent.headers.contains(&("X-Auth-Key".into(), "secret".into())));
    }

    #[tokio::test]
    async fn test_non_2xx_fails() {
        let http = StubHttp::new().respond(StubResponse::new(401));

        let err = AuthClient::new(&http)
            .authenticate(&credentials())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Authentication);
        assert!(matches!(err, Error::Authentication { status: Some(401), .. }));
    }

    #[tokio::test]
    async fn test_transport_failure_is_authentication_error() {
        let http = StubHttp::new().refuse("connection refused");

        let err = AuthClient::new(&http)
            .authenticate(&credentials())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Authentication { status: None, .. }));
    }

    #[tokio::test]
    async fn test_missing_token_header_fails() {
        let http = StubHttp::new()
            .respond(StubResponse::new(200).header("X-Storage-Url", "http://store.local"));

        let err = AuthClient::new(&http)
            .authenticate(&credentials())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Authentication);
        assert!(err.to_string().contains("X-Auth-Token"));
    }
}
