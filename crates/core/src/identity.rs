//! Keystone v2 token request and response
//!
//! The identity response is decoded once into typed structures with
//! optional fields and then validated into a [`TokenGrant`]. Absent
//! fields surface as [`AuthError::MissingField`].

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// Service catalog type of the object storage service
pub const OBJECT_STORE_TYPE: &str = "object-store";

/// Body of `POST /tokens`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthRequest {
    auth: AuthBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
struct AuthBody {
    tenant_name: String,
    password_credentials: PasswordCredentials,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct PasswordCredentials {
    username: String,
    password: String,
}

impl AuthRequest {
    pub fn new(username: &str, password: &str, tenant_name: &str) -> Self {
        Self {
            auth: AuthBody {
                tenant_name: tenant_name.to_string(),
                password_credentials: PasswordCredentials {
                    username: username.to_string(),
                    password: password.to_string(),
                },
            },
        }
    }

    pub fn username(&self) -> &str {
        &self.auth.password_credentials.username
    }
}

/// Decoded identity response, before validation
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AuthResponse {
    pub access: Option<Access>,
    pub error: Option<ErrorEnvelope>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Access {
    pub token: Option<Token>,
    #[serde(rename = "serviceCatalog")]
    pub service_catalog: Option<Vec<CatalogEntry>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Token {
    pub id: Option<String>,
    pub expires: Option<String>,
    pub tenant: Option<Tenant>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Tenant {
    pub id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CatalogEntry {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub endpoints: Vec<Endpoint>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Endpoint {
    #[serde(rename = "publicURL")]
    pub public_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub code: u16,
    #[serde(default)]
    pub message: String,
}

/// A validated token with its storage endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenGrant {
    pub token: String,
    pub expires: Timestamp,
    pub tenant_id: String,
    pub endpoint_url: String,
}

impl AuthResponse {
    /// Validate the response into a [`TokenGrant`]
    ///
    /// The endpoint is the first `publicURL` of the first catalog entry
    /// whose type is `object-store`.
    pub fn into_grant(self) -> Result<TokenGrant, AuthError> {
        if let Some(error) = self.error {
            return Err(AuthError::Rejected {
                title: error.title,
                code: error.code,
                message: error.message,
            });
        }

        let access = self.access.ok_or(AuthError::MissingField("access"))?;
        let token = access.token.ok_or(AuthError::MissingField("token"))?;
        let catalog = access
            .service_catalog
            .ok_or(AuthError::MissingField("serviceCatalog"))?;

        let id = token.id.ok_or(AuthError::MissingField("id"))?;
        let expires = token.expires.ok_or(AuthError::MissingField("expires"))?;
        let expires: Timestamp = expires
            .parse()
            .map_err(|_| AuthError::InvalidExpiry(expires.clone()))?;
        let tenant_id = token
            .tenant
            .and_then(|t| t.id)
            .ok_or(AuthError::MissingField("tenant"))?;

        let entry = catalog
            .into_iter()
            .find(|entry| entry.kind == OBJECT_STORE_TYPE)
            .ok_or(AuthError::NoObjectStore)?;
        let endpoint_url = entry
            .endpoints
            .into_iter()
            .next()
            .and_then(|e| e.public_url)
            .ok_or(AuthError::MissingField("publicURL"))?;

        Ok(TokenGrant {
            token: id,
            expires,
            tenant_id,
            endpoint_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSE: &str = r#"{
        "access": {
            "token": {
                "issued_at": "2015-05-19T07:08:21.927295",
                "expires": "2015-05-20T07:08:21Z",
                "id": "0123456789abcdef",
                "tenant": {"id": "tenant-1", "name": "gnct0001", "enabled": true}
            },
            "serviceCatalog": [
                {
                    "type": "compute",
                    "name": "Compute Service",
                    "endpoints": [{"publicURL": "https://compute.example.com/v2/tenant-1"}]
                },
                {
                    "type": "object-store",
                    "name": "Object Storage Service",
                    "endpoints": [
                        {"region": "tyo1", "publicURL": "https://object.example.com/v1/nc_tenant-1"},
                        {"region": "tyo2", "publicURL": "https://object2.example.com/v1/nc_tenant-1"}
                    ]
                }
            ],
            "user": {"username": "gncu0001"}
        }
    }"#;

    fn parse(json: &str) -> AuthResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_request_body() {
        let request = AuthRequest::new("user", "pass", "tenant");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "auth": {
                    "tenantName": "tenant",
                    "passwordCredentials": {"username": "user", "password": "pass"}
                }
            })
        );
        assert_eq!(request.username(), "user");
    }

    #[test]
    fn test_grant_selects_object_store() {
        let grant = parse(RESPONSE).into_grant().unwrap();
        assert_eq!(grant.token, "0123456789abcdef");
        assert_eq!(grant.tenant_id, "tenant-1");
        assert_eq!(grant.endpoint_url, "https://object.example.com/v1/nc_tenant-1");
        assert_eq!(grant.expires.to_string(), "2015-05-20T07:08:21Z");
    }

    #[test]
    fn test_grant_normalizes_expiry_to_utc() {
        let json = RESPONSE.replace("2015-05-20T07:08:21Z", "2015-05-20T16:08:21+09:00");
        let grant = parse(&json).into_grant().unwrap();
        assert_eq!(grant.expires.to_string(), "2015-05-20T07:08:21Z");
    }

    #[test]
    fn test_error_envelope() {
        let json = r#"{"error": {"message": "Invalid user / password", "code": 401, "title": "Unauthorized"}}"#;
        let err = parse(json).into_grant().unwrap_err();
        assert_eq!(
            err,
            AuthError::Rejected {
                title: "Unauthorized".into(),
                code: 401,
                message: "Invalid user / password".into()
            }
        );
    }

    #[test]
    fn test_missing_access() {
        let err = parse("{}").into_grant().unwrap_err();
        assert_eq!(err, AuthError::MissingField("access"));
    }

    #[test]
    fn test_missing_token() {
        let err = parse(r#"{"access": {"serviceCatalog": []}}"#)
            .into_grant()
            .unwrap_err();
        assert_eq!(err, AuthError::MissingField("token"));
    }

    #[test]
    fn test_missing_service_catalog() {
        let json = r#"{"access": {"token": {"id": "t", "expires": "2030-01-01T00:00:00Z", "tenant": {"id": "x"}}}}"#;
        let err = parse(json).into_grant().unwrap_err();
        assert_eq!(err, AuthError::MissingField("serviceCatalog"));
    }

    #[test]
    fn test_missing_public_url() {
        let json = r#"{"access": {
            "token": {"id": "t", "expires": "2030-01-01T00:00:00Z", "tenant": {"id": "x"}},
            "serviceCatalog": [{"type": "object-store", "endpoints": [{"internalURL": "http://10.0.0.1"}]}]
        }}"#;
        let err = parse(json).into_grant().unwrap_err();
        assert_eq!(err, AuthError::MissingField("publicURL"));
    }

    #[test]
    fn test_no_object_store_entry() {
        let json = r#"{"access": {
            "token": {"id": "t", "expires": "2030-01-01T00:00:00Z", "tenant": {"id": "x"}},
            "serviceCatalog": [{"type": "compute", "endpoints": [{"publicURL": "https://c"}]}]
        }}"#;
        let err = parse(json).into_grant().unwrap_err();
        assert_eq!(err, AuthError::NoObjectStore);
    }

    #[test]
    fn test_invalid_expiry() {
        let json = RESPONSE.replace("2015-05-20T07:08:21Z", "tomorrow");
        let err = parse(&json).into_grant().unwrap_err();
        assert_eq!(err, AuthError::InvalidExpiry("tomorrow".into()));
    }
}
