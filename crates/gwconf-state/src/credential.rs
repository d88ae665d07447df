// SPDX-FileCopyrightText: 2026 gwconf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed consumer credentials built from secret payloads.
//!
//! A secret holds opaque byte values plus a `kongCredType` discriminator.
//! [`CredentialFields::from_secret_data`] normalizes the raw values, and
//! [`Credential::from_secret`] selects the variant for the discriminator and
//! decodes the fields into that variant's typed shape.

use std::collections::BTreeMap;
use std::str::FromStr;

use gwconf_core::Secret;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;
use tracing::error;

use crate::entities::REDACTED;

/// Secret key holding the credential kind.
pub const CREDENTIAL_TYPE_KEY: &str = "kongCredType";

const HASH_SECRET_KEY: &str = "hash_secret";
const REDIRECT_URIS_KEY: &str = "redirect_uris";

/// Supported credential kinds.
///
/// Each kind also accepts the legacy entity name it was once published under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
pub enum CredentialKind {
    #[strum(to_string = "key-auth", serialize = "keyauth_credential")]
    KeyAuth,
    #[strum(to_string = "basic-auth", serialize = "basicauth_credential")]
    BasicAuth,
    #[strum(to_string = "hmac-auth", serialize = "hmacauth_credential")]
    HmacAuth,
    #[strum(to_string = "jwt", serialize = "jwt_secret")]
    Jwt,
    #[strum(to_string = "oauth2", serialize = "oauth2_credential")]
    Oauth2,
    #[strum(to_string = "acl")]
    Acl,
    #[strum(to_string = "mtls-auth")]
    MtlsAuth,
}

/// Why a secret could not become a credential.
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("missing `kongCredType` field")]
    MissingKind,

    #[error("`kongCredType` must be a string")]
    KindNotString,

    #[error("unsupported credential type `{0}`")]
    Unsupported(String),

    #[error("empty secret: no fields besides `kongCredType`")]
    Empty,

    #[error("secret field `{field}` is not valid UTF-8")]
    NotUtf8 { field: String },

    #[error("malformed {kind} credential: {source}")]
    Malformed {
        kind: CredentialKind,
        source: serde_json::Error,
    },
}

/// A normalized secret value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Bool(bool),
    List(Vec<String>),
}

/// Secret values after normalization, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialFields(BTreeMap<String, FieldValue>);

impl CredentialFields {
    /// Normalize raw secret values.
    ///
    /// Values are strings by default. `hash_secret` becomes a boolean (false
    /// when unparseable, which is logged). `redirect_uris` is split on commas;
    /// an empty value yields a single empty entry. Values must be UTF-8.
    pub fn from_secret_data(data: &BTreeMap<String, Vec<u8>>) -> Result<Self, CredentialError> {
        let mut fields = BTreeMap::new();
        for (key, raw) in data {
            let text = String::from_utf8(raw.clone())
                .map_err(|_| CredentialError::NotUtf8 { field: key.clone() })?;
            let value = match key.as_str() {
                REDIRECT_URIS_KEY => FieldValue::List(text.split(',').map(str::to_string).collect()),
                HASH_SECRET_KEY => match parse_bool(&text) {
                    Some(b) => FieldValue::Bool(b),
                    None => {
                        error!(value = %text, "failed to parse hash_secret as bool, defaulting to false");
                        FieldValue::Bool(false)
                    }
                },
                _ => FieldValue::String(text),
            };
            fields.insert(key.clone(), value);
        }
        Ok(Self(fields))
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.0.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<FieldValue> {
        self.0.remove(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    fn into_json(self) -> serde_json::Value {
        serde_json::Value::Object(
            self.0
                .into_iter()
                .map(|(k, v)| {
                    let v = match v {
                        FieldValue::String(s) => serde_json::Value::String(s),
                        FieldValue::Bool(b) => serde_json::Value::Bool(b),
                        FieldValue::List(l) => {
                            serde_json::Value::Array(l.into_iter().map(serde_json::Value::String).collect())
                        }
                    };
                    (k, v)
                })
                .collect(),
        )
    }
}

/// Boolean parsing with the accepted spellings of `1/t/true` and `0/f/false`.
fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyAuth {
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HmacAuth {
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Jwt {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rsa_public_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Oauth2 {
    pub name: String,
    pub client_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    #[serde(default)]
    pub redirect_uris: Vec<String>,
    #[serde(default)]
    pub hash_secret: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acl {
    pub group: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MtlsAuth {
    pub subject_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_certificate: Option<String>,
}

/// A consumer credential, one variant per supported kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Credential {
    #[serde(rename = "key-auth")]
    KeyAuth(KeyAuth),
    #[serde(rename = "basic-auth")]
    BasicAuth(BasicAuth),
    #[serde(rename = "hmac-auth")]
    HmacAuth(HmacAuth),
    #[serde(rename = "jwt")]
    Jwt(Jwt),
    #[serde(rename = "oauth2")]
    Oauth2(Oauth2),
    #[serde(rename = "acl")]
    Acl(Acl),
    #[serde(rename = "mtls-auth")]
    MtlsAuth(MtlsAuth),
}

impl Credential {
    /// Build a credential from a secret's raw data.
    pub fn from_secret(secret: &Secret) -> Result<Self, CredentialError> {
        Self::from_fields(CredentialFields::from_secret_data(&secret.data)?)
    }

    /// Select the variant named by the discriminator and decode the rest.
    pub fn from_fields(mut fields: CredentialFields) -> Result<Self, CredentialError> {
        let kind = match fields.remove(CREDENTIAL_TYPE_KEY) {
            None => return Err(CredentialError::MissingKind),
            Some(FieldValue::String(s)) => {
                CredentialKind::from_str(&s).map_err(|_| CredentialError::Unsupported(s))?
            }
            Some(_) => return Err(CredentialError::KindNotString),
        };
        if fields.is_empty() {
            return Err(CredentialError::Empty);
        }
        Self::decode(kind, fields)
    }

    fn decode(kind: CredentialKind, fields: CredentialFields) -> Result<Self, CredentialError> {
        let value = fields.into_json();
        let malformed = |source| CredentialError::Malformed { kind, source };
        let credential = match kind {
            CredentialKind::KeyAuth => Credential::KeyAuth(serde_json::from_value(value).map_err(malformed)?),
            CredentialKind::BasicAuth => Credential::BasicAuth(serde_json::from_value(value).map_err(malformed)?),
            CredentialKind::HmacAuth => Credential::HmacAuth(serde_json::from_value(value).map_err(malformed)?),
            CredentialKind::Jwt => Credential::Jwt(serde_json::from_value(value).map_err(malformed)?),
            CredentialKind::Oauth2 => Credential::Oauth2(serde_json::from_value(value).map_err(malformed)?),
            CredentialKind::Acl => Credential::Acl(serde_json::from_value(value).map_err(malformed)?),
            CredentialKind::MtlsAuth => Credential::MtlsAuth(serde_json::from_value(value).map_err(malformed)?),
        };
        Ok(credential)
    }

    pub fn kind(&self) -> CredentialKind {
        match self {
            Credential::KeyAuth(_) => CredentialKind::KeyAuth,
            Credential::BasicAuth(_) => CredentialKind::BasicAuth,
            Credential::HmacAuth(_) => CredentialKind::HmacAuth,
            Credential::Jwt(_) => CredentialKind::Jwt,
            Credential::Oauth2(_) => CredentialKind::Oauth2,
            Credential::Acl(_) => CredentialKind::Acl,
            Credential::MtlsAuth(_) => CredentialKind::MtlsAuth,
        }
    }

    /// Deep copy with secret material replaced by the redaction placeholder.
    pub fn sanitized_copy(&self) -> Self {
        let redacted = || REDACTED.to_string();
        match self {
            Credential::KeyAuth(_) => Credential::KeyAuth(KeyAuth { key: redacted() }),
            Credential::BasicAuth(c) => Credential::BasicAuth(BasicAuth {
                username: c.username.clone(),
                password: redacted(),
            }),
            Credential::HmacAuth(c) => Credential::HmacAuth(HmacAuth {
                username: c.username.clone(),
                secret: c.secret.as_ref().map(|_| redacted()),
            }),
            Credential::Jwt(c) => Credential::Jwt(Jwt {
                key: c.key.clone(),
                algorithm: c.algorithm.clone(),
                rsa_public_key: c.rsa_public_key.clone(),
                secret: c.secret.as_ref().map(|_| redacted()),
            }),
            Credential::Oauth2(c) => Credential::Oauth2(Oauth2 {
                client_secret: c.client_secret.as_ref().map(|_| redacted()),
                ..c.clone()
            }),
            Credential::Acl(c) => Credential::Acl(c.clone()),
            Credential::MtlsAuth(c) => Credential::MtlsAuth(c.clone()),
        }
    }
}
