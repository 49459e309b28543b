//! Azure storage connection string parsing

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use blobgate_core::StoreError;

/// Well-known Azurite/emulator account name.
const DEV_ACCOUNT: &str = "devstoreaccount1";

/// Well-known Azurite/emulator account key (published by Microsoft).
const DEV_ACCOUNT_KEY: &str =
    "Eby8vdM02xNOcqFlqUwJPLlmEtlCDXJ1OUzFT50uSRZ6IFsuFq2UVErCz4I6tq/K1SZFPTOtr/KBHBeksoGMGw==";

/// Parsed Azure storage connection string.
///
/// Supports the standard `Key=Value;...` format with `AccountName`,
/// `AccountKey`, `DefaultEndpointsProtocol`, `EndpointSuffix` and
/// `BlobEndpoint`, plus the `UseDevelopmentStorage=true` shorthand for
/// the local emulator.
#[derive(Debug, Clone)]
pub struct ConnectionString {
    /// Storage account name (used in the Shared Key signature).
    pub account: String,
    /// Decoded account key bytes for HMAC signing.
    pub key_bytes: Vec<u8>,
    /// Blob service endpoint, no trailing slash.
    pub blob_endpoint: String,
}

impl ConnectionString {
    pub fn parse(raw: &str) -> Result<Self, StoreError> {
        let mut account: Option<String> = None;
        let mut key: Option<String> = None;
        let mut protocol = "https".to_string();
        let mut suffix = "core.windows.net".to_string();
        let mut blob_endpoint: Option<String> = None;

        for part in raw.split(';') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            let Some((name, value)) = part.split_once('=') else {
                return Err(StoreError::Config(format!(
                    "malformed connection string segment: {}",
                    part
                )));
            };
            match name {
                "UseDevelopmentStorage" if value.eq_ignore_ascii_case("true") => {
                    account = Some(DEV_ACCOUNT.to_string());
                    key = Some(DEV_ACCOUNT_KEY.to_string());
                    blob_endpoint =
                        Some(format!("http://127.0.0.1:10000/{}", DEV_ACCOUNT));
                }
                "AccountName" => account = Some(value.to_string()),
                // AccountKey is base64 and may itself contain '='; split_once
                // keeps the remainder intact.
                "AccountKey" => key = Some(value.to_string()),
                "DefaultEndpointsProtocol" => protocol = value.to_string(),
                "EndpointSuffix" => suffix = value.to_string(),
                "BlobEndpoint" => {
                    blob_endpoint = Some(value.trim_end_matches('/').to_string())
                }
                // QueueEndpoint, TableEndpoint, SharedAccessSignature, etc.
                _ => {}
            }
        }

        let account = account.ok_or_else(|| {
            StoreError::Config("connection string is missing AccountName".to_string())
        })?;
        let key = key.ok_or_else(|| {
            StoreError::Config("connection string is missing AccountKey".to_string())
        })?;
        let key_bytes = BASE64_STANDARD.decode(&key).map_err(|e| {
            StoreError::Config(format!("AccountKey is not valid base64: {}", e))
        })?;
        let blob_endpoint = blob_endpoint
            .unwrap_or_else(|| format!("{}://{}.blob.{}", protocol, account, suffix));

        Ok(Self {
            account,
            key_bytes,
            blob_endpoint,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY_B64: &str = "c2VjcmV0LWtleS1ieXRlcw=="; // "secret-key-bytes"

    #[test]
    fn parses_standard_connection_string() {
        let raw = format!(
            "DefaultEndpointsProtocol=https;AccountName=acct;AccountKey={};EndpointSuffix=core.windows.net",
            KEY_B64
        );
        let conn = ConnectionString::parse(&raw).unwrap();
        assert_eq!(conn.account, "acct");
        assert_eq!(conn.key_bytes, b"secret-key-bytes");
        assert_eq!(conn.blob_endpoint, "https://acct.blob.core.windows.net");
    }

    #[test]
    fn explicit_blob_endpoint_wins() {
        let raw = format!(
            "AccountName=acct;AccountKey={};BlobEndpoint=http://127.0.0.1:10000/acct/",
            KEY_B64
        );
        let conn = ConnectionString::parse(&raw).unwrap();
        assert_eq!(conn.blob_endpoint, "http://127.0.0.1:10000/acct");
    }

    #[test]
    fn development_storage_shorthand() {
        let conn = ConnectionString::parse("UseDevelopmentStorage=true").unwrap();
        assert_eq!(conn.account, "devstoreaccount1");
        assert_eq!(
            conn.blob_endpoint,
            "http://127.0.0.1:10000/devstoreaccount1"
        );
    }

    #[test]
    fn missing_account_key_is_config_error() {
        let err = ConnectionString::parse("AccountName=acct");
        assert!(matches!(err, Err(StoreError::Config(_))));
    }

    #[test]
    fn invalid_base64_key_is_config_error() {
        let err = ConnectionString::parse("AccountName=acct;AccountKey=!!not-base64!!");
        assert!(matches!(err, Err(StoreError::Config(_))));
    }
}
