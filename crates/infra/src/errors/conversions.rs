//! Conversions from external infrastructure errors into domain errors.

use keyring::Error as KeyringError;
use mia_domain::MiaError;
use reqwest::Error as HttpError;
use serde_json::Error as JsonError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub MiaError);

impl From<InfraError> for MiaError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<MiaError> for InfraError {
    fn from(value: MiaError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoMiaError {
    fn into_mia(self) -> MiaError;
}

/* -------------------------------------------------------------------------- */
/* keyring::Error → MiaError */
/* -------------------------------------------------------------------------- */

impl IntoMiaError for KeyringError {
    fn into_mia(self) -> MiaError {
        use KeyringError::*;

        let description = self.to_string();

        match self {
            NoEntry => MiaError::NotFound("keychain entry not found".into()),
            BadEncoding(_) => MiaError::Storage("credential in keychain is not valid UTF-8".into()),
            TooLong(name, limit) => MiaError::Storage(format!(
                "keychain attribute '{name}' exceeds platform limit ({limit})"
            )),
            Invalid(attr, reason) => {
                MiaError::Storage(format!("keychain attribute '{attr}' is invalid: {reason}"))
            }
            PlatformFailure(err) => MiaError::Storage(format!("keychain platform error: {err}")),
            NoStorageAccess(err) => {
                MiaError::Storage(format!("unable to access secure storage: {err}"))
            }
            _ => MiaError::Storage(description),
        }
    }
}

impl From<KeyringError> for InfraError {
    fn from(value: KeyringError) -> Self {
        InfraError(value.into_mia())
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → MiaError */
/* -------------------------------------------------------------------------- */

impl IntoMiaError for HttpError {
    fn into_mia(self) -> MiaError {
        if self.is_timeout() {
            return MiaError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return MiaError::Network("HTTP connection failure".into());
        }

        if self.is_builder() {
            return MiaError::InvalidInput(format!("invalid HTTP request: {self}"));
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 | 403 => MiaError::Auth(message),
                404 => MiaError::NotFound(message),
                400..=499 if code != 429 => MiaError::InvalidInput(message),
                _ => MiaError::Network(message),
            };
        }

        MiaError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_mia())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error / std::io::Error → MiaError */
/* -------------------------------------------------------------------------- */

impl IntoMiaError for JsonError {
    fn into_mia(self) -> MiaError {
        if self.is_io() {
            MiaError::Storage(format!("I/O error while handling JSON: {self}"))
        } else {
            MiaError::InvalidInput(format!("invalid JSON: {self}"))
        }
    }
}

impl From<JsonError> for InfraError {
    fn from(value: JsonError) -> Self {
        InfraError(value.into_mia())
    }
}

impl IntoMiaError for std::io::Error {
    fn into_mia(self) -> MiaError {
        match self.kind() {
            std::io::ErrorKind::NotFound => MiaError::NotFound(self.to_string()),
            _ => MiaError::Storage(self.to_string()),
        }
    }
}

impl From<std::io::Error> for InfraError {
    fn from(value: std::io::Error) -> Self {
        InfraError(value.into_mia())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
