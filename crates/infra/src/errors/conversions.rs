//! Conversions from external infrastructure errors into domain errors.

use reqwest::Error as HttpError;
use rusqlite::Error as SqlError;
use vsme_domain::VsmeError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub VsmeError);

impl From<InfraError> for VsmeError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<VsmeError> for InfraError {
    fn from(value: VsmeError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoVsmeError {
    fn into_vsme(self) -> VsmeError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → VsmeError */
/* -------------------------------------------------------------------------- */

impl IntoVsmeError for SqlError {
    fn into_vsme(self) -> VsmeError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match err.code {
                    ErrorCode::DatabaseBusy => VsmeError::Storage("database is busy".into()),
                    ErrorCode::DatabaseLocked => VsmeError::Storage("database is locked".into()),
                    ErrorCode::ReadOnly => VsmeError::Storage("database is read-only".into()),
                    ErrorCode::DiskFull => VsmeError::Storage("disk is full".into()),
                    ErrorCode::CannotOpen => {
                        VsmeError::Storage(format!("unable to open database file: {message}"))
                    }
                    _ => VsmeError::Storage(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => VsmeError::NotFound("no rows returned by query".into()),
            RE::FromSqlConversionFailure(_, _, cause) => {
                VsmeError::Storage(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, _, ty) => {
                VsmeError::Storage(format!("invalid column type: {ty}"))
            }
            RE::InvalidPath(path) => VsmeError::Config(format!(
                "invalid database path: {}",
                path.to_string_lossy()
            )),
            other => VsmeError::Storage(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_vsme())
    }
}

/* -------------------------------------------------------------------------- */
/* r2d2::Error → VsmeError */
/* -------------------------------------------------------------------------- */

impl IntoVsmeError for r2d2::Error {
    fn into_vsme(self) -> VsmeError {
        VsmeError::Storage(format!("connection pool error: {self}"))
    }
}

impl From<r2d2::Error> for InfraError {
    fn from(value: r2d2::Error) -> Self {
        InfraError(value.into_vsme())
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → VsmeError */
/* -------------------------------------------------------------------------- */

impl IntoVsmeError for HttpError {
    fn into_vsme(self) -> VsmeError {
        if self.is_timeout() {
            return VsmeError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return VsmeError::Network("HTTP connection failure".into());
        }

        if let Some(status) = self.status() {
            return status_error(status);
        }

        if self.is_decode() {
            return VsmeError::Network(format!("malformed response body: {self}"));
        }

        VsmeError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_vsme())
    }
}

/// Map a non-success HTTP status onto the domain error.
///
/// Server-side and throttling failures stay retryable (`Network`); client
/// errors are final.
pub fn status_error(status: reqwest::StatusCode) -> VsmeError {
    let code = status.as_u16();
    let message = format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

    match code {
        401 | 403 => VsmeError::Config(format!("report data store rejected credentials: {message}")),
        404 => VsmeError::NotFound(message),
        408 | 429 => VsmeError::Network(message),
        400 | 422 => VsmeError::Validation(message),
        400..=499 => VsmeError::InvalidInput(message),
        _ => VsmeError::Network(message),
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use reqwest::{Client, StatusCode};
    use rusqlite::ffi::{Error as FfiError, ErrorCode};
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[test]
    fn sqlite_busy_maps_to_retryable_storage_error() {
        let err = SqlError::SqliteFailure(
            FfiError { code: ErrorCode::DatabaseBusy, extended_code: 5 },
            Some("database is locked".into()),
        );

        let mapped: VsmeError = InfraError::from(err).into();
        match &mapped {
            VsmeError::Storage(msg) => assert!(msg.contains("busy")),
            other => panic!("expected storage error, got {:?}", other),
        }
        assert!(mapped.is_retryable());
    }

    #[test]
    fn statuses_split_into_retryable_and_final() {
        assert!(status_error(StatusCode::SERVICE_UNAVAILABLE).is_retryable());
        assert!(status_error(StatusCode::TOO_MANY_REQUESTS).is_retryable());
        assert!(!status_error(StatusCode::UNPROCESSABLE_ENTITY).is_retryable());
        assert!(matches!(status_error(StatusCode::NOT_FOUND), VsmeError::NotFound(_)));
    }

    #[tokio::test]
    async fn http_status_401_maps_to_config_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(StatusCode::UNAUTHORIZED))
            .mount(&server)
            .await;

        let client = Client::builder().no_proxy().build().unwrap();
        let error = client.get(server.uri()).send().await.unwrap().error_for_status().unwrap_err();

        let mapped: VsmeError = InfraError::from(error).into();
        match mapped {
            VsmeError::Config(msg) => assert!(msg.contains("401")),
            other => panic!("expected config error, got {:?}", other),
        }
    }
}
