//! Classification of a remote call into exactly one of three outcomes.
//!
//! A reply that parses as an [`Envelope`] is `Ok` or `BizError` depending on
//! its `success` flag. Everything that prevents getting such a reply
//! (bad address, refused connection, timeout, non-2xx status, unparsable
//! body) is a `NetError`.

use coinverse_api::Envelope;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Code reported when a failed envelope carries none.
pub const UNKNOWN_BIZ_CODE: i64 = -1;

/// Message reported when a failed envelope carries none.
pub const DEFAULT_BIZ_MESSAGE: &str = "Unknown biz error";

#[derive(Debug, Error)]
pub enum NetError {
    #[error("Invalid server address {address:?}: {source}")]
    InvalidAddress {
        address: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server replied with HTTP {status}")]
    Status { status: u16, body: String },

    #[error("Could not encode request: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Malformed response: {0}")]
    Decode(#[source] serde_json::Error),
}

impl NetError {
    /// True when the server could not be reached at all.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, NetError::Http(e) if e.is_connect() || e.is_timeout())
    }
}

#[must_use]
#[derive(Debug)]
pub enum CallOutcome<T> {
    Ok(T),
    BizError { code: i64, message: String },
    NetError(NetError),
}

/// A failed [`CallOutcome`], for callers that prefer `?`.
#[derive(Debug, Error)]
pub enum CallError {
    #[error("{message} (code {code})")]
    Biz { code: i64, message: String },

    #[error(transparent)]
    Net(#[from] NetError),
}

impl<T> CallOutcome<T> {
    pub fn is_ok(&self) -> bool {
        matches!(self, CallOutcome::Ok(_))
    }

    pub fn map<U, F>(self, f: F) -> CallOutcome<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            CallOutcome::Ok(value) => CallOutcome::Ok(f(value)),
            CallOutcome::BizError { code, message } => CallOutcome::BizError { code, message },
            CallOutcome::NetError(e) => CallOutcome::NetError(e),
        }
    }

    /// Display string for the failure, `None` on success.
    pub fn error_message(&self) -> Option<String> {
        match self {
            CallOutcome::Ok(_) => None,
            CallOutcome::BizError { message, .. } => Some(message.clone()),
            CallOutcome::NetError(e) => Some(e.to_string()),
        }
    }

    pub fn into_result(self) -> Result<T, CallError> {
        match self {
            CallOutcome::Ok(value) => Ok(value),
            CallOutcome::BizError { code, message } => Err(CallError::Biz { code, message }),
            CallOutcome::NetError(e) => Err(CallError::Net(e)),
        }
    }
}

pub fn classify<T>(result: Result<Envelope<T>, NetError>) -> CallOutcome<Envelope<T>> {
    match result {
        Err(e) => CallOutcome::NetError(e),
        Ok(envelope) if envelope.success => CallOutcome::Ok(envelope),
        Ok(envelope) => CallOutcome::BizError {
            code: envelope.code.unwrap_or(UNKNOWN_BIZ_CODE),
            message: envelope
                .message
                .unwrap_or_else(|| DEFAULT_BIZ_MESSAGE.to_string()),
        },
    }
}

/// Parse a raw reply body and classify it.
pub fn classify_body<T>(body: &[u8]) -> CallOutcome<Envelope<T>>
where
    T: DeserializeOwned + Default,
{
    classify(Envelope::from_slice(body).map_err(NetError::Decode))
}

#[cfg(test)]
mod tests {
    use super::*;
    use coinverse_api::endpoints::NoPayload;
    use coinverse_api::endpoints::auth::LoginPayload;
    use coinverse_api::endpoints::books::BooksPayload;

    fn envelope(success: bool, code: Option<i64>, message: Option<&str>) -> Envelope<NoPayload> {
        Envelope {
            success,
            code,
            message: message.map(str::to_string),
            payload: NoPayload {},
        }
    }

    #[test]
    fn success_keeps_the_envelope_unchanged() {
        for (code, message) in [(None, None), (Some(7), Some("ignored")), (Some(0), Some("ok"))] {
            let env = envelope(true, code, message);
            match classify(Ok(env.clone())) {
                CallOutcome::Ok(got) => assert_eq!(got, env),
                other => panic!("expected Ok, got {other:?}"),
            }
        }
    }

    #[test]
    fn failure_surfaces_code_and_message() {
        match classify(Ok(envelope(false, Some(1015), Some("LoginFailedError")))) {
            CallOutcome::BizError { code, message } => {
                assert_eq!(code, 1015);
                assert_eq!(message, "LoginFailedError");
            }
            other => panic!("expected BizError, got {other:?}"),
        }
    }

    #[test]
    fn failure_without_details_uses_sentinels() {
        match classify(Ok(envelope(false, None, None))) {
            CallOutcome::BizError { code, message } => {
                assert_eq!(code, UNKNOWN_BIZ_CODE);
                assert_eq!(message, DEFAULT_BIZ_MESSAGE);
            }
            other => panic!("expected BizError, got {other:?}"),
        }
    }

    #[test]
    fn malformed_bodies_are_net_errors() {
        let bodies: [&[u8]; 4] = [
            b"<html>502</html>",
            b"",
            br#"{"msg":"no flag"}"#,
            br#"{"success":"yes"}"#,
        ];
        for body in bodies {
            let outcome = classify_body::<NoPayload>(body);
            assert!(
                matches!(outcome, CallOutcome::NetError(NetError::Decode(_))),
                "body {:?} gave {outcome:?}",
                String::from_utf8_lossy(body)
            );
        }
    }

    #[test]
    fn well_formed_bodies_are_never_net_errors() {
        let outcome = classify_body::<LoginPayload>(br#"{"success":false,"code":1,"whatever":true}"#);
        assert!(matches!(outcome, CallOutcome::BizError { code: 1, .. }));

        let outcome = classify_body::<LoginPayload>(br#"{"success":true,"access_token":"abc"}"#);
        match outcome {
            CallOutcome::Ok(env) => assert_eq!(env.payload.access_token.as_deref(), Some("abc")),
            other => panic!("expected Ok, got {other:?}"),
        }
    }

    #[test]
    fn failure_replies_with_off_type_payloads_are_business_errors() {
        let outcome = classify_body::<BooksPayload>(
            br#"{"success":false,"code":2,"msg":"Token expired","books":{}}"#,
        );
        match outcome {
            CallOutcome::BizError { code, message } => {
                assert_eq!(code, 2);
                assert_eq!(message, "Token expired");
            }
            other => panic!("expected BizError, got {other:?}"),
        }

        let outcome = classify_body::<LoginPayload>(
            br#"{"success":false,"code":1015,"msg":"LoginFailedError","access_token":0}"#,
        );
        assert!(matches!(outcome, CallOutcome::BizError { code: 1015, .. }));
    }

    #[test]
    fn both_success_spellings_in_one_body_decode() {
        let outcome = classify_body::<NoPayload>(br#"{"success":true,"sucess":true,"msg":"ok"}"#);
        assert!(outcome.is_ok());
    }

    #[test]
    fn transport_failures_pass_through() {
        let err = NetError::Status {
            status: 502,
            body: "bad gateway".to_string(),
        };
        let outcome = classify::<NoPayload>(Err(err));
        assert_eq!(
            outcome.error_message().as_deref(),
            Some("Server replied with HTTP 502")
        );
    }

    #[test]
    fn into_result_folds_failures() {
        let err = classify(Ok(envelope(false, Some(3), Some("Duplicated book name"))))
            .into_result()
            .unwrap_err();
        assert_eq!(err.to_string(), "Duplicated book name (code 3)");

        let ok = classify(Ok(envelope(true, None, None))).map(|env| env.success);
        assert!(ok.into_result().unwrap());
    }
}
