use serde::Deserialize;
use serde::de::{self, DeserializeOwned};
use serde_json::Value;

/// Normalized shape of every CoinVerse reply.
///
/// `code` and `message` only carry meaning when `success` is false. The
/// operation specific fields sit next to them at the top level of the JSON
/// object and are decoded into `payload`.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope<T> {
    pub success: bool,
    pub code: Option<i64>,
    pub message: Option<String>,
    pub payload: T,
}

#[derive(Deserialize)]
struct Header {
    success: Option<bool>,
    // The refresh_token endpoint spells it "sucess".
    sucess: Option<bool>,
    #[serde(default)]
    code: Option<i64>,
    #[serde(default, rename = "msg", alias = "message")]
    message: Option<String>,
}

impl Header {
    fn success(&self) -> Result<bool, serde_json::Error> {
        match (self.success, self.sucess) {
            (None, None) => Err(<serde_json::Error as de::Error>::missing_field("success")),
            (a, b) => Ok(a.unwrap_or(false) || b.unwrap_or(false)),
        }
    }
}

impl<T> Envelope<T>
where
    T: DeserializeOwned + Default,
{
    /// Decode raw response bytes. Unknown keys are ignored and absent optional
    /// keys fall back to their defaults; anything else is an error.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_slice(bytes)?;
        Self::from_value(&value)
    }

    /// The payload is only read from successful replies; a failure carries
    /// `T::default()` whatever else the server sent alongside it.
    pub fn from_value(value: &Value) -> Result<Self, serde_json::Error> {
        let header = Header::deserialize(value)?;
        let success = header.success()?;
        let payload = if success {
            T::deserialize(value)?
        } else {
            T::default()
        };
        Ok(Self {
            success,
            code: header.code,
            message: header.message,
            payload,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoints::NoPayload;
    use crate::endpoints::auth::LoginPayload;

    #[test]
    fn decodes_success_with_payload() {
        let env: Envelope<LoginPayload> = Envelope::from_slice(
            br#"{"success":true,"msg":"Login successful","access_token":"abc","token_type":"bearer"}"#,
        )
        .unwrap();
        assert!(env.success);
        assert_eq!(env.code, None);
        assert_eq!(env.message.as_deref(), Some("Login successful"));
        assert_eq!(env.payload.access_token.as_deref(), Some("abc"));
    }

    #[test]
    fn absent_optional_fields_are_defaults() {
        let env: Envelope<LoginPayload> = Envelope::from_slice(br#"{"success":false}"#).unwrap();
        assert!(!env.success);
        assert_eq!(env.code, None);
        assert_eq!(env.message, None);
        assert_eq!(env.payload, LoginPayload::default());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let env: Envelope<NoPayload> = Envelope::from_slice(
            br#"{"success":false,"code":3,"msg":"Duplicated book name","extra":{"nested":[1,2]}}"#,
        )
        .unwrap();
        assert_eq!(env.code, Some(3));
        assert_eq!(env.message.as_deref(), Some("Duplicated book name"));
    }

    #[test]
    fn misspelled_success_flag_is_accepted() {
        let env: Envelope<NoPayload> =
            Envelope::from_slice(br#"{"sucess":true,"expired":false,"msg":"ok"}"#).unwrap();
        assert!(env.success);
    }

    #[test]
    fn both_spellings_of_success_are_combined() {
        let env: Envelope<NoPayload> =
            Envelope::from_slice(br#"{"success":true,"sucess":true,"msg":"ok"}"#).unwrap();
        assert!(env.success);

        let env: Envelope<NoPayload> =
            Envelope::from_slice(br#"{"success":false,"sucess":true}"#).unwrap();
        assert!(env.success);
    }

    #[test]
    fn failure_payload_is_not_decoded() {
        let env: Envelope<LoginPayload> = Envelope::from_slice(
            br#"{"success":false,"code":1015,"msg":"LoginFailedError","access_token":0}"#,
        )
        .unwrap();
        assert!(!env.success);
        assert_eq!(env.code, Some(1015));
        assert_eq!(env.payload, LoginPayload::default());
    }

    #[test]
    fn malformed_success_payload_is_an_error() {
        assert!(
            Envelope::<LoginPayload>::from_slice(br#"{"success":true,"access_token":0}"#).is_err()
        );
    }

    #[test]
    fn missing_success_flag_is_an_error() {
        assert!(Envelope::<NoPayload>::from_slice(br#"{"msg":"hello"}"#).is_err());
    }

    #[test]
    fn non_object_body_is_an_error() {
        assert!(Envelope::<NoPayload>::from_slice(b"[]").is_err());
        assert!(Envelope::<NoPayload>::from_slice(b"Internal Server Error").is_err());
    }

    #[test]
    fn null_code_and_message_are_absent() {
        let env: Envelope<NoPayload> =
            Envelope::from_slice(br#"{"success":false,"code":null,"msg":null}"#).unwrap();
        assert_eq!(env.code, None);
        assert_eq!(env.message, None);
    }
}
