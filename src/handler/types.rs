// Wire types for the JSON endpoints
// Zero-valued fields are omitted on serialization and defaulted on
// deserialization, matching the endpoints' omit-empty contract.

use serde::{Deserialize, Serialize};

/// Payload for `GET /json` and the `POST /post` echo
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonData {
    #[serde(default, skip_serializing_if = "is_zero")]
    pub number: i64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub string: String,
    #[serde(rename = "bool", default, skip_serializing_if = "is_false")]
    pub flag: bool,
}

/// Request body for `POST /add`; missing fields default to 0 and
/// zero-valued fields are omitted when echoed back on a 400
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddRequest {
    #[serde(default, skip_serializing_if = "is_zero")]
    pub left: i64,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub right: i64,
}

/// Response body for `POST /add`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddResponse {
    pub answer: i64,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_zero(n: &i64) -> bool {
    *n == 0
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(b: &bool) -> bool {
    !*b
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_data_omits_zero_fields() {
        let data = JsonData {
            number: 10,
            string: "hoge".to_string(),
            flag: false,
        };
        let json = serde_json::to_string(&data).expect("serializes");
        assert_eq!(json, r#"{"number":10,"string":"hoge"}"#);
    }

    #[test]
    fn test_json_data_default_serializes_empty() {
        let json = serde_json::to_string(&JsonData::default()).expect("serializes");
        assert_eq!(json, "{}");
    }

    #[test]
    fn test_json_data_bool_field_name() {
        let data = JsonData {
            number: 0,
            string: String::new(),
            flag: true,
        };
        let json = serde_json::to_string(&data).expect("serializes");
        assert_eq!(json, r#"{"bool":true}"#);

        let parsed: JsonData = serde_json::from_str(r#"{"bool":true}"#).expect("parses");
        assert!(parsed.flag);
    }

    #[test]
    fn test_add_request_missing_fields_default_to_zero() {
        let req: AddRequest = serde_json::from_str(r#"{"left":7}"#).expect("parses");
        assert_eq!(req.left, 7);
        assert_eq!(req.right, 0);
    }

    #[test]
    fn test_add_request_default_serializes_empty() {
        let json = serde_json::to_string(&AddRequest::default()).expect("serializes");
        assert_eq!(json, "{}");
    }
}
