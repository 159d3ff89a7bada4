use std::ops::Deref;

use jsonpath_lib::select;
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ContractViolation, HarnessError};
use crate::rest::transport::JSON;

const BODY_PREVIEW_LIMIT: usize = 512;

/// Expected status line and content type of a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseSpec {
    pub status: StatusCode,
    pub content_type: Option<&'static str>,
}

impl ResponseSpec {
    pub const OK: Self = Self::json(StatusCode::OK);
    pub const CREATED: Self = Self::json(StatusCode::CREATED);
    pub const BAD_REQUEST: Self = Self::json(StatusCode::BAD_REQUEST);
    pub const NOT_FOUND: Self = Self::json(StatusCode::NOT_FOUND);
    pub const CONFLICT: Self = Self::json(StatusCode::CONFLICT);

    pub const fn new(status: StatusCode, content_type: Option<&'static str>) -> Self {
        Self {
            status,
            content_type,
        }
    }

    pub const fn json(status: StatusCode) -> Self {
        Self::new(status, Some(JSON))
    }
}

/// A received response. Error statuses are ordinary values here.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl ApiResponse {
    pub fn new(status: StatusCode, headers: HeaderMap, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header(CONTENT_TYPE.as_str())
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json(&self) -> Result<Value, HarnessError> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, HarnessError> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Checks the status line and content type only; the body is left to the
    /// caller.
    pub fn expect(&self, spec: ResponseSpec) -> Result<MatchedResponse<'_>, HarnessError> {
        if self.status != spec.status {
            return Err(HarnessError::Contract(ContractViolation::Status {
                expected: spec.status.as_u16(),
                actual: self.status.as_u16(),
                body: self.body_preview(),
            }));
        }

        if let Some(expected) = spec.content_type {
            let actual = self.content_type();
            let matches = actual
                .and_then(|value| value.split(';').next())
                .is_some_and(|mime| mime.trim().eq_ignore_ascii_case(expected));
            if !matches {
                return Err(HarnessError::Contract(ContractViolation::ContentType {
                    expected: expected.to_string(),
                    actual: actual.map(str::to_string),
                }));
            }
        }

        Ok(MatchedResponse { response: self })
    }

    /// Evaluates a JSONPath expression. A leading `$.` may be left off, so
    /// `order.id` and `$.order.id` are equivalent.
    ///
    /// Multiple matches are returned as an array. No match is an error, never
    /// a default value.
    pub fn extract(&self, path: &str) -> Result<Value, HarnessError> {
        let document = self.json()?;
        let path = normalize_path(path);
        let matches = select_path(&document, &path)?;

        match matches.as_slice() {
            [] => Err(HarnessError::FieldNotFound(path)),
            [single] => Ok((*single).clone()),
            many => Ok(Value::Array(many.iter().map(|value| (*value).clone()).collect())),
        }
    }

    pub fn extract_as<T: DeserializeOwned>(&self, path: &str) -> Result<T, HarnessError> {
        let value = self.extract(path)?;
        Ok(serde_json::from_value(value)?)
    }

    /// First element of the sequence at `sequence_path` satisfying
    /// `predicate`. A missing sequence is an error; no match is `None`.
    pub fn find_first<F>(&self, sequence_path: &str, predicate: F) -> Result<Option<Value>, HarnessError>
    where
        F: Fn(&Value) -> bool,
    {
        let document = self.json()?;
        let path = normalize_path(sequence_path);
        let matches = select_path(&document, &path)?;

        let found = match matches.as_slice() {
            [] => return Err(HarnessError::FieldNotFound(path)),
            [Value::Array(items)] => items.iter().find(|item| predicate(item)).cloned(),
            many => many.iter().copied().find(|item| predicate(item)).cloned(),
        };

        Ok(found)
    }

    /// The `message` field carried by every error body of the service.
    pub fn message(&self) -> Result<String, HarnessError> {
        self.extract_as("$.message")
    }

    fn body_preview(&self) -> String {
        let text = self.text();
        match text.char_indices().nth(BODY_PREVIEW_LIMIT) {
            Some((cut, _)) => format!("{}...", &text[..cut]),
            None => text,
        }
    }
}

/// A response whose status line and content type matched a [`ResponseSpec`].
#[derive(Debug, Clone, Copy)]
pub struct MatchedResponse<'a> {
    response: &'a ApiResponse,
}

impl<'a> MatchedResponse<'a> {
    pub fn response(&self) -> &'a ApiResponse {
        self.response
    }
}

impl Deref for MatchedResponse<'_> {
    type Target = ApiResponse;

    fn deref(&self) -> &Self::Target {
        self.response
    }
}

fn normalize_path(path: &str) -> String {
    if path.starts_with('$') {
        path.to_string()
    } else {
        format!("$.{path}")
    }
}

fn select_path<'a>(document: &'a Value, path: &str) -> Result<Vec<&'a Value>, HarnessError> {
    select(document, path).map_err(|err| HarnessError::InvalidPath {
        path: path.to_string(),
        reason: format!("{err:?}"),
    })
}

#[cfg(test)]
mod tests {
    use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
    use reqwest::StatusCode;
    use serde_json::{json, Value};

    use super::{ApiResponse, ResponseSpec};
    use crate::error::{ContractViolation, HarnessError};

    fn response(status: StatusCode, body: Value) -> ApiResponse {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=utf-8"),
        );
        ApiResponse::new(status, headers, serde_json::to_vec(&body).unwrap())
    }

    fn orders_page() -> ApiResponse {
        response(
            StatusCode::OK,
            json!({
                "orders": [
                    { "id": 1, "track": 100001, "courierId": 4 },
                    { "id": 2, "track": 100002, "courierId": null },
                    { "id": 3, "track": 100003, "courierId": null }
                ],
                "pageInfo": { "page": 0, "total": 3, "limit": 30 }
            }),
        )
    }

    #[test]
    fn expect_accepts_matching_status_and_charset_suffix() {
        let created = response(StatusCode::CREATED, json!({ "ok": true }));
        let matched = created.expect(ResponseSpec::CREATED).unwrap();
        assert_eq!(matched.extract("ok").unwrap(), json!(true));
    }

    #[test]
    fn expect_reports_status_mismatch_as_contract_violation() {
        let rejected = response(StatusCode::BAD_REQUEST, json!({ "message": "nope" }));
        let err = rejected.expect(ResponseSpec::CREATED).unwrap_err();

        match err {
            HarnessError::Contract(ContractViolation::Status { expected, actual, .. }) => {
                assert_eq!(expected, 201);
                assert_eq!(actual, 400);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn expect_checks_content_type() {
        let plain = ApiResponse::new(StatusCode::OK, HeaderMap::new(), b"ok".to_vec());
        let err = plain.expect(ResponseSpec::OK).unwrap_err();
        assert!(err.is_contract_violation());

        let spec = ResponseSpec::new(StatusCode::OK, None);
        assert!(plain.expect(spec).is_ok());
    }

    #[test]
    fn extracts_scalar_and_nested_fields() {
        let page = orders_page();
        assert_eq!(page.extract_as::<i64>("pageInfo.total").unwrap(), 3);
        assert_eq!(page.extract_as::<i64>("$.orders[1].track").unwrap(), 100002);
        assert_eq!(page.extract("orders[*].id").unwrap(), json!([1, 2, 3]));
    }

    #[test]
    fn null_field_is_present_but_absent_field_is_not_found() {
        let page = orders_page();
        assert_eq!(page.extract("orders[1].courierId").unwrap(), Value::Null);

        let err = page.extract("orders[0].courierFirstName").unwrap_err();
        assert!(matches!(err, HarnessError::FieldNotFound(_)));
    }

    #[test]
    fn find_first_returns_first_matching_element() {
        let page = orders_page();
        let unassigned = page
            .find_first("orders", |order| order["courierId"].is_null())
            .unwrap()
            .unwrap();
        assert_eq!(unassigned["id"], 2);

        let none = page
            .find_first("orders", |order| order["id"] == 99)
            .unwrap();
        assert!(none.is_none());

        assert!(page.find_first("couriers", |_| true).is_err());
    }

    #[test]
    fn message_reads_error_text() {
        let conflict = response(
            StatusCode::CONFLICT,
            json!({ "code": 409, "message": "Этот логин уже используется" }),
        );
        assert_eq!(conflict.message().unwrap(), "Этот логин уже используется");
    }

    #[test]
    fn non_json_body_is_a_harness_error() {
        let html = ApiResponse::new(StatusCode::OK, HeaderMap::new(), b"<html>".to_vec());
        let err = html.extract("ok").unwrap_err();
        assert!(matches!(err, HarnessError::Json(_)));
    }
}
