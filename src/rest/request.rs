use reqwest::{Method, Url};
use serde::Serialize;

use crate::error::HarnessError;
use crate::models::ids::{from_sentinel, CourierId, OrderId, Track};
use crate::rest::transport::TransportConfig;

/// A path or query parameter value that may be deliberately omitted.
///
/// An omitted value renders as the empty string, which is how the service
/// distinguishes "parameter missing" from "unknown id".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamValue(Option<String>);

impl ParamValue {
    pub fn omitted() -> Self {
        Self(None)
    }

    /// Sent verbatim, with no type checking. Used to exercise malformed or
    /// empty identifiers.
    pub fn raw(value: impl Into<String>) -> Self {
        Self(Some(value.into()))
    }

    pub fn is_omitted(&self) -> bool {
        self.0.is_none()
    }

    pub fn render(&self) -> &str {
        self.0.as_deref().unwrap_or("")
    }
}

impl From<i64> for ParamValue {
    fn from(raw: i64) -> Self {
        match from_sentinel::<i64>(raw) {
            Some(value) => Self(Some(value.to_string())),
            None => Self::omitted(),
        }
    }
}

macro_rules! id_param {
    ($($id:ty),*) => {
        $(
            impl From<$id> for ParamValue {
                fn from(id: $id) -> Self {
                    ParamValue::from(id.get())
                }
            }
        )*
    };
}

id_param!(CourierId, OrderId, Track);

impl From<&str> for ParamValue {
    fn from(raw: &str) -> Self {
        ParamValue::raw(raw)
    }
}

impl From<String> for ParamValue {
    fn from(raw: String) -> Self {
        ParamValue::raw(raw)
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_else(ParamValue::omitted)
    }
}

/// A fully resolved outbound request.
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    pub method: Method,
    pub url: Url,
    pub body: Option<Vec<u8>>,
    pub content_type: String,
}

impl PreparedRequest {
    pub fn body_text(&self) -> Option<String> {
        self.body
            .as_deref()
            .map(|body| String::from_utf8_lossy(body).into_owned())
    }
}

#[derive(Debug, Clone)]
pub struct RequestBuilder {
    method: Method,
    template: String,
    path_params: Vec<(String, ParamValue)>,
    query_params: Vec<(String, ParamValue)>,
    body: Option<Vec<u8>>,
    content_type: Option<String>,
}

impl RequestBuilder {
    pub fn new(method: Method, template: impl Into<String>) -> Self {
        Self {
            method,
            template: template.into(),
            path_params: Vec::new(),
            query_params: Vec::new(),
            body: None,
            content_type: None,
        }
    }

    pub fn get(template: impl Into<String>) -> Self {
        Self::new(Method::GET, template)
    }

    pub fn post(template: impl Into<String>) -> Self {
        Self::new(Method::POST, template)
    }

    pub fn put(template: impl Into<String>) -> Self {
        Self::new(Method::PUT, template)
    }

    pub fn delete(template: impl Into<String>) -> Self {
        Self::new(Method::DELETE, template)
    }

    pub fn path_param(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.path_params.push((name.into(), value.into()));
        self
    }

    pub fn query_param(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.query_params.push((name.into(), value.into()));
        self
    }

    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, HarnessError> {
        self.body = Some(serde_json::to_vec(body)?);
        Ok(self)
    }

    /// Overrides the configured request content type.
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn build(self, config: &TransportConfig) -> Result<PreparedRequest, HarnessError> {
        let segments = render_path(&self.template, &self.path_params)?;
        let mut url = Url::parse(config.base_url()).map_err(|err| {
            HarnessError::InvalidRequest(format!("invalid base url `{}`: {err}", config.base_url()))
        })?;
        url.path_segments_mut()
            .map_err(|()| {
                HarnessError::InvalidRequest(format!(
                    "base url `{}` cannot carry a path",
                    config.base_url()
                ))
            })?
            .pop_if_empty()
            .extend(&segments);

        if !self.query_params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in &self.query_params {
                pairs.append_pair(name, value.render());
            }
        }

        Ok(PreparedRequest {
            method: self.method,
            url,
            body: self.body,
            content_type: self
                .content_type
                .unwrap_or_else(|| config.content_type().to_string()),
        })
    }
}

/// One-shot form of [`RequestBuilder`].
pub fn build<B: Serialize + ?Sized>(
    config: &TransportConfig,
    method: Method,
    template: &str,
    path_params: &[(&str, ParamValue)],
    query_params: &[(&str, ParamValue)],
    body: Option<&B>,
) -> Result<PreparedRequest, HarnessError> {
    let mut request = RequestBuilder::new(method, template);
    for (name, value) in path_params {
        request = request.path_param(*name, value.clone());
    }
    for (name, value) in query_params {
        request = request.query_param(*name, value.clone());
    }
    if let Some(body) = body {
        request = request.json(body)?;
    }
    request.build(config)
}

/// Renders the template into path segments. Each bound value is
/// percent-encoded as part of its segment, so `/`, `?` and `#` in a raw value
/// never change the shape of the request.
fn render_path(template: &str, params: &[(String, ParamValue)]) -> Result<Vec<String>, HarnessError> {
    let mut bound = vec![false; params.len()];
    let mut segments = Vec::new();

    for segment in template.trim_start_matches('/').split('/') {
        let mut rendered = String::with_capacity(segment.len());
        let mut rest = segment;

        while let Some(start) = rest.find('{') {
            rendered.push_str(&rest[..start]);
            let after = &rest[start + 1..];
            let end = after.find('}').ok_or_else(|| {
                HarnessError::InvalidRequest(format!("unterminated placeholder in `{template}`"))
            })?;
            let name = &after[..end];
            let index = params
                .iter()
                .position(|(key, _)| key == name)
                .ok_or_else(|| {
                    HarnessError::InvalidRequest(format!(
                        "no value bound for `{{{name}}}` in `{template}`"
                    ))
                })?;

            bound[index] = true;
            rendered.push_str(params[index].1.render());
            rest = &after[end + 1..];
        }
        rendered.push_str(rest);
        segments.push(rendered);
    }

    if let Some(((name, _), _)) = params.iter().zip(&bound).find(|(_, used)| !**used) {
        return Err(HarnessError::InvalidRequest(format!(
            "path parameter `{name}` has no placeholder in `{template}`"
        )));
    }

    Ok(segments)
}

#[cfg(test)]
mod tests {
    use reqwest::Method;
    use serde_json::json;

    use super::{build, ParamValue, RequestBuilder};
    use crate::models::ids::{CourierId, OrderId, Track};
    use crate::rest::transport::TransportConfig;

    fn config() -> TransportConfig {
        TransportConfig::for_host("http://localhost:8080")
    }

    #[test]
    fn substitutes_path_and_query_parameters() {
        let request = RequestBuilder::put("/orders/accept/{id}")
            .path_param("id", OrderId(15))
            .query_param("courierId", CourierId(3))
            .build(&config())
            .unwrap();

        assert_eq!(request.method, Method::PUT);
        assert_eq!(
            request.url.as_str(),
            "http://localhost:8080/api/v1/orders/accept/15?courierId=3"
        );
        assert!(request.body.is_none());
    }

    #[test]
    fn zero_and_missing_ids_render_as_empty() {
        let request = RequestBuilder::put("/orders/accept/{id}")
            .path_param("id", 0_i64)
            .query_param("courierId", None::<CourierId>)
            .build(&config())
            .unwrap();

        assert_eq!(
            request.url.as_str(),
            "http://localhost:8080/api/v1/orders/accept/?courierId="
        );
    }

    #[test]
    fn zero_valued_ids_are_elided_like_omitted_ones() {
        assert_eq!(ParamValue::from(Track(0)), ParamValue::omitted());
        assert_eq!(ParamValue::from(Some(OrderId(0))), ParamValue::omitted());
        assert_eq!(ParamValue::from(Some(Track(9))).render(), "9");
    }

    #[test]
    fn raw_values_are_sent_verbatim() {
        let request = RequestBuilder::delete("/courier/{id}")
            .path_param("id", "")
            .build(&config())
            .unwrap();

        assert_eq!(request.url.as_str(), "http://localhost:8080/api/v1/courier/");
    }

    #[test]
    fn raw_values_stay_inside_their_path_segment() {
        let request = RequestBuilder::delete("/courier/{id}")
            .path_param("id", "1?x=2#frag")
            .build(&config())
            .unwrap();

        assert_eq!(request.url.path(), "/api/v1/courier/1%3Fx=2%23frag");
        assert_eq!(request.url.query(), None);
        assert_eq!(request.url.fragment(), None);

        let slashed = RequestBuilder::get("/courier/{id}/ordersCount")
            .path_param("id", "7/8")
            .build(&config())
            .unwrap();

        assert_eq!(slashed.url.path(), "/api/v1/courier/7%2F8/ordersCount");
    }

    #[test]
    fn body_is_serialized_with_default_content_type() {
        let request = build(
            &config(),
            Method::POST,
            "/courier",
            &[],
            &[],
            Some(&json!({ "login": "johnny123" })),
        )
        .unwrap();

        assert_eq!(request.content_type, "application/json");
        assert_eq!(request.body_text().unwrap(), r#"{"login":"johnny123"}"#);
    }

    #[test]
    fn content_type_can_be_overridden() {
        let request = RequestBuilder::post("/courier")
            .content_type("text/plain")
            .build(&config())
            .unwrap();

        assert_eq!(request.content_type, "text/plain");
    }

    #[test]
    fn unbound_placeholder_is_a_harness_error() {
        let err = RequestBuilder::get("/courier/{id}").build(&config()).unwrap_err();
        assert!(!err.is_contract_violation());
        assert!(err.to_string().contains("{id}"));
    }

    #[test]
    fn unused_path_parameter_is_rejected() {
        let err = RequestBuilder::get("/orders")
            .path_param("id", OrderId(1))
            .build(&config())
            .unwrap_err();
        assert!(err.to_string().contains("`id`"));
    }
}
