use crate::domain::endpoint::{EndpointDescriptor, HttpMethod};
use crate::domain::model::HttpRequest;
use crate::utils::error::Result;
use crate::utils::validation::validate_base_url;
use url::Url;

/// Turns endpoint descriptors into transport requests against one base URL.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    base_url: Url,
}

impl RequestBuilder {
    /// base URL 不合法時直接回傳錯誤，建構失敗
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = validate_base_url("base_url", base_url)?;
        Ok(Self { base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn build<E: EndpointDescriptor + ?Sized>(&self, endpoint: &E) -> HttpRequest {
        let method = endpoint.method();
        let params = endpoint.params();
        let mut headers = endpoint.headers();

        let mut url = self.base_url.clone();
        // new() 已確認 base URL 可以附加路徑
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(endpoint.path());
        }

        match method {
            HttpMethod::Get if !params.is_empty() => {
                url.query_pairs_mut().clear().extend_pairs(params.iter());
            }
            _ => url.set_query(None),
        }

        let body = match method {
            HttpMethod::Post => {
                headers.insert("Content-Type".to_string(), "application/json".to_string());
                serde_json::to_vec(&params).ok()
            }
            _ => None,
        };

        HttpRequest {
            method,
            url,
            headers,
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_BASE_URL;
    use crate::domain::endpoint::Endpoint;
    use std::collections::BTreeMap;

    fn builder() -> RequestBuilder {
        RequestBuilder::new(DEFAULT_BASE_URL).unwrap()
    }

    struct SubscribeEndpoint;

    impl EndpointDescriptor for SubscribeEndpoint {
        fn method(&self) -> HttpMethod {
            HttpMethod::Post
        }

        fn path(&self) -> &'static str {
            "subscriptions"
        }

        fn params(&self) -> BTreeMap<String, String> {
            let mut params = BTreeMap::new();
            params.insert("email".to_string(), "a@b.rs".to_string());
            params
        }
    }

    #[test]
    fn test_list_endpoints_append_path_without_query() {
        let request = builder().build(&Endpoint::Promotions);
        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(
            request.url.as_str(),
            "https://t1.aplus.rs/coordinator/api/slides.json"
        );
        assert_eq!(request.query(), "");
        assert!(request.body.is_none());

        let request = builder().build(&Endpoint::Seasons);
        assert_eq!(
            request.url.as_str(),
            "https://t1.aplus.rs/coordinator/api/seasons.json"
        );

        let request = builder().build(&Endpoint::Products);
        assert_eq!(
            request.url.as_str(),
            "https://t1.aplus.rs/coordinator/api/products.json"
        );
    }

    #[test]
    fn test_details_query() {
        let request = builder().build(&Endpoint::details("ABC123"));
        assert_eq!(request.query(), "style=ABC123");
        assert_eq!(
            request.url.as_str(),
            "https://t1.aplus.rs/coordinator/api/details?style=ABC123"
        );
    }

    #[test]
    fn test_details_with_empty_style_code() {
        let request = builder().build(&Endpoint::details(""));
        assert_eq!(request.query(), "style=");
    }

    #[test]
    fn test_details_query_is_percent_encoded() {
        let request = builder().build(&Endpoint::details("A&B=č"));
        assert_eq!(request.query(), "style=A%26B%3D%C4%8D");

        let pairs: Vec<(String, String)> = request
            .url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(pairs, vec![("style".to_string(), "A&B=č".to_string())]);
    }

    #[test]
    fn test_build_is_deterministic() {
        for endpoint in [
            Endpoint::Promotions,
            Endpoint::Seasons,
            Endpoint::Products,
            Endpoint::details("ABC123"),
        ] {
            assert_eq!(builder().build(&endpoint), builder().build(&endpoint));
        }
    }

    #[test]
    fn test_accept_header_applied() {
        let request = builder().build(&Endpoint::Seasons);
        assert_eq!(
            request.headers.get("Accept").map(String::as_str),
            Some("application/json")
        );
    }

    #[test]
    fn test_trailing_slash_in_base_url() {
        let builder = RequestBuilder::new("http://localhost:3000/api/").unwrap();
        let request = builder.build(&Endpoint::Products);
        assert_eq!(request.url.as_str(), "http://localhost:3000/api/products.json");
    }

    #[test]
    fn test_post_params_become_json_body() {
        let request = builder().build(&SubscribeEndpoint);
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.query(), "");
        assert_eq!(
            request.headers.get("Content-Type").map(String::as_str),
            Some("application/json")
        );

        let body: serde_json::Value =
            serde_json::from_slice(request.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({"email": "a@b.rs"}));
    }

    #[test]
    fn test_malformed_base_url_fails_construction() {
        assert!(RequestBuilder::new("not a url").is_err());
        assert!(RequestBuilder::new("ftp://t1.aplus.rs/api").is_err());
    }
}
