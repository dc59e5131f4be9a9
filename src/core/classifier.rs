//! Maps a raw [`Outcome`] to a payload or a [`ServiceError`].
//!
//! Shape checks are looked up per [`EndpointKind`] in a [`ShapeRegistry`]
//! that is filled once when the classifier is created.

use crate::domain::endpoint::EndpointKind;
use crate::domain::model::{Outcome, Payload, ResponseHead};
use crate::utils::error::{ServiceError, ServiceResult};
use serde_json::Value;
use std::collections::HashMap;

/// 每個 endpoint 期望的回應格式
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseShape {
    /// 單一 JSON 物件，直接作為 payload
    Object,
    /// 物件陣列，包在指定的 key 底下
    ObjectList { key: &'static str },
}

impl ResponseShape {
    pub fn decode(&self, value: Value) -> Option<Payload> {
        match self {
            ResponseShape::Object => match value {
                Value::Object(map) => Some(map),
                _ => None,
            },
            ResponseShape::ObjectList { key } => match value {
                Value::Array(items) if items.iter().all(Value::is_object) => {
                    let mut payload = Payload::new();
                    payload.insert(key.to_string(), Value::Array(items));
                    Some(payload)
                }
                _ => None,
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct ShapeRegistry {
    shapes: HashMap<EndpointKind, ResponseShape>,
}

impl ShapeRegistry {
    pub fn empty() -> Self {
        Self {
            shapes: HashMap::new(),
        }
    }

    pub fn register(&mut self, kind: EndpointKind, shape: ResponseShape) -> &mut Self {
        self.shapes.insert(kind, shape);
        self
    }

    /// 未註冊的 endpoint 預設期望單一物件
    pub fn shape_for(&self, kind: EndpointKind) -> &ResponseShape {
        self.shapes.get(&kind).unwrap_or(&ResponseShape::Object)
    }
}

impl Default for ShapeRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry
            .register(
                EndpointKind::Promotions,
                ResponseShape::ObjectList { key: "promotions" },
            )
            .register(EndpointKind::Seasons, ResponseShape::Object)
            .register(EndpointKind::Products, ResponseShape::Object)
            .register(EndpointKind::Details, ResponseShape::Object);
        registry
    }
}

#[derive(Debug, Clone, Default)]
pub struct ResponseClassifier {
    shapes: ShapeRegistry,
}

impl ResponseClassifier {
    pub fn new(shapes: ShapeRegistry) -> Self {
        Self { shapes }
    }

    pub fn classify(&self, kind: EndpointKind, outcome: Outcome) -> ServiceResult {
        let received = match outcome.result {
            Ok(received) => received,
            Err(e) => {
                tracing::warn!(endpoint = %kind, "Transport failure: {}", e);
                return Err(ServiceError::NetworkError(e));
            }
        };

        let Some(head) = received.head else {
            tracing::debug!(endpoint = %kind, "Response carried no status metadata");
            return Err(ServiceError::InvalidResponseType);
        };

        if !(200..=299).contains(&head.status) {
            return Err(reject_status(kind, &head));
        }

        let body = match received.body {
            Some(body) if !body.is_empty() => body,
            _ => {
                tracing::debug!(endpoint = %kind, status = head.status, "Response body is empty");
                return Err(ServiceError::EmptyResponse);
            }
        };

        let value: Value = match serde_json::from_slice(&body) {
            Ok(value) => value,
            Err(e) => {
                // 轉成文字，方便記錄實際收到的內容
                let text = String::from_utf8(body).ok();
                tracing::warn!(
                    endpoint = %kind,
                    status = head.status,
                    "Response is not JSON ({}): {:?}",
                    e,
                    text
                );
                return Err(ServiceError::UnexpectedResponse {
                    status: head.status,
                    body: text,
                });
            }
        };

        self.shapes.shape_for(kind).decode(value).ok_or_else(|| {
            tracing::warn!(endpoint = %kind, status = head.status, "Response has unexpected shape");
            ServiceError::UnexpectedResponse {
                status: head.status,
                body: None,
            }
        })
    }
}

/// 非 2xx 狀態碼；目前全部歸為同一種錯誤
fn reject_status(kind: EndpointKind, head: &ResponseHead) -> ServiceError {
    tracing::debug!(endpoint = %kind, status = head.status, "Rejected non-success status");
    ServiceError::InvalidResponseType
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::TransportError;
    use chrono::Utc;
    use serde_json::json;

    fn respond(status: u16, body: &[u8]) -> Outcome {
        let now = Utc::now();
        Outcome::received(
            Some(ResponseHead {
                status,
                headers: vec![("content-type".to_string(), "application/json".to_string())],
            }),
            (!body.is_empty()).then(|| body.to_vec()),
            now,
            now,
        )
    }

    fn classifier() -> ResponseClassifier {
        ResponseClassifier::default()
    }

    #[test]
    fn test_transport_error_becomes_network_error() {
        let now = Utc::now();
        let outcome = Outcome::failed(
            TransportError::Connection {
                message: "connection refused".to_string(),
            },
            now,
            now,
        );

        let result = classifier().classify(EndpointKind::Seasons, outcome);
        assert!(matches!(result, Err(ServiceError::NetworkError(_))));
    }

    #[test]
    fn test_missing_head_is_invalid_response_type() {
        let outcome = Outcome {
            result: Ok(crate::domain::model::Received {
                head: None,
                body: Some(b"{}".to_vec()),
            }),
            started_at: None,
            finished_at: None,
        };

        let result = classifier().classify(EndpointKind::Products, outcome);
        assert!(matches!(result, Err(ServiceError::InvalidResponseType)));
    }

    #[test]
    fn test_non_success_status_ignores_body() {
        for status in [199, 301, 404, 500] {
            let result = classifier()
                .classify(EndpointKind::Products, respond(status, b"{\"ok\":1}"));
            assert!(
                matches!(result, Err(ServiceError::InvalidResponseType)),
                "status {}",
                status
            );
        }
    }

    #[test]
    fn test_success_range_bounds() {
        assert!(classifier()
            .classify(EndpointKind::Seasons, respond(200, b"{}"))
            .is_ok());
        assert!(classifier()
            .classify(EndpointKind::Seasons, respond(299, b"{}"))
            .is_ok());
    }

    #[test]
    fn test_empty_body_is_empty_response() {
        let result = classifier()
            .classify(EndpointKind::Seasons, respond(200, b""));
        assert!(matches!(result, Err(ServiceError::EmptyResponse)));

        let mut outcome = respond(204, b"");
        if let Ok(received) = outcome.result.as_mut() {
            received.body = Some(Vec::new());
        }
        let result = classifier().classify(EndpointKind::Seasons, outcome);
        assert!(matches!(result, Err(ServiceError::EmptyResponse)));
    }

    #[test]
    fn test_non_json_body_keeps_raw_text() {
        for kind in [
            EndpointKind::Promotions,
            EndpointKind::Seasons,
            EndpointKind::Products,
            EndpointKind::Details,
        ] {
            match classifier().classify(kind, respond(200, b"not json")) {
                Err(ServiceError::UnexpectedResponse { status, body }) => {
                    assert_eq!(status, 200);
                    assert_eq!(body.as_deref(), Some("not json"));
                }
                other => panic!("unexpected result for {}: {:?}", kind, other),
            }
        }
    }

    #[test]
    fn test_non_utf8_body_has_no_text() {
        let result = classifier()
            .classify(EndpointKind::Seasons, respond(200, &[0xff, 0xfe, 0x00]));
        assert!(matches!(
            result,
            Err(ServiceError::UnexpectedResponse { status: 200, body: None })
        ));
    }

    #[test]
    fn test_promotions_wraps_list() {
        let payload = classifier()
            .classify(EndpointKind::Promotions, respond(200, br#"[{"id":1}]"#))
            .unwrap();
        assert_eq!(Value::Object(payload), json!({"promotions": [{"id": 1}]}));
    }

    #[test]
    fn test_promotions_rejects_single_object() {
        let result = classifier()
            .classify(EndpointKind::Promotions, respond(200, br#"{"id":1}"#));
        assert!(matches!(
            result,
            Err(ServiceError::UnexpectedResponse { status: 200, body: None })
        ));
    }

    #[test]
    fn test_promotions_rejects_list_of_scalars() {
        let result = classifier()
            .classify(EndpointKind::Promotions, respond(200, b"[1,2,3]"));
        assert!(matches!(
            result,
            Err(ServiceError::UnexpectedResponse { body: None, .. })
        ));
    }

    #[test]
    fn test_object_endpoints_pass_through() {
        let payload = classifier()
            .classify(
                EndpointKind::Details,
                respond(200, br#"{"style":"ABC123","sizes":[38,39]}"#),
            )
            .unwrap();
        assert_eq!(payload.get("style"), Some(&json!("ABC123")));
        assert_eq!(payload.len(), 2);
    }

    #[test]
    fn test_object_endpoints_reject_array_and_fragments() {
        let bodies: [&[u8]; 3] = [b"[{\"id\":1}]", b"42", b"\"text\""];
        for body in bodies {
            let result = classifier()
                .classify(EndpointKind::Products, respond(200, body));
            assert!(matches!(
                result,
                Err(ServiceError::UnexpectedResponse { body: None, .. })
            ));
        }
    }

    #[test]
    fn test_custom_registry() {
        let mut shapes = ShapeRegistry::empty();
        shapes.register(
            EndpointKind::Seasons,
            ResponseShape::ObjectList { key: "seasons" },
        );
        let classifier = ResponseClassifier::new(shapes);

        let payload = classifier
            .classify(EndpointKind::Seasons, respond(200, br#"[{"name":"SS24"}]"#))
            .unwrap();
        assert!(payload.contains_key("seasons"));

        // 未註冊的 kind 使用 Object
        assert_eq!(
            classifier.shapes.shape_for(EndpointKind::Details),
            &ResponseShape::Object
        );
    }
}
