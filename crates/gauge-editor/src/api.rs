//! Typed gauge endpoints on top of [`HttpTransport`]

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use url::form_urlencoded;

use crate::error::EditorResult;
use crate::model::{
    GaugeRemovePayload, GaugeResponse, GaugeSavePayload, MBeanAttributesResponse,
};
use crate::transport::HttpTransport;

pub const GAUGES_PATH: &str = "backend/config/gauges";
pub const MATCHING_MBEAN_OBJECTS_PATH: &str = "backend/config/matching-mbean-objects";
pub const MBEAN_ATTRIBUTES_PATH: &str = "backend/config/mbean-attributes";
pub const GAUGE_ADD_PATH: &str = "backend/config/gauges/add";
pub const GAUGE_UPDATE_PATH: &str = "backend/config/gauges/update";
pub const GAUGE_REMOVE_PATH: &str = "backend/config/gauges/remove";

/// Encode `pairs` as a query string, including the leading `?`.
pub fn query_string(pairs: &[(&str, &str)]) -> String {
    let encoded = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish();
    format!("?{encoded}")
}

fn decode<T: DeserializeOwned>(value: Value) -> EditorResult<T> {
    Ok(serde_json::from_value(value)?)
}

/// Client for the gauge configuration endpoints.
#[derive(Clone)]
pub struct GaugeApi {
    transport: Arc<dyn HttpTransport>,
}

impl GaugeApi {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }

    /// Gauge at `version` together with the live state of its MBean.
    pub async fn gauge(&self, server_id: &str, version: &str) -> EditorResult<GaugeResponse> {
        let path = format!(
            "{GAUGES_PATH}{}",
            query_string(&[("server-id", server_id), ("version", version)])
        );
        decode(self.transport.get(&path).await?)
    }

    /// Object names matching a partial name, at most `limit` of them.
    pub async fn matching_mbean_objects(
        &self,
        server_id: &str,
        partial_object_name: &str,
        limit: usize,
    ) -> EditorResult<Vec<String>> {
        let limit = limit.to_string();
        let path = format!(
            "{MATCHING_MBEAN_OBJECTS_PATH}{}",
            query_string(&[
                ("server-id", server_id),
                ("partial-mbean-object-name", partial_object_name),
                ("limit", limit.as_str()),
            ])
        );
        decode(self.transport.get(&path).await?)
    }

    /// Attributes of `object_name`. `gauge_version` is empty for a new gauge
    /// and lets the backend skip the edited gauge in its duplicate check.
    pub async fn mbean_attributes(
        &self,
        server_id: &str,
        object_name: &str,
        gauge_version: &str,
    ) -> EditorResult<MBeanAttributesResponse> {
        let path = format!(
            "{MBEAN_ATTRIBUTES_PATH}{}",
            query_string(&[
                ("server-id", server_id),
                ("mbean-object-name", object_name),
                ("gauge-version", gauge_version),
            ])
        );
        decode(self.transport.get(&path).await?)
    }

    pub async fn add(&self, payload: &GaugeSavePayload) -> EditorResult<GaugeResponse> {
        self.post_config(GAUGE_ADD_PATH, payload).await
    }

    pub async fn update(&self, payload: &GaugeSavePayload) -> EditorResult<GaugeResponse> {
        self.post_config(GAUGE_UPDATE_PATH, payload).await
    }

    pub async fn remove(&self, payload: &GaugeRemovePayload) -> EditorResult<()> {
        let body = serde_json::to_value(payload)?;
        self.transport.post(GAUGE_REMOVE_PATH, body).await?;
        Ok(())
    }

    async fn post_config(
        &self,
        path: &str,
        payload: &GaugeSavePayload,
    ) -> EditorResult<GaugeResponse> {
        let body = serde_json::to_value(payload)?;
        decode(self.transport.post(path, body).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_string_escapes_object_names() {
        assert_eq!(
            query_string(&[
                ("server-id", "1"),
                ("mbean-object-name", "java.lang:type=Memory Pool,name=*"),
            ]),
            "?server-id=1&mbean-object-name=java.lang%3Atype%3DMemory+Pool%2Cname%3D*"
        );
    }

    #[test]
    fn query_string_keeps_empty_values() {
        assert_eq!(query_string(&[("gauge-version", "")]), "?gauge-version=");
    }
}
