//! Gauge configuration types
//!
//! Wire types exchanged with the monitoring backend plus the transient
//! attribute checklist entries the editor works on.

use serde::{Deserialize, Serialize};

/// A single sampled MBean attribute inside a persisted gauge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MBeanAttribute {
    pub name: String,
    /// Monotonically increasing value, sampled as a rate.
    #[serde(default)]
    pub counter: bool,
}

impl MBeanAttribute {
    pub fn new(name: impl Into<String>, counter: bool) -> Self {
        Self {
            name: name.into(),
            counter,
        }
    }
}

/// Persisted gauge definition.
///
/// `mbean_attributes` is kept sorted by name so structural equality against
/// the loaded snapshot is insensitive to the order attributes were checked in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GaugeConfig {
    /// Revision token; absent for a gauge that was never saved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub mbean_object_name: String,
    /// Server-derived label, only used for the heading
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub display: String,
    #[serde(default)]
    pub mbean_attributes: Vec<MBeanAttribute>,
}

impl GaugeConfig {
    /// Non-empty version token, if this gauge has been persisted.
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref().filter(|v| !v.is_empty())
    }

    pub fn has_mbean_object_name(&self) -> bool {
        !self.mbean_object_name.is_empty()
    }
}

/// One row of the attribute checklist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeChoice {
    pub name: String,
    pub checked: bool,
    pub counter: bool,
    /// `false` when the attribute was saved earlier but the live MBean no
    /// longer exposes it. Such rows stay selected until the user unchecks them.
    pub available: bool,
}

impl AttributeChoice {
    /// Unchecked, non-counter attribute reported by the live MBean.
    pub fn live(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            checked: false,
            counter: false,
            available: true,
        }
    }

    /// Previously saved attribute that the live MBean no longer reports.
    pub fn stale(name: impl Into<String>, counter: bool) -> Self {
        Self {
            name: name.into(),
            checked: true,
            counter,
            available: false,
        }
    }
}

/// Response of the gauge lookup and of the add/update endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GaugeResponse {
    pub config: GaugeConfig,
    #[serde(default)]
    pub mbean_unavailable: bool,
    #[serde(default)]
    pub mbean_unmatched: bool,
    #[serde(default)]
    pub mbean_available_attribute_names: Vec<String>,
}

/// Response of the attribute lookup for a freshly selected MBean.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MBeanAttributesResponse {
    #[serde(default)]
    pub mbean_unavailable: bool,
    #[serde(default)]
    pub mbean_unmatched: bool,
    /// Another gauge already claims this MBean
    #[serde(default, rename = "duplicateMBean")]
    pub duplicate_mbean: bool,
    #[serde(default)]
    pub mbean_attributes: Vec<String>,
}

/// Body posted to the add and update endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GaugeSavePayload {
    #[serde(flatten)]
    pub config: GaugeConfig,
    pub server_id: String,
}

/// Body posted to the remove endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GaugeRemovePayload {
    pub server_id: String,
    pub version: String,
}
