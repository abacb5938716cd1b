//! App environment models

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use super::null_as_default;

/// Variable name to value, as returned by the platform.
pub type VariableMap = BTreeMap<String, Value>;

/// Environment bundle of an app (`/v3/apps/:guid/env`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppEnvResource {
    /// Platform-injected variables
    #[serde(default, deserialize_with = "null_as_default")]
    pub system_env_json: SystemEnv,

    /// Staging environment variable group
    #[serde(default, deserialize_with = "null_as_default")]
    pub staging_env_json: VariableMap,

    /// Running environment variable group
    #[serde(default, deserialize_with = "null_as_default")]
    pub running_env_json: VariableMap,

    /// Variables set directly on the app
    #[serde(default, deserialize_with = "null_as_default")]
    pub environment_variables: VariableMap,
}

/// System environment block
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SystemEnv {
    /// Service offering label to bindings of that offering
    #[serde(rename = "VCAP_SERVICES", default, deserialize_with = "null_as_default")]
    pub vcap_services: ServiceOfferings,
}

/// `VCAP_SERVICES` entries (offering label to bindings) in platform order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceOfferings(pub Vec<(String, Vec<ServiceBindingResource>)>);

impl ServiceOfferings {
    /// Every binding, offering by offering, in platform order.
    pub fn bindings(&self) -> impl Iterator<Item = &ServiceBindingResource> {
        self.0.iter().flat_map(|(_, bindings)| bindings)
    }

    /// Bindings of one offering.
    pub fn get(&self, label: &str) -> Option<&[ServiceBindingResource]> {
        self.0
            .iter()
            .find(|(offering, _)| offering == label)
            .map(|(_, bindings)| bindings.as_slice())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for ServiceOfferings {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OfferingsVisitor;

        impl<'de> Visitor<'de> for OfferingsVisitor {
            type Value = ServiceOfferings;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of service offering to bindings")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((label, bindings)) =
                    map.next_entry::<String, Option<Vec<ServiceBindingResource>>>()?
                {
                    entries.push((label, bindings.unwrap_or_default()));
                }
                Ok(ServiceOfferings(entries))
            }
        }

        deserializer.deserialize_map(OfferingsVisitor)
    }
}

impl Serialize for ServiceOfferings {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (label, bindings) in &self.0 {
            map.serialize_entry(label, bindings)?;
        }
        map.end()
    }
}

/// One service binding inside `VCAP_SERVICES`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceBindingResource {
    /// Binding name
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    /// Service offering label
    #[serde(default, deserialize_with = "null_as_default")]
    pub label: String,

    /// Offering and instance tags
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
}
