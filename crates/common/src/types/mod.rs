use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// Readiness verdict for the three backing stores.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Readiness {
    /// "ready" or "degraded"
    pub status: String,
    pub version: String,
    pub env: String,
    pub services: ServiceStates,
}

/// Per-store probe outcomes. `s3` is `None` (serialized as null) when object
/// storage is not configured: the probe is neither required nor run.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ServiceStates {
    pub s3: Option<bool>,
    pub db: bool,
    pub redis: bool,
}

impl Readiness {
    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}

/// Outcome of one store's self-test sequence. Slots are independent: a
/// failure here says nothing about the other two stores.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct StoreCheck {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StoreCheck {
    pub fn passed(key: impl Into<String>) -> Self {
        Self { ok: true, key: Some(key.into()), error: None }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self { ok: false, key: None, error: Some(error.into()) }
    }
}

/// Aggregated result of one self-test invocation; built fresh per call and
/// returned to the caller uninterpreted.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SelfTestReport {
    pub s3: StoreCheck,
    pub db: StoreCheck,
    pub redis: StoreCheck,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_check_serializes_without_empty_fields() {
        let check = StoreCheck::passed("selftest/123.txt");
        let json = serde_json::to_value(&check).unwrap();
        assert_eq!(json["ok"], true);
        assert_eq!(json["key"], "selftest/123.txt");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn unconfigured_s3_is_null_in_readiness() {
        let r = Readiness {
            status: "ready".into(),
            version: "0.1.0".into(),
            env: "dev".into(),
            services: ServiceStates { s3: None, db: true, redis: true },
        };
        let json = serde_json::to_value(&r).unwrap();
        assert!(json["services"]["s3"].is_null());
        assert_eq!(json["services"]["db"], true);
    }
}
