// src/domain/registration.rs

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Store-assigned document id.
pub type RecordId = String;

/// Status shown for records that never got one.
pub const DEFAULT_STATUS: &str = "pending";

/// One vehicle's roadworthiness registration, as stored.
///
/// Every field is optional on read: old or hand-edited documents must still
/// load. Fields this type does not know about are kept in `extra` and written
/// back untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    /// Set from the document key on read, never stored in the body.
    #[serde(skip)]
    pub id: RecordId,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub owner_email: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub owner_phone: Option<String>,
    /// Older documents use `email` / `phone` instead of the owner-prefixed names.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub vehicle_type: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub registration_number: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub testing_date: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub expiring_date: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Registration {
    pub fn email(&self) -> Option<&str> {
        non_empty(self.owner_email.as_deref()).or(non_empty(self.email.as_deref()))
    }

    pub fn phone(&self) -> Option<&str> {
        non_empty(self.owner_phone.as_deref()).or(non_empty(self.phone.as_deref()))
    }

    pub fn status(&self) -> &str {
        non_empty(self.status.as_deref()).unwrap_or(DEFAULT_STATUS)
    }

    /// `submittedAt`, else the legacy `createdAt` passthrough field.
    pub fn submitted_or_created(&self) -> Option<&str> {
        non_empty(self.submitted_at.as_deref())
            .or_else(|| non_empty(self.extra.get("createdAt").and_then(Value::as_str)))
    }

    /// Short badge label for the vehicle type; unknown values pass through.
    pub fn vehicle_label(&self) -> String {
        match self.vehicle_type.as_deref() {
            None | Some("") => "N/A".to_string(),
            Some(raw) => VehicleType::parse(raw)
                .map(|t| t.short_label().to_string())
                .unwrap_or_else(|| raw.to_string()),
        }
    }

    /// Decode a stored document body and attach its id.
    pub fn from_document(id: &str, body: &str) -> Result<Self, serde_json::Error> {
        let mut reg: Registration = serde_json::from_str(body)?;
        reg.extra.remove("id");
        reg.id = id.to_string();
        Ok(reg)
    }

    pub fn to_document(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|v| !v.trim().is_empty())
}

/// Read a scalar as text. Numbers and booleans are stringified; anything
/// structured or null counts as absent.
fn lenient<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleType {
    TwoWheeler,
    ThreeWheeler,
    FourWheeler,
    HeavyVehicle,
}

impl VehicleType {
    pub const ALL: [VehicleType; 4] = [
        VehicleType::TwoWheeler,
        VehicleType::ThreeWheeler,
        VehicleType::FourWheeler,
        VehicleType::HeavyVehicle,
    ];

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == raw)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VehicleType::TwoWheeler => "2-wheeler",
            VehicleType::ThreeWheeler => "3-wheeler",
            VehicleType::FourWheeler => "4-wheeler",
            VehicleType::HeavyVehicle => "heavy-vehicle",
        }
    }

    pub fn short_label(self) -> &'static str {
        match self {
            VehicleType::TwoWheeler => "2W",
            VehicleType::ThreeWheeler => "3W",
            VehicleType::FourWheeler => "4W",
            VehicleType::HeavyVehicle => "HV",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            VehicleType::TwoWheeler => "2 Wheeler",
            VehicleType::ThreeWheeler => "3 Wheeler",
            VehicleType::FourWheeler => "4 Wheeler",
            VehicleType::HeavyVehicle => "Heavy Vehicle",
        }
    }
}
