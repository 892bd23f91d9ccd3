//! The shipment record the layout engine reads.
//!
//! Records arrive as camelCase JSON (the shape the tracking database stores).
//! Every scalar except the tracking number is optional; numeric-looking fields
//! have been stored both as strings and as numbers over time, so they are
//! normalized to text on the way in.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ShipmentStatus {
    #[default]
    Processing,
    InTransit,
    OutForDelivery,
    Delivered,
    /// A status outside the known set, kept verbatim.
    Other(String),
}

impl ShipmentStatus {
    pub fn label(&self) -> &str {
        match self {
            ShipmentStatus::Processing => "Processing",
            ShipmentStatus::InTransit => "In Transit",
            ShipmentStatus::OutForDelivery => "Out for Delivery",
            ShipmentStatus::Delivered => "Delivered",
            ShipmentStatus::Other(text) => text,
        }
    }
}

impl From<String> for ShipmentStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Processing" => ShipmentStatus::Processing,
            "In Transit" => ShipmentStatus::InTransit,
            "Out for Delivery" => ShipmentStatus::OutForDelivery,
            "Delivered" => ShipmentStatus::Delivered,
            _ => ShipmentStatus::Other(value),
        }
    }
}

impl From<ShipmentStatus> for String {
    fn from(value: ShipmentStatus) -> Self {
        value.label().to_string()
    }
}

impl fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Package {
    pub piece_type: Option<String>,
    pub description: Option<String>,
    pub dimensions: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub weight: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub quantity: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HistoryEvent {
    pub date: Option<String>,
    pub time: Option<String>,
    pub location: Option<String>,
    pub status: Option<String>,
    pub updated_by: Option<String>,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShipmentRecord {
    pub tracking_number: String,
    pub status: ShipmentStatus,

    pub shipper_name: Option<String>,
    pub shipper_address: Option<String>,
    pub receiver_name: Option<String>,
    pub receiver_address: Option<String>,

    pub origin: Option<String>,
    pub destination: Option<String>,
    pub carrier: Option<String>,
    pub carrier_reference_no: Option<String>,
    pub shipment_type: Option<String>,
    pub shipment_mode: Option<String>,

    pub product_name: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub quantity: Option<String>,
    pub payment_mode: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub freight_cost: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub weight: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub package_count: Option<String>,

    pub expected_delivery_date: Option<String>,
    pub departure_time: Option<String>,
    pub pickup_date: Option<String>,
    pub pickup_time: Option<String>,
    pub comments: Option<String>,

    pub packages: Vec<Package>,
    pub history: Vec<HistoryEvent>,

    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl ShipmentRecord {
    pub fn new(tracking_number: impl Into<String>) -> Self {
        Self {
            tracking_number: tracking_number.into(),
            ..Default::default()
        }
    }

    /// The declared package count, falling back to the number of listed packages.
    pub fn package_count_text(&self) -> String {
        match present(&self.package_count) {
            Some(count) => count.to_string(),
            None => self.packages.len().to_string(),
        }
    }
}

/// Treats blank strings the same as missing ones.
pub fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose {
        Text(String),
        Int(i64),
        Float(f64),
        Bool(bool),
    }

    Ok(match Option::<Loose>::deserialize(deserializer)? {
        None => None,
        Some(Loose::Text(s)) => Some(s),
        Some(Loose::Int(i)) => Some(i.to_string()),
        Some(Loose::Float(f)) if f.fract() == 0.0 && f.abs() < 1e15 => Some((f as i64).to_string()),
        Some(Loose::Float(f)) => Some(f.to_string()),
        Some(Loose::Bool(b)) => Some(b.to_string()),
    })
}
