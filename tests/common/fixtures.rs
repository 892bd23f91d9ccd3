use waybill::symbology::{BarcodeGenerator, EncodingError, QrGenerator, Symbology};
use waybill::types::{HistoryEvent, Package, RasterImage, ShipmentRecord, ShipmentStatus};

/// A fully populated record with `packages` package rows and `history` events.
pub fn sample_record(tracking_number: &str, packages: usize, history: usize) -> ShipmentRecord {
    let mut record = ShipmentRecord::new(tracking_number);
    record.status = ShipmentStatus::InTransit;
    record.shipper_name = Some("Acme Components Ltd".into());
    record.shipper_address = Some("12 Harbour Road, Tema, Ghana".into());
    record.receiver_name = Some("Nordic Retail AB".into());
    record.receiver_address = Some("Sveavägen 44, Stockholm, Sweden".into());
    record.origin = Some("Tema".into());
    record.destination = Some("Stockholm".into());
    record.carrier = Some("Express Logistics".into());
    record.shipment_type = Some("Air Freight".into());
    record.weight = Some("48.5".into());
    record.product_name = Some("Electronics".into());
    record.quantity = Some("3".into());
    record.payment_mode = Some("Prepaid".into());
    record.freight_cost = Some("1200".into());
    record.expected_delivery_date = Some("2024-06-01".into());
    record.packages = (0..packages)
        .map(|i| Package {
            piece_type: Some("Carton".into()),
            description: Some(format!("Package {}", i + 1)),
            dimensions: Some("40x30x20 cm".into()),
            weight: Some("4".into()),
            quantity: Some("1".into()),
        })
        .collect();
    record.history = (0..history)
        .map(|i| HistoryEvent {
            date: Some("2024-05-20".into()),
            time: Some(format!("{:02}:00", i % 24)),
            location: Some(format!("Hub {}", i + 1)),
            status: Some(format!("Checkpoint {}", i + 1)),
            updated_by: Some("ops".into()),
            remarks: None,
        })
        .collect();
    record
}

pub struct FailingBarcode;

impl BarcodeGenerator for FailingBarcode {
    fn encode(&self, _text: &str, _symbology: Symbology) -> Result<RasterImage, EncodingError> {
        Err(EncodingError::Barcode("encoder offline".into()))
    }
}

pub struct FailingQr;

impl QrGenerator for FailingQr {
    fn encode(&self, _data: &str) -> Result<RasterImage, EncodingError> {
        Err(EncodingError::Qr("encoder offline".into()))
    }
}

/// Produces a raster whose buffer does not match its size, so drawing it fails.
pub struct CorruptBarcode;

impl BarcodeGenerator for CorruptBarcode {
    fn encode(&self, _text: &str, _symbology: Symbology) -> Result<RasterImage, EncodingError> {
        Ok(RasterImage::new(10, 10, vec![0; 3]))
    }
}
