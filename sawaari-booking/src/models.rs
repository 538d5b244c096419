use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sawaari_core::notify::StoredAsset;
use sawaari_shared::contact::ContactDetails;

/// Payment status lifecycle: `Pending → Processing → {Paid, Cancelled}`.
/// Customer-driven transitions only move forward; the admin verdict may
/// jump straight from Pending when proof arrived out of band.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PaymentStatus {
    Pending,
    Processing,
    Paid,
    Cancelled,
}

impl PaymentStatus {
    /// Whether a customer may still submit (or re-submit) payment proof.
    pub fn accepts_proof(&self) -> bool {
        matches!(self, PaymentStatus::Pending | PaymentStatus::Processing)
    }

    /// The two statuses an admin verdict may set.
    pub fn is_verdict(&self) -> bool {
        matches!(self, PaymentStatus::Paid | PaymentStatus::Cancelled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "Pending",
            PaymentStatus::Processing => "Processing",
            PaymentStatus::Paid => "Paid",
            PaymentStatus::Cancelled => "Cancelled",
        }
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = sawaari_core::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(PaymentStatus::Pending),
            "Processing" => Ok(PaymentStatus::Processing),
            "Paid" => Ok(PaymentStatus::Paid),
            "Cancelled" => Ok(PaymentStatus::Cancelled),
            other => Err(sawaari_core::Error::Storage(format!(
                "Unknown payment status: {}",
                other
            ))),
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The central reservation entity. `tracking_code` is the short public
/// identifier customers use to check status; `guest_id` is the subject
/// the per-booking session credential was issued for.
#[derive(Debug, Clone, Serialize)]
pub struct Booking {
    pub id: Uuid,
    pub tracking_code: String,
    #[serde(skip_serializing)]
    pub guest_id: Uuid,
    pub departure_city: String,
    pub destination_city: String,
    pub departure_date: NaiveDate,
    pub departure_time: String,
    pub passengers: i32,
    pub selected_seats: Vec<String>,
    /// Price snapshot in paise, fixed when seats were confirmed. Never
    /// re-derived, even if admin later changes seat prices.
    pub total_amount: i32,
    pub payment_status: PaymentStatus,
    pub contact: Option<ContactDetails>,
    pub proof: Option<StoredAsset>,
    pub created_at: DateTime<Utc>,
}

/// Static operator contact details shown on the tracking page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderInfo {
    pub name: String,
    pub phone: String,
    pub email: String,
}

/// Public read-only projection returned by tracking lookups.
#[derive(Debug, Clone, Serialize)]
pub struct TrackingView {
    pub tracking_code: String,
    pub status: PaymentStatus,
    pub amount: i32,
    pub amount_display: String,
    pub route: String,
    pub travel_date: NaiveDate,
    pub departure_time: String,
    pub seats: Vec<String>,
    pub contact: Option<ContactDetails>,
    pub provider: ProviderInfo,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proof_submission_is_open_until_a_verdict() {
        assert!(PaymentStatus::Pending.accepts_proof());
        assert!(PaymentStatus::Processing.accepts_proof());
        assert!(!PaymentStatus::Paid.accepts_proof());
        assert!(!PaymentStatus::Cancelled.accepts_proof());
    }

    #[test]
    fn only_paid_and_cancelled_are_verdicts() {
        assert!(PaymentStatus::Paid.is_verdict());
        assert!(PaymentStatus::Cancelled.is_verdict());
        assert!(!PaymentStatus::Pending.is_verdict());
        assert!(!PaymentStatus::Processing.is_verdict());
    }

    #[test]
    fn guest_id_never_serializes() {
        let booking = Booking {
            id: Uuid::new_v4(),
            tracking_code: "AB12CD34".to_owned(),
            guest_id: Uuid::new_v4(),
            departure_city: "Dehradun".to_owned(),
            destination_city: "Jaipur".to_owned(),
            departure_date: "2025-12-30".parse().unwrap(),
            departure_time: "07:00 AM".to_owned(),
            passengers: 1,
            selected_seats: vec![],
            total_amount: 0,
            payment_status: PaymentStatus::Pending,
            contact: None,
            proof: None,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&booking).unwrap();
        assert!(json.get("guest_id").is_none());
        assert_eq!(json["payment_status"], "Pending");
    }
}
