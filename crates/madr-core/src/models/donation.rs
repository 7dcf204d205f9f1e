use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::envelope::null_as_empty;
use crate::validation::{CheckRequest, Validate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Success,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Success => "success",
            PaymentStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(PaymentStatus::Pending),
            "success" => Ok(PaymentStatus::Success),
            "failed" => Ok(PaymentStatus::Failed),
            other => Err(format!("unknown payment status '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonationCategoryInfo {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Donation {
    pub id: i64,
    pub category_id: i64,
    /// `None` for anonymous donors.
    #[serde(default)]
    pub donor_name: Option<String>,
    pub amount: f64,
    #[serde(default)]
    pub message: String,
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub category: Option<DonationCategoryInfo>,
}

impl Donation {
    pub fn donor_display(&self) -> &str {
        self.donor_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or("Anonymous")
    }

    pub fn category_name(&self) -> &str {
        self.category
            .as_ref()
            .map(|c| c.name.as_str())
            .unwrap_or(UNKNOWN_CATEGORY)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonationCategory {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Manually recorded donation (e.g. cash handed in at the mosque).
#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
pub struct CreateDonationRequest {
    #[validate(range(min = 1, message = "Category is required"))]
    pub category_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub donor_name: Option<String>,
    #[validate(range(exclusive_min = 0.0, message = "Amount must be greater than zero"))]
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<PaymentStatus>,
}

impl CheckRequest for CreateDonationRequest {
    const FIELDS: &'static [&'static str] = &["category_id", "amount"];
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Validate)]
pub struct UpdateDonationRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, message = "Category is required"))]
    pub category_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub donor_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(exclusive_min = 0.0, message = "Amount must be greater than zero"))]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<PaymentStatus>,
}

impl CheckRequest for UpdateDonationRequest {
    const FIELDS: &'static [&'static str] = &["category_id", "amount"];
}

const UNKNOWN_CATEGORY: &str = "Unknown";

/// One bar of the donations chart.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub name: String,
    pub amount: f64,
}

/// Sum donation amounts per category name, in first-seen order.
/// Donations without an embedded category land in "Unknown".
pub fn totals_by_category(donations: &[Donation]) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();
    for donation in donations {
        let name = donation.category_name();
        match totals.iter_mut().find(|t| t.name == name) {
            Some(total) => total.amount += donation.amount,
            None => totals.push(CategoryTotal {
                name: name.to_string(),
                amount: donation.amount,
            }),
        }
    }
    totals
}

/// Public donation counter. Only successful payments are counted.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DonationSummary {
    #[serde(default)]
    pub total_amount: f64,
    #[serde(default)]
    pub total_transactions: i64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub per_category: Vec<CategorySummary>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CategorySummary {
    pub category_id: i64,
    #[serde(rename = "category")]
    pub name: String,
    #[serde(default)]
    pub amount: f64,
}

impl DonationSummary {
    /// Chart bars in server order; a blank category name becomes "Unknown".
    pub fn totals(&self) -> Vec<CategoryTotal> {
        self.per_category
            .iter()
            .map(|c| CategoryTotal {
                name: if c.name.trim().is_empty() {
                    UNKNOWN_CATEGORY.to_string()
                } else {
                    c.name.clone()
                },
                amount: c.amount,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn donation(id: i64, category: Option<&str>, amount: f64) -> Donation {
        Donation {
            id,
            category_id: 1,
            donor_name: None,
            amount,
            message: String::new(),
            payment_status: PaymentStatus::Success,
            created_at: None,
            category: category.map(|name| DonationCategoryInfo {
                id: 1,
                name: name.to_string(),
                description: String::new(),
            }),
        }
    }

    #[test]
    fn test_parse_donation() {
        let json = r#"{"id":9,"category_id":2,"donor_name":null,"amount":150000,"message":"","payment_status":"success","created_at":"2026-03-10T08:00:00Z","category":{"id":2,"name":"Zakat","description":""}}"#;
        let d: Donation = serde_json::from_str(json).expect("valid donation");
        assert_eq!(d.donor_display(), "Anonymous");
        assert_eq!(d.category_name(), "Zakat");
        assert_eq!(d.payment_status, PaymentStatus::Success);
    }

    #[test]
    fn test_totals_by_category() {
        let donations = vec![
            donation(1, Some("Infaq"), 50_000.0),
            donation(2, None, 10_000.0),
            donation(3, Some("Zakat"), 250_000.0),
            donation(4, Some("Infaq"), 25_000.0),
        ];
        let totals = totals_by_category(&donations);
        let names: Vec<&str> = totals.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Infaq", "Unknown", "Zakat"]);
        assert_eq!(totals[0].amount, 75_000.0);
    }

    #[test]
    fn test_create_donation_validation() {
        let req = CreateDonationRequest {
            category_id: 0,
            donor_name: None,
            amount: -5.0,
            message: None,
            payment_status: Some(PaymentStatus::Success),
        };
        let errors = req.check().unwrap_err();
        assert_eq!(errors.for_field("category_id"), Some("Category is required"));
        assert_eq!(
            errors.for_field("amount"),
            Some("Amount must be greater than zero")
        );
    }

    #[test]
    fn test_update_donation_checks_only_set_fields() {
        assert!(UpdateDonationRequest::default().check().is_ok());
        let req = UpdateDonationRequest {
            amount: Some(0.0),
            ..Default::default()
        };
        let errors = req.check().unwrap_err();
        assert_eq!(errors.errors().len(), 1);
        assert!(errors.for_field("amount").is_some());
    }

    #[test]
    fn test_parse_summary_with_null_categories() {
        let json = r#"{"total_amount":0,"total_transactions":0,"per_category":null}"#;
        let summary: DonationSummary = serde_json::from_str(json).expect("valid summary");
        assert!(summary.per_category.is_empty());
        assert!(summary.totals().is_empty());
    }

    #[test]
    fn test_summary_totals_name_blank_category_unknown() {
        let json = r#"{"total_amount":75000,"total_transactions":3,"per_category":[{"category_id":1,"category":"Infaq","amount":50000},{"category_id":0,"category":"","amount":25000}]}"#;
        let summary: DonationSummary = serde_json::from_str(json).expect("valid summary");
        let names: Vec<String> = summary.totals().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["Infaq".to_string(), "Unknown".to_string()]);
    }

    #[test]
    fn test_payment_status_round_trip_text() {
        assert_eq!("Success".parse::<PaymentStatus>(), Ok(PaymentStatus::Success));
        assert_eq!(PaymentStatus::Failed.to_string(), "failed");
    }
}
