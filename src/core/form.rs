//! The invoice submission form
//!
//! [`InvoiceForm`] holds the raw values exactly as posted so that a rejected
//! submission can be shown again unchanged. [`InvoiceForm::parse`] runs the
//! field validators and converts the strings into a typed [`NewInvoice`].

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::error::{FieldValidationError, ValidationError};
use crate::core::invoice::{DEFAULT_GST_PERCENTAGE, NewInvoice};

/// Date format used by the form's date input
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const REQUIRED_MESSAGE: &str = "This field is required.";

/// Field names in display order
pub const FORM_FIELDS: [&str; 9] = [
    "invoice_no",
    "invoice_date",
    "client_name",
    "client_address",
    "client_gstin",
    "subscription_period",
    "amount",
    "gst_percentage",
    "razorpay_txn_id",
];

/// Raw form submission
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct InvoiceForm {
    #[validate(
        custom(function = "no_control_characters"),
        length(max = 50, message = "Field cannot be longer than 50 characters.")
    )]
    pub invoice_no: String,

    #[validate(custom(function = "required"))]
    pub invoice_date: String,

    #[validate(
        custom(function = "required"),
        length(max = 255, message = "Field cannot be longer than 255 characters.")
    )]
    pub client_name: String,

    #[validate(custom(function = "required"))]
    pub client_address: String,

    #[validate(length(max = 20, message = "Field cannot be longer than 20 characters."))]
    pub client_gstin: String,

    #[validate(
        custom(function = "required"),
        length(max = 50, message = "Field cannot be longer than 50 characters.")
    )]
    pub subscription_period: String,

    #[validate(custom(function = "required"))]
    pub amount: String,

    #[validate(custom(function = "required"))]
    pub gst_percentage: String,

    #[validate(length(max = 100, message = "Field cannot be longer than 100 characters."))]
    pub razorpay_txn_id: String,
}

fn required(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(
            validator::ValidationError::new("required").with_message(Cow::Borrowed(REQUIRED_MESSAGE))
        );
    }
    Ok(())
}

/// The invoice number ends up in the `Content-Disposition` filename
fn no_control_characters(value: &str) -> Result<(), validator::ValidationError> {
    if value.chars().any(char::is_control) {
        return Err(validator::ValidationError::new("invalid_characters")
            .with_message(Cow::Borrowed("Invoice number contains invalid characters.")));
    }
    Ok(())
}

/// Limits of a fixed-point column, `NUMERIC(precision, scale)`
struct NumericLimits {
    integer_digits: u32,
    scale: u32,
}

const AMOUNT_LIMITS: NumericLimits = NumericLimits {
    integer_digits: 8,
    scale: 2,
};

const GST_PERCENTAGE_LIMITS: NumericLimits = NumericLimits {
    integer_digits: 3,
    scale: 2,
};

impl InvoiceForm {
    /// Empty form as first shown: today's date and the default GST rate
    pub fn with_defaults(today: NaiveDate) -> Self {
        Self {
            invoice_date: today.format(DATE_FORMAT).to_string(),
            gst_percentage: DEFAULT_GST_PERCENTAGE.to_string(),
            ..Default::default()
        }
    }

    /// Validate the submission and convert it into a [`NewInvoice`]
    ///
    /// All problems are collected; the error lists them in form order.
    pub fn parse(&self) -> Result<NewInvoice, ValidationError> {
        let mut errors = Vec::new();

        if let Err(report) = self.validate() {
            for (field, field_errors) in report.field_errors() {
                for error in field_errors.iter() {
                    let message = error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| error.code.to_string());
                    errors.push(FieldValidationError::new(field.to_string(), message));
                }
            }
        }

        let invoice_date = parse_date("invoice_date", &self.invoice_date, &mut errors);
        let amount = parse_decimal("amount", &self.amount, &AMOUNT_LIMITS, &mut errors);
        let gst_percentage = parse_decimal(
            "gst_percentage",
            &self.gst_percentage,
            &GST_PERCENTAGE_LIMITS,
            &mut errors,
        );

        if !errors.is_empty() {
            errors.sort_by_key(|e| {
                FORM_FIELDS
                    .iter()
                    .position(|f| *f == e.field)
                    .unwrap_or(FORM_FIELDS.len())
            });
            return Err(ValidationError::FieldErrors(errors));
        }

        Ok(NewInvoice {
            invoice_no: optional(&self.invoice_no),
            invoice_date,
            client_name: self.client_name.clone(),
            client_address: self.client_address.clone(),
            client_gstin: optional(&self.client_gstin),
            subscription_period: self.subscription_period.clone(),
            amount: amount.unwrap_or_default(),
            gst_percentage,
            razorpay_txn_id: optional(&self.razorpay_txn_id),
        })
    }
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Blank input is left to the `required` validator
fn parse_date(
    field: &str,
    raw: &str,
    errors: &mut Vec<FieldValidationError>,
) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(_) => {
            errors.push(FieldValidationError::new(field, "Not a valid date value."));
            None
        }
    }
}

fn parse_decimal(
    field: &str,
    raw: &str,
    limits: &NumericLimits,
    errors: &mut Vec<FieldValidationError>,
) -> Option<Decimal> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let Ok(value) = Decimal::from_str(raw) else {
        errors.push(FieldValidationError::new(field, "Not a valid decimal value."));
        return None;
    };

    if value.is_sign_negative() && !value.is_zero() {
        errors.push(FieldValidationError::new(field, "Must not be negative."));
        return None;
    }
    if value.normalize().scale() > limits.scale {
        errors.push(FieldValidationError::new(
            field,
            format!("At most {} decimal places are allowed.", limits.scale),
        ));
        return None;
    }
    if value.trunc() >= Decimal::from(10u64.pow(limits.integer_digits)) {
        errors.push(FieldValidationError::new(
            field,
            format!("At most {} digits before the decimal point.", limits.integer_digits),
        ));
        return None;
    }

    Some(value)
}

/// Field errors keyed by field name, for re-displaying the form
pub fn errors_by_field(error: &ValidationError) -> BTreeMap<String, Vec<String>> {
    let mut map: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for e in error.fields() {
        map.entry(e.field.clone()).or_default().push(e.message.clone());
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn valid_form() -> InvoiceForm {
        InvoiceForm {
            invoice_date: "2024-04-01".to_string(),
            client_name: "Acme Pvt Ltd".to_string(),
            client_address: "12 MG Road\nPune".to_string(),
            subscription_period: "FY 2024-25".to_string(),
            amount: "1000.00".to_string(),
            gst_percentage: "18".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults_prefill_date_and_rate() {
        let today = NaiveDate::from_ymd_opt(2024, 7, 9).unwrap();
        let form = InvoiceForm::with_defaults(today);
        assert_eq!(form.invoice_date, "2024-07-09");
        assert_eq!(form.gst_percentage, "18");
        assert!(form.client_name.is_empty());
    }

    #[test]
    fn test_valid_form_parses() {
        let new = valid_form().parse().unwrap();

        assert_eq!(new.invoice_no, None);
        assert_eq!(new.invoice_date, NaiveDate::from_ymd_opt(2024, 4, 1));
        assert_eq!(new.amount, dec!(1000.00));
        assert_eq!(new.gst_percentage, Some(dec!(18)));
        assert_eq!(new.client_gstin, None);
        assert_eq!(new.razorpay_txn_id, None);
    }

    #[test]
    fn test_optional_fields_are_trimmed() {
        let form = InvoiceForm {
            invoice_no: " INV-A1 ".to_string(),
            client_gstin: "27AAPFU0939F1ZV ".to_string(),
            razorpay_txn_id: "  ".to_string(),
            ..valid_form()
        };
        let new = form.parse().unwrap();
        assert_eq!(new.invoice_no.as_deref(), Some("INV-A1"));
        assert_eq!(new.client_gstin.as_deref(), Some("27AAPFU0939F1ZV"));
        assert_eq!(new.razorpay_txn_id, None);
    }

    #[test]
    fn test_missing_required_fields_are_all_reported_in_order() {
        let err = InvoiceForm::default().parse().unwrap_err();
        let fields: Vec<&str> = err.fields().iter().map(|e| e.field.as_str()).collect();

        assert_eq!(
            fields,
            vec![
                "invoice_date",
                "client_name",
                "client_address",
                "subscription_period",
                "amount",
                "gst_percentage",
            ]
        );
        assert_eq!(err.messages_for("client_name"), vec!["This field is required."]);
    }

    #[test]
    fn test_whitespace_only_is_missing() {
        let form = InvoiceForm {
            client_name: "   ".to_string(),
            ..valid_form()
        };
        let err = form.parse().unwrap_err();
        assert_eq!(err.messages_for("client_name"), vec!["This field is required."]);
    }

    #[test]
    fn test_malformed_values() {
        let form = InvoiceForm {
            invoice_date: "01/04/2024".to_string(),
            amount: "one thousand".to_string(),
            gst_percentage: "18%".to_string(),
            ..valid_form()
        };
        let err = form.parse().unwrap_err();

        assert_eq!(err.messages_for("invoice_date"), vec!["Not a valid date value."]);
        assert_eq!(err.messages_for("amount"), vec!["Not a valid decimal value."]);
        assert_eq!(err.messages_for("gst_percentage"), vec!["Not a valid decimal value."]);
    }

    #[test]
    fn test_numeric_limits() {
        let negative = InvoiceForm {
            amount: "-5".to_string(),
            ..valid_form()
        };
        assert_eq!(
            negative.parse().unwrap_err().messages_for("amount"),
            vec!["Must not be negative."]
        );

        let too_precise = InvoiceForm {
            amount: "10.005".to_string(),
            ..valid_form()
        };
        assert!(too_precise.parse().is_err());

        let trailing_zeros = InvoiceForm {
            amount: "10.500".to_string(),
            ..valid_form()
        };
        assert_eq!(trailing_zeros.parse().unwrap().amount, dec!(10.5));

        let too_large = InvoiceForm {
            amount: "100000000".to_string(),
            ..valid_form()
        };
        assert!(too_large.parse().is_err());

        let largest = InvoiceForm {
            amount: "99999999.99".to_string(),
            ..valid_form()
        };
        assert!(largest.parse().is_ok());

        let rate = InvoiceForm {
            gst_percentage: "1000".to_string(),
            ..valid_form()
        };
        assert!(rate.parse().is_err());
    }

    #[test]
    fn test_zero_amount_is_accepted() {
        let form = InvoiceForm {
            amount: "0".to_string(),
            gst_percentage: "0".to_string(),
            ..valid_form()
        };
        let new = form.parse().unwrap();
        assert!(new.amount.is_zero());
        assert_eq!(new.gst_percentage, Some(Decimal::ZERO));
    }

    #[test]
    fn test_length_limits() {
        let form = InvoiceForm {
            client_gstin: "X".repeat(21),
            ..valid_form()
        };
        let err = form.parse().unwrap_err();
        assert_eq!(
            err.messages_for("client_gstin"),
            vec!["Field cannot be longer than 20 characters."]
        );
    }

    #[test]
    fn test_control_characters_in_invoice_no_rejected() {
        for invoice_no in ["A\nB", "INV\t7", "INV\u{7f}1"] {
            let form = InvoiceForm {
                invoice_no: invoice_no.to_string(),
                ..valid_form()
            };
            let err = form.parse().unwrap_err();
            assert_eq!(
                err.messages_for("invoice_no"),
                vec!["Invoice number contains invalid characters."]
            );
        }

        let form = InvoiceForm {
            invoice_no: "  Rechnung-Ä/7 ".to_string(),
            ..valid_form()
        };
        assert_eq!(form.parse().unwrap().invoice_no.as_deref(), Some("Rechnung-Ä/7"));
    }

    #[test]
    fn test_errors_by_field_groups_messages() {
        let err = InvoiceForm::default().parse().unwrap_err();
        let map = errors_by_field(&err);
        assert_eq!(map["amount"], vec!["This field is required.".to_string()]);
        assert!(!map.contains_key("invoice_no"));
    }
}
