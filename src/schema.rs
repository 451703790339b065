//! Per-step validation checks over the listing draft

use crate::draft::{
    BasicInfo, BookingAndPricing, Media, PropertyDetail, PropertyDraft, Step,
    TimingAndAvailability,
};
use crate::rules::Violations;
use std::collections::BTreeMap;

/// Outcome of checking one step: derived on demand, never stored
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepReport {
    pub valid: bool,
    /// All violations for the step, in schema-declaration order
    pub errors: Vec<String>,
}

impl StepReport {
    fn from_violations(violations: Violations) -> Self {
        let errors = violations.into_messages();
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    /// An unconditionally invalid report with no messages, used for
    /// out-of-range step numbers
    pub fn invalid() -> Self {
        Self {
            valid: false,
            errors: Vec::new(),
        }
    }
}

/// Step 1: identity and contact details
pub fn check_basic_info(section: &BasicInfo) -> StepReport {
    let mut v = Violations::new();
    v.required(&section.name, "Property name is required")
        .max_len(&section.name, 100, "Name too long")
        .min_len(
            &section.description,
            10,
            "Description must be at least 10 characters",
        )
        .max_len(&section.description, 500, "Description too long")
        .required(&section.address, "Address is required")
        .min_len(&section.contact_phone, 10, "Valid phone number required")
        .phone(&section.contact_phone, "Invalid phone format")
        .email(&section.contact_email, "Valid email required");
    StepReport::from_violations(v)
}

/// Step 2: offering details
pub fn check_property_detail(section: &PropertyDetail) -> StepReport {
    let mut v = Violations::new();
    v.non_empty(&section.sports, "At least one sport must be selected")
        .required(&section.surface_type, "Surface type is required");
    StepReport::from_violations(v)
}

/// Step 3: opening hours and booking windows
pub fn check_timing(section: &TimingAndAvailability) -> StepReport {
    let mut v = Violations::new();
    v.hh_mm(&section.opening_hours.open, "Invalid time format")
        .hh_mm(&section.opening_hours.close, "Invalid time format")
        .at_least(
            f64::from(section.slot_duration),
            15.0,
            "Minimum slot duration is 15 minutes",
        )
        .at_most(
            f64::from(section.slot_duration),
            480.0,
            "Maximum slot duration is 8 hours",
        )
        .at_least(
            f64::from(section.max_advance_days),
            1.0,
            "Minimum 1 day advance booking",
        )
        .at_most(
            f64::from(section.max_advance_days),
            365.0,
            "Maximum 365 days advance booking",
        )
        .at_most(
            f64::from(section.min_notice_hours),
            72.0,
            "Maximum 72 hours notice",
        );
    StepReport::from_violations(v)
}

/// Step 4: rates, fees, and cancellation terms
pub fn check_pricing(section: &BookingAndPricing) -> StepReport {
    let mut v = Violations::new();
    v.at_least(section.base_rate, 0.0, "Base rate must be a positive number");
    if let Some(fees) = &section.additional_fees {
        if let Some(fee) = fees.lighting_fee {
            v.at_least(fee, 0.0, "Lighting fee must be zero or more");
        }
        if let Some(fee) = fees.equipment_fee {
            v.at_least(fee, 0.0, "Equipment fee must be zero or more");
        }
        if let Some(fee) = fees.maintenance_surcharge {
            v.at_least(fee, 0.0, "Maintenance surcharge must be zero or more");
        }
    }
    v.at_least(
        section.security_deposit,
        0.0,
        "Security deposit must be zero or more",
    );
    if let Some(discounts) = &section.discounts {
        if let Some(pct) = discounts.early_bird_percent {
            v.at_least(pct, 0.0, "Early-bird discount cannot be negative");
            v.at_most(pct, 100.0, "Early-bird discount cannot exceed 100%");
        }
        if let Some(pct) = discounts.multi_day_discount_percent {
            v.at_least(pct, 0.0, "Multi-day discount cannot be negative");
            v.at_most(pct, 100.0, "Multi-day discount cannot exceed 100%");
        }
    }
    v.at_least(
        section.cancellation_policy.free_window_hours,
        0.0,
        "Free cancellation window must be zero or more",
    )
    .at_least(
        section.cancellation_policy.fee_percent,
        0.0,
        "Cancellation fee cannot be negative",
    )
    .at_most(
        section.cancellation_policy.fee_percent,
        100.0,
        "Fee cannot exceed 100%",
    )
    .at_least(
        section.cancellation_policy.no_show_charge,
        0.0,
        "No-show charge must be zero or more",
    );
    StepReport::from_violations(v)
}

/// Step 5: imagery
pub fn check_media(section: &Media) -> StepReport {
    let mut v = Violations::new();
    v.non_empty(&section.images, "At least one image is required");
    if let Some(video_url) = &section.video_url {
        v.url_or_empty(video_url, "Invalid video URL");
    }
    StepReport::from_violations(v)
}

/// Check one step of the draft
pub fn check_step(step: Step, draft: &PropertyDraft) -> StepReport {
    match step {
        Step::BasicInfo => check_basic_info(&draft.basic_info),
        Step::PropertyDetail => check_property_detail(&draft.property_detail),
        Step::TimingAndAvailability => check_timing(&draft.timing_and_availability),
        Step::BookingAndPricing => check_pricing(&draft.booking_and_pricing),
        Step::Media => check_media(&draft.media),
    }
}

/// Check by 1-based step number; numbers outside 1..=5 are invalid with no
/// messages
pub fn check_step_number(n: u8, draft: &PropertyDraft) -> StepReport {
    match Step::from_number(n) {
        Some(step) => check_step(step, draft),
        None => StepReport::invalid(),
    }
}

/// Check every step, keyed by step number in ascending order
pub fn check_draft(draft: &PropertyDraft) -> BTreeMap<u8, StepReport> {
    Step::ALL
        .iter()
        .map(|step| (step.number(), check_step(*step, draft)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::OpeningHours;

    fn valid_basic_info() -> BasicInfo {
        BasicInfo {
            name: "Riverside Courts".into(),
            description: "Six indoor courts with changing rooms.".into(),
            address: "12 River Road".into(),
            latitude: None,
            longitude: None,
            contact_phone: "+1 555 010 2030".into(),
            contact_email: "owner@riverside.example".into(),
        }
    }

    #[test]
    fn test_default_draft_fails_where_defaults_are_insufficient() {
        let draft = PropertyDraft::default();
        let reports = check_draft(&draft);
        assert!(!reports[&1].valid); // empty name, description, contacts
        assert!(!reports[&2].valid); // no sports, no surface type
        assert!(!reports[&3].valid); // empty opening hours
        assert!(reports[&4].valid); // pricing defaults are all in range
        assert!(!reports[&5].valid); // no images
    }

    #[test]
    fn test_basic_info_errors_in_declaration_order() {
        let section = BasicInfo {
            name: String::new(),
            description: "short".into(),
            ..valid_basic_info()
        };
        let report = check_basic_info(&section);
        assert!(!report.valid);
        assert_eq!(
            report.errors[..2],
            [
                "Property name is required".to_string(),
                "Description must be at least 10 characters".to_string(),
            ]
        );
    }

    #[test]
    fn test_basic_info_accepts_complete_section() {
        let report = check_basic_info(&valid_basic_info());
        assert!(report.valid, "unexpected errors: {:?}", report.errors);
    }

    #[test]
    fn test_timing_rejects_out_of_range_clock() {
        let section = TimingAndAvailability {
            opening_hours: OpeningHours {
                open: "25:00".into(),
                close: "18:00".into(),
            },
            ..Default::default()
        };
        let report = check_timing(&section);
        assert!(!report.valid);
        assert_eq!(report.errors, vec!["Invalid time format"]);
    }

    #[test]
    fn test_timing_accepts_valid_window() {
        let section = TimingAndAvailability {
            opening_hours: OpeningHours {
                open: "08:00".into(),
                close: "22:30".into(),
            },
            ..Default::default()
        };
        assert!(check_timing(&section).valid);
    }

    #[test]
    fn test_pricing_collects_all_violations() {
        let section = BookingAndPricing {
            base_rate: -5.0,
            security_deposit: -1.0,
            ..Default::default()
        };
        let report = check_pricing(&section);
        assert_eq!(
            report.errors,
            vec![
                "Base rate must be a positive number",
                "Security deposit must be zero or more",
            ]
        );
    }

    #[test]
    fn test_media_requires_an_image_and_valid_video_url() {
        let mut section = Media::default();
        let report = check_media(&section);
        assert_eq!(report.errors, vec!["At least one image is required"]);

        section.images = vec!["court.jpg".into()];
        section.video_url = Some("not a url".into());
        let report = check_media(&section);
        assert_eq!(report.errors, vec!["Invalid video URL"]);

        section.video_url = Some(String::new());
        assert!(check_media(&section).valid);
    }

    #[test]
    fn test_out_of_range_step_number_is_invalid_with_no_errors() {
        let draft = PropertyDraft::default();
        let report = check_step_number(0, &draft);
        assert!(!report.valid);
        assert!(report.errors.is_empty());
        let report = check_step_number(6, &draft);
        assert!(!report.valid);
        assert!(report.errors.is_empty());
    }
}
