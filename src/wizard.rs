//! Step-validation glue between the schema checks and the live draft

use crate::draft::Step;
use crate::form::FormSession;
use crate::schema::{self, StepReport};
use std::collections::BTreeMap;

/// Per-step readiness over a live [`FormSession`].
///
/// Nothing is cached: every call re-reads the current draft, so results
/// always reflect the latest edits.
pub struct StepValidation<'a> {
    form: &'a FormSession,
}

impl<'a> StepValidation<'a> {
    pub fn new(form: &'a FormSession) -> Self {
        Self { form }
    }

    /// Check one step by number; out-of-range numbers are invalid
    pub fn validate_step(&self, n: u8) -> bool {
        self.step_report(n).valid
    }

    /// Full report for one step
    pub fn step_report(&self, n: u8) -> StepReport {
        self.form.read_with(|draft| schema::check_step_number(n, draft))
    }

    /// Error messages for one step, in schema-declaration order
    pub fn step_errors(&self, n: u8) -> Vec<String> {
        self.step_report(n).errors
    }

    /// Validity of all five steps, keyed by step number in ascending order
    pub fn all_validation_status(&self) -> BTreeMap<u8, bool> {
        self.form.read_with(|draft| {
            Step::ALL
                .iter()
                .map(|step| (step.number(), schema::check_step(*step, draft).valid))
                .collect()
        })
    }

    /// Whether every step passes
    pub fn validate_entire_form(&self) -> bool {
        self.all_validation_status().values().all(|valid| *valid)
    }

    /// round(100 × valid steps / 5)
    pub fn completion_percentage(&self) -> u8 {
        let valid = self
            .all_validation_status()
            .values()
            .filter(|valid| **valid)
            .count() as u32;
        ((valid * 100 + 2) / 5) as u8
    }

    /// Lowest-numbered invalid step, scanning 1..=5 ascending; `None` when
    /// the whole form is valid
    pub fn next_invalid_step(&self) -> Option<u8> {
        self.all_validation_status()
            .iter()
            .find(|(_, valid)| !**valid)
            .map(|(n, _)| *n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::{
        BasicInfoPatch, MediaPatch, OpeningHours, PropertyDetailPatch, TimingPatch,
    };
    use crate::observer::NoOpObserver;
    use crate::storage::InMemoryStore;
    use std::sync::Arc;

    fn empty_form() -> FormSession {
        FormSession::new(Arc::new(InMemoryStore::new()), Arc::new(NoOpObserver))
    }

    async fn fill_basic_info(form: &FormSession) {
        form.update_basic_info(BasicInfoPatch {
            name: Some("Riverside Courts".into()),
            description: Some("Six indoor courts with changing rooms.".into()),
            address: Some("12 River Road".into()),
            contact_phone: Some("+1 555 010 2030".into()),
            contact_email: Some("owner@riverside.example".into()),
            ..Default::default()
        })
        .await;
    }

    async fn fill_timing(form: &FormSession) {
        form.update_timing(TimingPatch {
            opening_hours: Some(OpeningHours {
                open: "08:00".into(),
                close: "22:00".into(),
            }),
            ..Default::default()
        })
        .await;
    }

    #[tokio::test]
    async fn test_default_draft_statuses() {
        let form = empty_form();
        let validation = StepValidation::new(&form);
        let status = validation.all_validation_status();

        // Pricing defaults are self-consistent; everything else needs input
        assert_eq!(status[&1], false);
        assert_eq!(status[&2], false);
        assert_eq!(status[&3], false);
        assert_eq!(status[&4], true);
        assert_eq!(status[&5], false);
    }

    #[tokio::test]
    async fn test_next_invalid_step_scans_ascending() {
        let form = empty_form();
        // Make steps 1 and 3 valid, leave 2 invalid
        fill_basic_info(&form).await;
        fill_timing(&form).await;

        let validation = StepValidation::new(&form);
        assert!(validation.validate_step(1));
        assert!(validation.validate_step(3));
        assert_eq!(validation.next_invalid_step(), Some(2));
    }

    #[tokio::test]
    async fn test_validation_reflects_latest_edits() {
        let form = empty_form();
        let validation = StepValidation::new(&form);
        assert!(!validation.validate_step(1));

        fill_basic_info(&form).await;
        assert!(validation.validate_step(1));
    }

    #[tokio::test]
    async fn test_completion_percentage_rounds() {
        let form = empty_form();
        let validation = StepValidation::new(&form);
        // Only step 4 is valid by default: round(100 / 5) = 20
        assert_eq!(validation.completion_percentage(), 20);

        fill_basic_info(&form).await;
        assert_eq!(validation.completion_percentage(), 40);
    }

    #[tokio::test]
    async fn test_entire_form_valid_once_every_step_passes() {
        let form = empty_form();
        fill_basic_info(&form).await;
        fill_timing(&form).await;
        form.update_property_detail(PropertyDetailPatch {
            sports: Some(vec!["padel".into()]),
            surface_type: Some("artificial grass".into()),
            ..Default::default()
        })
        .await;
        form.update_media(MediaPatch {
            images: Some(vec!["court.jpg".into()]),
            ..Default::default()
        })
        .await;

        let validation = StepValidation::new(&form);
        assert!(validation.validate_entire_form());
        assert_eq!(validation.next_invalid_step(), None);
        assert_eq!(validation.completion_percentage(), 100);
    }

    #[tokio::test]
    async fn test_out_of_range_step_is_invalid() {
        let form = empty_form();
        let validation = StepValidation::new(&form);
        assert!(!validation.validate_step(0));
        assert!(!validation.validate_step(9));
        assert!(validation.step_errors(9).is_empty());
    }
}
