//! Property-listing draft: five sections, defaults, and section patches

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One of the five listing-form steps, numbered 1..=5 in progression order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Step {
    BasicInfo = 1,
    PropertyDetail = 2,
    TimingAndAvailability = 3,
    BookingAndPricing = 4,
    Media = 5,
}

impl Step {
    /// All steps in ascending progression order
    pub const ALL: [Step; 5] = [
        Step::BasicInfo,
        Step::PropertyDetail,
        Step::TimingAndAvailability,
        Step::BookingAndPricing,
        Step::Media,
    ];

    /// Map a 1-based step number; out-of-range yields `None`
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::BasicInfo),
            2 => Some(Self::PropertyDetail),
            3 => Some(Self::TimingAndAvailability),
            4 => Some(Self::BookingAndPricing),
            5 => Some(Self::Media),
            _ => None,
        }
    }

    pub fn number(&self) -> u8 {
        *self as u8
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::BasicInfo => "Basic info",
            Self::PropertyDetail => "Property details",
            Self::TimingAndAvailability => "Timing & availability",
            Self::BookingAndPricing => "Booking & pricing",
            Self::Media => "Media",
        }
    }
}

/// How a venue can be booked
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingMode {
    #[default]
    #[serde(rename = "slots")]
    Slots,
    #[serde(rename = "full-day")]
    FullDay,
}

/// How bookings are priced
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PricingModel {
    #[default]
    #[serde(rename = "hourly")]
    Hourly,
    #[serde(rename = "daily")]
    Daily,
    #[serde(rename = "mixed")]
    Mixed,
}

/// Step 1: identity and contact details
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicInfo {
    pub name: String,
    pub description: String,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub contact_phone: String,
    pub contact_email: String,
}

/// Step 2: what the property offers
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDetail {
    pub sports: Vec<String>,
    /// Court/pitch counts keyed by sub-unit name
    pub sub_units: HashMap<String, u32>,
    pub surface_type: String,
    pub facilities: Vec<String>,
    pub equipment_rental: bool,
    pub accessibility: Vec<String>,
    pub additional_amenities: Vec<String>,
}

/// Daily opening window, `HH:MM` 24-hour
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OpeningHours {
    pub open: String,
    pub close: String,
}

/// Step 3: when the venue can be booked
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingAndAvailability {
    pub opening_hours: OpeningHours,
    pub booking_mode: BookingMode,
    /// Minutes per bookable slot
    pub slot_duration: u32,
    pub max_advance_days: u32,
    pub min_notice_hours: u32,
}

impl Default for TimingAndAvailability {
    fn default() -> Self {
        Self {
            opening_hours: OpeningHours::default(),
            booking_mode: BookingMode::Slots,
            slot_duration: 60,
            max_advance_days: 30,
            min_notice_hours: 2,
        }
    }
}

/// Optional per-booking surcharges
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalFees {
    pub lighting_fee: Option<f64>,
    pub equipment_fee: Option<f64>,
    pub maintenance_surcharge: Option<f64>,
}

/// Optional discount percentages
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discounts {
    pub early_bird_percent: Option<f64>,
    pub multi_day_discount_percent: Option<f64>,
}

/// Cancellation terms
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancellationPolicy {
    pub free_window_hours: f64,
    pub fee_percent: f64,
    pub no_show_charge: f64,
}

impl Default for CancellationPolicy {
    fn default() -> Self {
        Self {
            free_window_hours: 24.0,
            fee_percent: 0.0,
            no_show_charge: 0.0,
        }
    }
}

/// Step 4: rates and booking terms
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingAndPricing {
    pub pricing_model: PricingModel,
    pub base_rate: f64,
    pub additional_fees: Option<AdditionalFees>,
    pub security_deposit: f64,
    pub pre_booking: bool,
    pub full_day_booking: bool,
    pub discounts: Option<Discounts>,
    pub cancellation_policy: CancellationPolicy,
}

/// Step 5: imagery and publication state
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    pub images: Vec<String>,
    pub video_url: Option<String>,
    pub floor_plan: Option<String>,
    pub is_active: bool,
}

impl Default for Media {
    fn default() -> Self {
        Self {
            images: Vec::new(),
            video_url: None,
            floor_plan: None,
            is_active: true,
        }
    }
}

/// The in-progress, persisted, multi-section listing submission
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDraft {
    pub basic_info: BasicInfo,
    pub property_detail: PropertyDetail,
    pub timing_and_availability: TimingAndAvailability,
    pub booking_and_pricing: BookingAndPricing,
    pub media: Media,
}

// === Section patches ===
//
// All-`Option` mirrors of each section. Applying a patch shallow-merges it
// into the section: `Some` fields overwrite, `None` fields are left alone.

#[derive(Clone, Debug, Default)]
pub struct BasicInfoPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<Option<f64>>,
    pub longitude: Option<Option<f64>>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
}

impl BasicInfoPatch {
    pub fn apply(self, section: &mut BasicInfo) {
        if let Some(v) = self.name {
            section.name = v;
        }
        if let Some(v) = self.description {
            section.description = v;
        }
        if let Some(v) = self.address {
            section.address = v;
        }
        if let Some(v) = self.latitude {
            section.latitude = v;
        }
        if let Some(v) = self.longitude {
            section.longitude = v;
        }
        if let Some(v) = self.contact_phone {
            section.contact_phone = v;
        }
        if let Some(v) = self.contact_email {
            section.contact_email = v;
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct PropertyDetailPatch {
    pub sports: Option<Vec<String>>,
    pub sub_units: Option<HashMap<String, u32>>,
    pub surface_type: Option<String>,
    pub facilities: Option<Vec<String>>,
    pub equipment_rental: Option<bool>,
    pub accessibility: Option<Vec<String>>,
    pub additional_amenities: Option<Vec<String>>,
}

impl PropertyDetailPatch {
    pub fn apply(self, section: &mut PropertyDetail) {
        if let Some(v) = self.sports {
            section.sports = v;
        }
        if let Some(v) = self.sub_units {
            section.sub_units = v;
        }
        if let Some(v) = self.surface_type {
            section.surface_type = v;
        }
        if let Some(v) = self.facilities {
            section.facilities = v;
        }
        if let Some(v) = self.equipment_rental {
            section.equipment_rental = v;
        }
        if let Some(v) = self.accessibility {
            section.accessibility = v;
        }
        if let Some(v) = self.additional_amenities {
            section.additional_amenities = v;
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct TimingPatch {
    pub opening_hours: Option<OpeningHours>,
    pub booking_mode: Option<BookingMode>,
    pub slot_duration: Option<u32>,
    pub max_advance_days: Option<u32>,
    pub min_notice_hours: Option<u32>,
}

impl TimingPatch {
    pub fn apply(self, section: &mut TimingAndAvailability) {
        if let Some(v) = self.opening_hours {
            section.opening_hours = v;
        }
        if let Some(v) = self.booking_mode {
            section.booking_mode = v;
        }
        if let Some(v) = self.slot_duration {
            section.slot_duration = v;
        }
        if let Some(v) = self.max_advance_days {
            section.max_advance_days = v;
        }
        if let Some(v) = self.min_notice_hours {
            section.min_notice_hours = v;
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct PricingPatch {
    pub pricing_model: Option<PricingModel>,
    pub base_rate: Option<f64>,
    pub additional_fees: Option<Option<AdditionalFees>>,
    pub security_deposit: Option<f64>,
    pub pre_booking: Option<bool>,
    pub full_day_booking: Option<bool>,
    pub discounts: Option<Option<Discounts>>,
    pub cancellation_policy: Option<CancellationPolicy>,
}

impl PricingPatch {
    pub fn apply(self, section: &mut BookingAndPricing) {
        if let Some(v) = self.pricing_model {
            section.pricing_model = v;
        }
        if let Some(v) = self.base_rate {
            section.base_rate = v;
        }
        if let Some(v) = self.additional_fees {
            section.additional_fees = v;
        }
        if let Some(v) = self.security_deposit {
            section.security_deposit = v;
        }
        if let Some(v) = self.pre_booking {
            section.pre_booking = v;
        }
        if let Some(v) = self.full_day_booking {
            section.full_day_booking = v;
        }
        if let Some(v) = self.discounts {
            section.discounts = v;
        }
        if let Some(v) = self.cancellation_policy {
            section.cancellation_policy = v;
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct MediaPatch {
    pub images: Option<Vec<String>>,
    pub video_url: Option<Option<String>>,
    pub floor_plan: Option<Option<String>>,
    pub is_active: Option<bool>,
}

impl MediaPatch {
    pub fn apply(self, section: &mut Media) {
        if let Some(v) = self.images {
            section.images = v;
        }
        if let Some(v) = self.video_url {
            section.video_url = v;
        }
        if let Some(v) = self.floor_plan {
            section.floor_plan = v;
        }
        if let Some(v) = self.is_active {
            section.is_active = v;
        }
    }
}

/// A patch scoped to one section of the draft
#[derive(Clone, Debug)]
pub enum SectionPatch {
    BasicInfo(BasicInfoPatch),
    PropertyDetail(PropertyDetailPatch),
    Timing(TimingPatch),
    Pricing(PricingPatch),
    Media(MediaPatch),
}

impl SectionPatch {
    /// The step this patch belongs to
    pub fn step(&self) -> Step {
        match self {
            Self::BasicInfo(_) => Step::BasicInfo,
            Self::PropertyDetail(_) => Step::PropertyDetail,
            Self::Timing(_) => Step::TimingAndAvailability,
            Self::Pricing(_) => Step::BookingAndPricing,
            Self::Media(_) => Step::Media,
        }
    }

    /// Shallow-merge this patch into the draft, last write wins per field
    pub fn apply(self, draft: &mut PropertyDraft) {
        match self {
            Self::BasicInfo(p) => p.apply(&mut draft.basic_info),
            Self::PropertyDetail(p) => p.apply(&mut draft.property_detail),
            Self::Timing(p) => p.apply(&mut draft.timing_and_availability),
            Self::Pricing(p) => p.apply(&mut draft.booking_and_pricing),
            Self::Media(p) => p.apply(&mut draft.media),
        }
    }
}
