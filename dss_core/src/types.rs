//! Core domain types for the health decision-support engine.
//!
//! This module defines the data the engine reads and produces:
//! - Symptoms and the disease knowledge base they are matched against
//! - Health metrics and the user's health profile
//!
//! Symptoms, metrics and profiles are owned by the surrounding service and
//! only read here. Derived outputs live next to the component that builds
//! them (`analysis`, `risk`, `rules`).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Symptoms
// ============================================================================

/// A user-reported symptom
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Symptom {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub body_part: Option<String>,
    /// Severity from 1 (mild) to 10 (severe)
    pub severity: u8,
    pub start_date: DateTime<Utc>,
    /// `None` while the symptom is still ongoing
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
}

impl Symptom {
    /// Create an active symptom starting at `start_date`
    pub fn active(name: impl Into<String>, severity: u8, start_date: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            body_part: None,
            severity,
            start_date,
            end_date: None,
        }
    }

    /// A symptom with no end date is active
    pub fn is_active(&self) -> bool {
        self.end_date.is_none()
    }
}

// ============================================================================
// Disease Knowledge Base Types
// ============================================================================

/// Severity tag carried by a disease pattern
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiseaseSeverity {
    Mild,
    Moderate,
    Severe,
    Critical,
}

impl DiseaseSeverity {
    /// Severe and critical conditions raise symptom urgency
    pub fn is_serious(self) -> bool {
        matches!(self, DiseaseSeverity::Severe | DiseaseSeverity::Critical)
    }
}

/// One symptom within a disease's diagnostic signature
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SymptomPattern {
    pub symptom_name: String,
    /// Relative importance, 0-100
    pub weight: u32,
    /// A missing critical symptom eliminates the disease
    #[serde(default)]
    pub is_critical: bool,
    /// Free-form descriptors such as "pulsating" or "persistent"
    #[serde(default)]
    pub qualifiers: Vec<String>,
}

impl SymptomPattern {
    pub fn new(symptom_name: impl Into<String>, weight: u32, is_critical: bool) -> Self {
        Self {
            symptom_name: symptom_name.into(),
            weight,
            is_critical,
            qualifiers: Vec::new(),
        }
    }
}

/// Reference data describing a disease and its symptom signature
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DiseasePattern {
    pub disease_name: String,
    #[serde(default)]
    pub disease_name_en: Option<String>,
    #[serde(default)]
    pub icd_code: Option<String>,
    /// NEUROLOGICAL, CARDIOVASCULAR, RESPIRATORY, DIGESTIVE, ...
    pub category: String,
    pub severity: DiseaseSeverity,
    #[serde(default)]
    pub requires_immediate_attention: bool,
    #[serde(default)]
    pub recommendations: Vec<String>,
    pub symptom_patterns: Vec<SymptomPattern>,
}

// ============================================================================
// Metrics and Profile
// ============================================================================

/// Kind of health measurement
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MetricType {
    Weight,
    BloodPressure,
    BloodSugar,
    HeartRate,
    BodyTemperature,
    Cholesterol,
    OxygenSaturation,
}

/// A single time-stamped measurement
///
/// Blood pressure readings carry `systolic`/`diastolic`; every other type
/// uses `value`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HealthMetric {
    pub metric_type: MetricType,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub systolic: Option<f64>,
    #[serde(default)]
    pub diastolic: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
    pub measured_at: DateTime<Utc>,
}

impl HealthMetric {
    /// A single-value reading (weight, blood sugar, heart rate, ...)
    pub fn reading(metric_type: MetricType, value: f64, measured_at: DateTime<Utc>) -> Self {
        Self {
            metric_type,
            value: Some(value),
            systolic: None,
            diastolic: None,
            unit: None,
            measured_at,
        }
    }

    /// A blood pressure reading
    pub fn blood_pressure(systolic: f64, diastolic: f64, measured_at: DateTime<Utc>) -> Self {
        Self {
            metric_type: MetricType::BloodPressure,
            value: None,
            systolic: Some(systolic),
            diastolic: Some(diastolic),
            unit: Some("mmHg".into()),
            measured_at,
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SmokingStatus {
    Never,
    Former,
    Current,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExerciseFrequency {
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
}

/// User health profile
///
/// `None` means the user never filled the field in, which is distinct from
/// an empty answer and lowers prediction confidence.
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct HealthProfile {
    #[serde(default)]
    pub bmi: Option<f64>,
    #[serde(default)]
    pub smoking_status: Option<SmokingStatus>,
    #[serde(default)]
    pub exercise_frequency: Option<ExerciseFrequency>,
    #[serde(default)]
    pub chronic_diseases: Vec<String>,
    #[serde(default)]
    pub family_medical_history: Option<Vec<String>>,
}

/// Age in whole years on `today`; zero for a birth date in the future
pub fn age_on(date_of_birth: NaiveDate, today: NaiveDate) -> u32 {
    today.years_since(date_of_birth).unwrap_or(0)
}
