//! File-backed stand-ins for the upstream data stores.
//!
//! The engine itself never reads files; these loaders let the CLI feed it
//! symptoms (JSON), a health profile (JSON) and metric history (CSV).

use crate::{Error, HealthMetric, HealthProfile, MetricType, Result, Symptom};
use chrono::{DateTime, Utc};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::path::Path;

/// Load a JSON array of symptoms
///
/// Fails on unreadable files, malformed JSON, empty names or severities
/// outside 1-10.
pub fn load_symptoms(path: &Path) -> Result<Vec<Symptom>> {
    let contents = std::fs::read_to_string(path)?;
    let symptoms: Vec<Symptom> = serde_json::from_str(&contents)?;

    for symptom in &symptoms {
        if symptom.name.trim().is_empty() {
            return Err(Error::InvalidInput("symptom with empty name".into()));
        }
        if !(1..=10).contains(&symptom.severity) {
            return Err(Error::InvalidInput(format!(
                "symptom {} has severity {} (expected 1-10)",
                symptom.name, symptom.severity
            )));
        }
    }

    tracing::info!("Loaded {} symptoms from {:?}", symptoms.len(), path);
    Ok(symptoms)
}

/// Load the user's health profile
///
/// Returns None if the file doesn't exist (the user has no profile yet).
/// Returns an error if the file exists but is malformed.
pub fn load_profile(path: &Path) -> Result<Option<HealthProfile>> {
    if !path.exists() {
        tracing::debug!("No health profile found at {:?}", path);
        return Ok(None);
    }

    let contents = std::fs::read_to_string(path)?;
    let profile: HealthProfile = serde_json::from_str(&contents)?;

    tracing::info!("Loaded health profile from {:?}", path);
    Ok(Some(profile))
}

/// CSV row format for metric history
#[derive(Debug, Deserialize)]
struct MetricRow {
    metric_type: String,
    value: Option<f64>,
    systolic: Option<f64>,
    diastolic: Option<f64>,
    unit: Option<String>,
    measured_at: String,
}

impl TryFrom<MetricRow> for HealthMetric {
    type Error = Error;

    fn try_from(row: MetricRow) -> Result<Self> {
        let metric_type = parse_metric_type(&row.metric_type)?;

        let measured_at = DateTime::parse_from_rfc3339(row.measured_at.trim())
            .map_err(|e| Error::InvalidInput(format!("Invalid date: {}", e)))?
            .with_timezone(&Utc);

        Ok(HealthMetric {
            metric_type,
            value: row.value,
            systolic: row.systolic,
            diastolic: row.diastolic,
            unit: row.unit.filter(|u| !u.trim().is_empty()),
            measured_at,
        })
    }
}

/// Parse a metric type name, accepting any case and `-` for `_`
fn parse_metric_type(s: &str) -> Result<MetricType> {
    match s.trim().to_uppercase().replace('-', "_").as_str() {
        "WEIGHT" => Ok(MetricType::Weight),
        "BLOOD_PRESSURE" | "BP" => Ok(MetricType::BloodPressure),
        "BLOOD_SUGAR" | "GLUCOSE" => Ok(MetricType::BloodSugar),
        "HEART_RATE" => Ok(MetricType::HeartRate),
        "BODY_TEMPERATURE" => Ok(MetricType::BodyTemperature),
        "CHOLESTEROL" => Ok(MetricType::Cholesterol),
        "OXYGEN_SATURATION" => Ok(MetricType::OxygenSaturation),
        other => Err(Error::InvalidInput(format!("Unknown metric type: {}", other))),
    }
}

/// Load metrics measured at or after `since` from a CSV file
///
/// Expected header: `metric_type,value,systolic,diastolic,unit,measured_at`.
/// Rows that fail to parse are logged and skipped. A missing file yields no
/// metrics.
pub fn load_metrics(path: &Path, since: DateTime<Utc>) -> Result<Vec<HealthMetric>> {
    if !path.exists() {
        tracing::debug!("No metric history found at {:?}", path);
        return Ok(Vec::new());
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut metrics = Vec::new();
    let mut skipped = 0usize;

    for result in reader.deserialize::<MetricRow>() {
        match result {
            Ok(row) => match HealthMetric::try_from(row) {
                Ok(metric) if metric.measured_at >= since => metrics.push(metric),
                Ok(_) => skipped += 1,
                Err(e) => tracing::warn!("Failed to parse metric row: {}", e),
            },
            Err(e) => tracing::warn!("Failed to deserialize metric row: {}", e),
        }
    }

    tracing::info!(
        "Loaded {} metrics from {:?} ({} older than {})",
        metrics.len(),
        path,
        skipped,
        since
    );
    Ok(metrics)
}
