#![forbid(unsafe_code)]

//! Core domain model and scoring logic for the health decision-support system.
//!
//! This crate provides:
//! - Domain types (symptoms, disease patterns, metrics, profiles)
//! - Threshold rules over metrics and profiles
//! - Symptom-to-disease matching, urgency scoring and insights
//! - Point-based risk prediction
//! - File loaders and JSONL persistence used by the CLI
//!
//! Scoring functions are pure: callers fetch every input up front and get a
//! defined result back for any well-typed input.

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod history;
pub mod rules;
pub mod knowledge;
pub mod analysis;
pub mod risk;
pub mod input;
pub mod sink;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use knowledge::{CandidateSource, KnowledgeBase};
pub use rules::{evaluate_health_rules, evaluate_rules, Rule, RuleResult, Severity};
pub use analysis::{analyze_symptoms, Insight, SymptomAnalysis, UrgencyLevel};
pub use risk::{predict_health_risks, RiskContext, RiskLevel, RiskPrediction};
pub use sink::{JsonlSink, RecordSink};
