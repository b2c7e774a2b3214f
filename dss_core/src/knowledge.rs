//! Disease knowledge base: the reference patterns symptoms are matched against.
//!
//! The built-in set is small and meant for local use and tests; a deployment
//! loads its own from JSON. [`KnowledgeBase::find_relevant`] is the
//! pre-filter the surrounding service applies before analysis. It only
//! narrows the input; the matcher produces the same ranking from the full set.

use crate::analysis::normalize;
use crate::{DiseasePattern, DiseaseSeverity, Error, Result, SymptomPattern};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Cached default knowledge base - built once and reused across all operations
static DEFAULT_KNOWLEDGE_BASE: Lazy<KnowledgeBase> = Lazy::new(build_default_knowledge_base);

/// Supplies the candidate diseases for a set of symptom names
pub trait CandidateSource {
    fn candidates(&self, symptom_names: &[String]) -> Vec<DiseasePattern>;
}

/// An unfiltered list: every disease is a candidate
impl CandidateSource for [DiseasePattern] {
    fn candidates(&self, _symptom_names: &[String]) -> Vec<DiseasePattern> {
        self.to_vec()
    }
}

impl CandidateSource for Vec<DiseasePattern> {
    fn candidates(&self, symptom_names: &[String]) -> Vec<DiseasePattern> {
        self.as_slice().candidates(symptom_names)
    }
}

/// A collection of disease patterns
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct KnowledgeBase {
    pub diseases: Vec<DiseasePattern>,
}

impl CandidateSource for KnowledgeBase {
    fn candidates(&self, symptom_names: &[String]) -> Vec<DiseasePattern> {
        self.find_relevant(symptom_names)
    }
}

impl KnowledgeBase {
    pub fn new(diseases: Vec<DiseasePattern>) -> Self {
        Self { diseases }
    }

    /// Get a reference to the cached built-in knowledge base
    pub fn builtin() -> &'static KnowledgeBase {
        &DEFAULT_KNOWLEDGE_BASE
    }

    /// Load a knowledge base from a JSON file and validate it
    ///
    /// Accepts either `{ "diseases": [...] }` or a bare array of diseases.
    pub fn load_from(path: &Path) -> Result<Self> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Document {
            Bare(Vec<DiseasePattern>),
            Wrapped(KnowledgeBase),
        }

        let contents = std::fs::read_to_string(path)?;
        let kb = match serde_json::from_str::<Document>(&contents)? {
            Document::Bare(diseases) => KnowledgeBase::new(diseases),
            Document::Wrapped(kb) => kb,
        };

        let errors = kb.validate();
        if !errors.is_empty() {
            return Err(Error::KnowledgeBase(errors.join("; ")));
        }

        tracing::info!("Loaded {} disease patterns from {:?}", kb.diseases.len(), path);
        Ok(kb)
    }

    /// Diseases sharing at least one symptom name with `symptom_names`
    pub fn find_relevant(&self, symptom_names: &[String]) -> Vec<DiseasePattern> {
        let wanted: HashSet<String> = symptom_names.iter().map(|s| normalize(s)).collect();

        let relevant: Vec<DiseasePattern> = self
            .diseases
            .iter()
            .filter(|d| {
                d.symptom_patterns
                    .iter()
                    .any(|p| wanted.contains(&normalize(&p.symptom_name)))
            })
            .cloned()
            .collect();

        tracing::debug!(
            "Found {} relevant diseases for {} symptoms",
            relevant.len(),
            symptom_names.len()
        );
        relevant
    }

    /// Validate the knowledge base
    ///
    /// Returns a list of human-readable problems; empty means valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let mut seen = HashSet::new();

        for disease in &self.diseases {
            let name = disease.disease_name.trim();
            if name.is_empty() {
                errors.push("Disease with empty name".to_string());
                continue;
            }
            if !seen.insert(normalize(name)) {
                errors.push(format!("Duplicate disease name: {}", name));
            }
            if disease.symptom_patterns.is_empty() {
                errors.push(format!("Disease {} has no symptom patterns", name));
            }
            for pattern in &disease.symptom_patterns {
                if pattern.symptom_name.trim().is_empty() {
                    errors.push(format!("Disease {} has a pattern with empty name", name));
                }
                if pattern.weight > 100 {
                    errors.push(format!(
                        "Disease {} pattern {} has weight {} (max 100)",
                        name, pattern.symptom_name, pattern.weight
                    ));
                }
            }
        }

        errors
    }
}

fn disease(
    name: &str,
    icd_code: &str,
    category: &str,
    severity: DiseaseSeverity,
    requires_immediate_attention: bool,
    patterns: Vec<SymptomPattern>,
    recommendations: &[&str],
) -> DiseasePattern {
    DiseasePattern {
        disease_name: name.into(),
        disease_name_en: Some(name.into()),
        icd_code: Some(icd_code.into()),
        category: category.into(),
        severity,
        requires_immediate_attention,
        recommendations: recommendations.iter().map(|r| r.to_string()).collect(),
        symptom_patterns: patterns,
    }
}

/// Builds the built-in reference disease patterns
pub fn build_default_knowledge_base() -> KnowledgeBase {
    let p = |name: &str, weight: u32, critical: bool| SymptomPattern::new(name, weight, critical);

    KnowledgeBase::new(vec![
        disease(
            "Migraine",
            "G43",
            "NEUROLOGICAL",
            DiseaseSeverity::Moderate,
            false,
            vec![
                p("Headache", 30, true),
                p("Nausea", 15, false),
                p("Light sensitivity", 20, false),
                p("Dizziness", 10, false),
            ],
            &[
                "Rest in a dark, quiet room",
                "Keep a headache diary to identify triggers",
            ],
        ),
        disease(
            "Tension headache",
            "G44.2",
            "NEUROLOGICAL",
            DiseaseSeverity::Mild,
            false,
            vec![
                p("Headache", 40, true),
                p("Neck pain", 20, false),
                p("Fatigue", 10, false),
            ],
            &["Manage stress and take regular breaks", "Stretch your neck and shoulders"],
        ),
        disease(
            "Common cold",
            "J00",
            "RESPIRATORY",
            DiseaseSeverity::Mild,
            false,
            vec![
                p("Runny nose", 30, false),
                p("Sore throat", 25, false),
                p("Cough", 20, false),
                p("Fever", 10, false),
            ],
            &["Rest and drink plenty of fluids", "See a doctor if fever lasts over 3 days"],
        ),
        disease(
            "Influenza",
            "J11",
            "RESPIRATORY",
            DiseaseSeverity::Moderate,
            false,
            vec![
                p("Fever", 30, true),
                p("Muscle aches", 20, false),
                p("Cough", 20, false),
                p("Fatigue", 15, false),
                p("Headache", 10, false),
            ],
            &["Rest and stay hydrated", "Avoid contact with others until fever-free"],
        ),
        disease(
            "Pneumonia",
            "J18",
            "RESPIRATORY",
            DiseaseSeverity::Severe,
            false,
            vec![
                p("Cough", 25, true),
                p("Fever", 25, true),
                p("Shortness of breath", 30, false),
                p("Chest pain", 15, false),
            ],
            &["See a doctor within 24 hours", "A chest X-ray may be needed"],
        ),
        disease(
            "Myocardial infarction",
            "I21",
            "CARDIOVASCULAR",
            DiseaseSeverity::Critical,
            true,
            vec![
                p("Chest pain", 40, true),
                p("Shortness of breath", 25, true),
                p("Dizziness", 15, false),
                p("Sweating", 10, false),
            ],
            &["Call emergency services immediately", "Chew aspirin if not allergic"],
        ),
        disease(
            "Gastroenteritis",
            "A09",
            "DIGESTIVE",
            DiseaseSeverity::Moderate,
            false,
            vec![
                p("Diarrhea", 35, true),
                p("Nausea", 20, false),
                p("Vomiting", 20, false),
                p("Abdominal pain", 15, false),
                p("Fever", 10, false),
            ],
            &["Replace fluids with oral rehydration salts", "Eat bland food"],
        ),
        disease(
            "Appendicitis",
            "K35",
            "DIGESTIVE",
            DiseaseSeverity::Critical,
            true,
            vec![
                p("Abdominal pain", 45, true),
                p("Nausea", 15, false),
                p("Vomiting", 15, false),
                p("Fever", 15, false),
            ],
            &["Go to the emergency department", "Do not eat or drink until examined"],
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(diseases: &[DiseasePattern]) -> Vec<&str> {
        diseases.iter().map(|d| d.disease_name.as_str()).collect()
    }

    #[test]
    fn test_builtin_loads() {
        let kb = KnowledgeBase::builtin();
        assert_eq!(kb.diseases.len(), 8);
    }

    #[test]
    fn test_builtin_validates() {
        let errors = build_default_knowledge_base().validate();
        assert!(errors.is_empty(), "Built-in knowledge base has errors: {:?}", errors);
    }

    #[test]
    fn test_find_relevant_normalizes_names() {
        let kb = build_default_knowledge_base();
        let relevant = kb.find_relevant(&["  HEADACHE ".to_string()]);

        assert_eq!(names(&relevant), vec!["Migraine", "Tension headache", "Influenza"]);
    }

    #[test]
    fn test_find_relevant_without_overlap() {
        let kb = build_default_knowledge_base();
        assert!(kb.find_relevant(&["Hiccups".to_string()]).is_empty());
    }

    #[test]
    fn test_unfiltered_source_returns_everything() {
        let kb = build_default_knowledge_base();
        let all = kb.diseases.candidates(&["Hiccups".to_string()]);
        assert_eq!(all.len(), kb.diseases.len());
    }

    #[test]
    fn test_validate_reports_problems() {
        let mut kb = build_default_knowledge_base();
        kb.diseases.push(kb.diseases[0].clone());
        kb.diseases[1].symptom_patterns[0].weight = 150;
        kb.diseases[2].symptom_patterns.clear();

        let errors = kb.validate();
        assert_eq!(errors.len(), 3, "{:?}", errors);
        assert!(errors.iter().any(|e| e.contains("Duplicate disease name: Migraine")));
        assert!(errors.iter().any(|e| e.contains("weight 150")));
        assert!(errors.iter().any(|e| e.contains("no symptom patterns")));
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("kb.json");

        let kb = build_default_knowledge_base();
        std::fs::write(&path, serde_json::to_string(&kb.diseases).unwrap()).unwrap();
        let loaded = KnowledgeBase::load_from(&path).unwrap();
        assert_eq!(loaded.diseases, kb.diseases);

        std::fs::write(&path, serde_json::to_string(&kb).unwrap()).unwrap();
        let wrapped = KnowledgeBase::load_from(&path).unwrap();
        assert_eq!(wrapped.diseases.len(), kb.diseases.len());
    }

    #[test]
    fn test_load_invalid_file_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("kb.json");
        std::fs::write(
            &path,
            r#"[{ "disease_name": "", "category": "X", "severity": "MILD", "symptom_patterns": [] }]"#,
        )
        .unwrap();

        assert!(matches!(
            KnowledgeBase::load_from(&path),
            Err(Error::KnowledgeBase(_))
        ));
    }
}
