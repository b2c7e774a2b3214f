use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use dss_core::sink::{read_records, INSIGHTS_FILE, PREDICTIONS_FILE};
use dss_core::*;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "hdss")]
#[command(about = "Health decision-support system", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank likely conditions for the active symptoms and score urgency
    Analyze {
        /// JSON array of symptoms
        #[arg(long)]
        symptoms: PathBuf,

        /// JSON knowledge base to use instead of the built-in one
        #[arg(long)]
        knowledge: Option<PathBuf>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// Append the generated insight to the data directory
        #[arg(long)]
        save: bool,
    },

    /// Predict cardiovascular, diabetes and weight-trend risk
    Risk {
        /// JSON health profile
        #[arg(long)]
        profile: PathBuf,

        /// CSV metric history
        #[arg(long)]
        metrics: PathBuf,

        /// Age in years
        #[arg(long, conflicts_with = "birth_date")]
        age: Option<u32>,

        /// Date of birth (YYYY-MM-DD), used to derive the age
        #[arg(long)]
        birth_date: Option<NaiveDate>,

        /// Print the predictions as JSON
        #[arg(long)]
        json: bool,

        /// Append the predictions to the data directory
        #[arg(long)]
        save: bool,
    },

    /// Run the threshold rules over a profile and metric history
    Rules {
        /// JSON health profile
        #[arg(long)]
        profile: PathBuf,

        /// CSV metric history
        #[arg(long)]
        metrics: PathBuf,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show saved insights or predictions
    History {
        /// Show saved risk predictions instead of insights
        #[arg(long)]
        predictions: bool,

        /// Number of most recent records to show
        #[arg(long, default_value = "10")]
        limit: usize,

        /// Print the records as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the built-in reference diseases
    Knowledge {
        /// Only validate, exit non-zero on problems
        #[arg(long)]
        validate: bool,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    dss_core::logging::init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let data_dir = cli
        .data_dir
        .unwrap_or_else(|| config.data.data_dir.clone());
    tracing::debug!("Using data directory {:?}", data_dir);

    match cli.command {
        Commands::Analyze {
            symptoms,
            knowledge,
            json,
            save,
        } => cmd_analyze(&symptoms, knowledge.as_deref(), json, save, &data_dir, &config),
        Commands::Risk {
            profile,
            metrics,
            age,
            birth_date,
            json,
            save,
        } => {
            let age = age.or_else(|| birth_date.map(|dob| age_on(dob, Utc::now().date_naive())));
            cmd_risk(&profile, &metrics, age, json, save, &data_dir, &config)
        }
        Commands::Rules {
            profile,
            metrics,
            json,
        } => cmd_rules(&profile, &metrics, json, &config),
        Commands::History {
            predictions,
            limit,
            json,
        } => cmd_history(predictions, limit, json, &data_dir),
        Commands::Knowledge { validate } => cmd_knowledge(validate),
    }
}

fn cmd_analyze(
    symptoms_path: &Path,
    knowledge_path: Option<&Path>,
    json: bool,
    save: bool,
    data_dir: &Path,
    config: &Config,
) -> Result<()> {
    let symptoms = input::load_symptoms(symptoms_path)?;
    tracing::info!("Loaded {} symptoms from {:?}", symptoms.len(), symptoms_path);

    let loaded;
    let source: &dyn CandidateSource = match knowledge_path {
        Some(path) => {
            loaded = KnowledgeBase::load_from(path)?;
            tracing::info!("Using knowledge base {:?}", path);
            &loaded
        }
        None => KnowledgeBase::builtin(),
    };

    let now = Utc::now();
    let analysis = analyze_symptoms(&symptoms, source, now, &config.analysis);

    if save {
        if let Some(insight) = &analysis.insight {
            let mut sink = JsonlSink::new(data_dir.join(INSIGHTS_FILE));
            sink.append(insight)?;
            tracing::info!("Saved insight {} to {:?}", insight.id, sink.path());
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        display_analysis(&analysis);
        if save && analysis.insight.is_some() {
            println!("\n✓ Insight saved");
        }
    }

    Ok(())
}

fn cmd_risk(
    profile_path: &Path,
    metrics_path: &Path,
    age: Option<u32>,
    json: bool,
    save: bool,
    data_dir: &Path,
    config: &Config,
) -> Result<()> {
    let now = Utc::now();
    let profile = input::load_profile(profile_path)?;
    let since = config.risk.window_start(now);
    let metrics = input::load_metrics(metrics_path, since)?;
    tracing::info!("Loaded {} metrics since {}", metrics.len(), since);

    let ctx = RiskContext {
        now,
        age,
        profile: profile.as_ref(),
        metrics: &metrics,
    };
    let predictions = predict_health_risks(&ctx);

    if save && !predictions.is_empty() {
        let mut sink = JsonlSink::new(data_dir.join(PREDICTIONS_FILE));
        for prediction in &predictions {
            sink.append(prediction)?;
        }
        tracing::info!("Saved {} predictions to {:?}", predictions.len(), sink.path());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&predictions)?);
        return Ok(());
    }

    if profile.is_none() {
        println!("No health profile found - nothing to predict.");
        return Ok(());
    }

    for prediction in &predictions {
        display_prediction(prediction);
    }

    if save {
        println!("✓ Saved {} predictions", predictions.len());
    }

    Ok(())
}

fn cmd_rules(profile_path: &Path, metrics_path: &Path, json: bool, config: &Config) -> Result<()> {
    let profile = input::load_profile(profile_path)?;
    let since = config.risk.window_start(Utc::now());
    let metrics = input::load_metrics(metrics_path, since)?;
    tracing::info!("Loaded {} metrics since {}", metrics.len(), since);

    let result = evaluate_health_rules(profile.as_ref(), &metrics);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    if !result.has_results() {
        println!("No rules fired.");
        return Ok(());
    }

    println!("Highest severity: {}", result.highest_severity);
    println!();
    for (name, recommendation) in result
        .fired_rule_names
        .iter()
        .zip(&result.recommendations)
    {
        println!("  [{}] {}", name, recommendation);
    }

    Ok(())
}

fn cmd_history(predictions: bool, limit: usize, json: bool, data_dir: &Path) -> Result<()> {
    if predictions {
        let records: Vec<RiskPrediction> = read_records(&data_dir.join(PREDICTIONS_FILE))?;
        let recent = newest(&records, limit);

        if json {
            println!("{}", serde_json::to_string_pretty(recent)?);
        } else if recent.is_empty() {
            println!("No saved predictions.");
        } else {
            for prediction in recent {
                println!(
                    "{}  {}: {} (score {:.1})",
                    prediction.predicted_at.format("%Y-%m-%d %H:%M"),
                    prediction.target_condition,
                    prediction.risk_level,
                    prediction.risk_score
                );
            }
        }
    } else {
        let records: Vec<Insight> = read_records(&data_dir.join(INSIGHTS_FILE))?;
        let recent = newest(&records, limit);

        if json {
            println!("{}", serde_json::to_string_pretty(recent)?);
        } else if recent.is_empty() {
            println!("No saved insights.");
        } else {
            for insight in recent {
                println!(
                    "{}  [P{}] {} (expires {})",
                    insight.generated_at.format("%Y-%m-%d %H:%M"),
                    insight.priority,
                    insight.title,
                    insight.expires_at.format("%Y-%m-%d")
                );
            }
        }
    }

    Ok(())
}

/// Last `limit` records in file (append) order
fn newest<T>(records: &[T], limit: usize) -> &[T] {
    &records[records.len().saturating_sub(limit)..]
}

fn cmd_knowledge(validate: bool) -> Result<()> {
    let kb = KnowledgeBase::builtin();
    let errors = kb.validate();

    if !errors.is_empty() {
        eprintln!("Knowledge base validation errors:");
        for error in &errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::KnowledgeBase("Invalid knowledge base".into()));
    }

    if validate {
        println!("✓ Knowledge base is valid ({} diseases)", kb.diseases.len());
        return Ok(());
    }

    for disease in &kb.diseases {
        let attention = if disease.requires_immediate_attention {
            " [urgent]"
        } else {
            ""
        };
        println!(
            "{} ({}) - {} {:?}{}",
            disease.disease_name,
            disease.icd_code.as_deref().unwrap_or("-"),
            disease.category,
            disease.severity,
            attention
        );
        for pattern in &disease.symptom_patterns {
            let marker = if pattern.is_critical { "*" } else { " " };
            println!("   {} {} ({})", marker, pattern.symptom_name, pattern.weight);
        }
    }

    Ok(())
}

fn display_analysis(analysis: &SymptomAnalysis) {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  SYMPTOM ANALYSIS");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!(
        "  Urgency: {} ({:.0}/100)",
        analysis.urgency_level, analysis.urgency_score
    );
    println!();

    if !analysis.ranked_diseases.is_empty() {
        println!("  Possible conditions:");
        for (i, disease) in analysis.ranked_diseases.iter().enumerate() {
            println!(
                "  {}. {} ({:.0}% match)",
                i + 1,
                disease.disease_name,
                disease.match_score * 100.0
            );
        }
        println!();
    }

    println!("  Recommendations:");
    for recommendation in &analysis.recommendations {
        for line in recommendation.lines() {
            println!("  → {}", line.trim());
        }
    }

    println!();
    println!("  {}", analysis.note);
}

fn display_prediction(prediction: &RiskPrediction) {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  {}", prediction.target_condition.to_uppercase());
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!(
        "  Risk: {} (score {:.1}, confidence {:.0}%)",
        prediction.risk_level, prediction.risk_score, prediction.confidence_score
    );
    if let Some(trend) = prediction.trend {
        println!("  Trend: {}", trend);
    }

    if !prediction.risk_factors.is_empty() {
        println!();
        println!("  Risk factors:");
        for factor in &prediction.risk_factors {
            println!("  - {}", factor);
        }
    }

    if !prediction.protective_factors.is_empty() {
        println!();
        println!("  Protective factors:");
        for factor in &prediction.protective_factors {
            println!("  + {}", factor);
        }
    }

    println!();
    for recommendation in &prediction.recommendations {
        println!("  → {}", recommendation);
    }

    println!();
    println!(
        "  Valid until {} ({})",
        prediction.valid_until.format("%Y-%m-%d"),
        prediction.algorithm
    );
}
