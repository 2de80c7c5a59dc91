//! CLI command definitions and handlers

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use itertools::Itertools;
use mimizuku_core::{KnowledgeBase, OntologyKnowledgeBase, OntologyLoader, OwlIri, TripleOntologyLoader};
use mimizuku_learn::{ConceptLearner, LearnerConfig, LearningProblem, Prediction};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Main CLI structure
#[derive(Parser)]
#[command(name = "mimizuku")]
#[command(about = "EL concept learning over OWL knowledge bases")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Learn a concept for every learning problem and classify the rest
    Learn {
        /// Ontology as a JSON array of triples
        #[arg(long)]
        ontology: PathBuf,

        /// Learning problems as a JSON array
        #[arg(long)]
        problems: PathBuf,

        /// Refinement rounds after the seed round (overrides --config)
        #[arg(long)]
        steps: Option<usize>,

        /// Stop as soon as a concept scores 1.0
        #[arg(long)]
        terminate_on_goal: bool,

        /// Learner configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output file for the predictions
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Print the refinements of a concept
    Refine {
        /// Ontology as a JSON array of triples
        #[arg(long)]
        ontology: PathBuf,

        /// Class IRI to refine; ⊤ when omitted
        #[arg(long)]
        class: Option<String>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Show ontology statistics
    Info {
        /// Ontology as a JSON array of triples
        #[arg(long)]
        ontology: PathBuf,
    },
}

/// Output format options
#[derive(Clone, Debug, PartialEq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    JsonPretty,
}

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("No learning problems in {0}")]
    NoProblems(PathBuf),
}

/// Command execution result
pub struct CommandResult {
    pub success: bool,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

/// Execute CLI commands
#[derive(Default)]
pub struct CommandExecutor {
    loader: TripleOntologyLoader,
}

impl CommandExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Execute a CLI command
    pub fn execute(&self, command: Commands) -> Result<CommandResult> {
        match command {
            Commands::Learn { ontology, problems, steps, terminate_on_goal, config, output, format } => {
                let config = resolve_config(config.as_deref(), steps, terminate_on_goal)?;
                self.execute_learn(&ontology, &problems, config, output, format)
            }
            Commands::Refine { ontology, class, format } => self.execute_refine(&ontology, class, format),
            Commands::Info { ontology } => self.execute_info(&ontology),
        }
    }

    fn load_knowledge_base(&self, path: &Path) -> Result<OntologyKnowledgeBase> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read ontology {}", path.display()))?;
        let ontology = self
            .loader
            .load_from_json(&content)
            .with_context(|| format!("Failed to load ontology {}", path.display()))?;
        Ok(OntologyKnowledgeBase::new(&ontology))
    }

    fn execute_learn(
        &self,
        ontology: &Path,
        problems: &Path,
        config: LearnerConfig,
        output: Option<PathBuf>,
        format: OutputFormat,
    ) -> Result<CommandResult> {
        let kb = self.load_knowledge_base(ontology)?;
        let problems_list = LearningProblem::load_all_from_file(problems)?;
        if problems_list.is_empty() {
            return Err(CommandError::NoProblems(problems.to_path_buf()).into());
        }

        info!("Learning {} problems with {:?}", problems_list.len(), config);
        let learner = ConceptLearner::new(&kb, config);
        let mut predictions: Vec<Prediction> = Vec::with_capacity(problems_list.len());
        let mut failures = Vec::new();
        for problem in &problems_list {
            match learner.fit_and_predict(problem) {
                Ok(prediction) => predictions.push(prediction),
                Err(err) => {
                    warn!("Learning problem {} failed: {}", problem.name, err);
                    failures.push(format!("{}: {}", problem.name, err));
                }
            }
        }

        let result = match format {
            OutputFormat::Text => predictions.iter().map(render_prediction).join("\n"),
            OutputFormat::Json => serde_json::to_string(&predictions)?,
            OutputFormat::JsonPretty => serde_json::to_string_pretty(&predictions)?,
        };

        if let Some(output_path) = output {
            std::fs::write(&output_path, &result)
                .with_context(|| format!("Failed to write {}", output_path.display()))?;
        } else {
            println!("{}", result);
        }

        let message = if failures.is_empty() {
            format!("Learned {} problems", predictions.len())
        } else {
            format!("Learned {} problems, {} failed: {}", predictions.len(), failures.len(), failures.join("; "))
        };
        Ok(CommandResult {
            success: failures.is_empty(),
            message,
            data: Some(serde_json::json!({ "predictions": predictions, "failures": failures })),
        })
    }

    fn execute_refine(&self, ontology: &Path, class: Option<String>, format: OutputFormat) -> Result<CommandResult> {
        let kb = self.load_knowledge_base(ontology)?;
        let concept = match class {
            Some(iri) => kb.atomic(&OwlIri::new(iri))?,
            None => kb.thing(),
        };

        let learner = ConceptLearner::new(&kb, LearnerConfig::default());
        let refinements: Vec<serde_json::Value> = learner
            .refine(&concept)?
            .iter()
            .map(|refined| {
                serde_json::json!({
                    "concept": refined.to_string(),
                    "length": refined.length(),
                    "instances": refined.instances().len(),
                })
            })
            .collect();

        let result = match format {
            OutputFormat::Text => {
                let mut output = format!("{} refinements of {}:\n", refinements.len(), concept);
                for refined in &refinements {
                    output.push_str(&format!(
                        "  {} (length {}, {} instances)\n",
                        refined["concept"].as_str().unwrap_or_default(),
                        refined["length"],
                        refined["instances"]
                    ));
                }
                output
            }
            OutputFormat::Json => serde_json::to_string(&refinements)?,
            OutputFormat::JsonPretty => serde_json::to_string_pretty(&refinements)?,
        };

        println!("{}", result);

        Ok(CommandResult {
            success: true,
            message: format!("Found {} refinements", refinements.len()),
            data: Some(serde_json::json!({
                "concept": concept.to_string(),
                "refinements": refinements
            })),
        })
    }

    fn execute_info(&self, ontology: &Path) -> Result<CommandResult> {
        let content = std::fs::read_to_string(ontology)
            .with_context(|| format!("Failed to read ontology {}", ontology.display()))?;
        let loaded = self.loader.load_from_json(&content)?;
        let kb = OntologyKnowledgeBase::new(&loaded);

        let info = serde_json::json!({
            "ontology": loaded.iri.as_ref().map(|iri| iri.to_string()),
            "classes": loaded.named_classes().count(),
            "object_properties": loaded.object_properties().count(),
            "individuals": kb.individuals().len(),
            "axioms": loaded.axioms.len(),
            "root_classes": kb.hierarchy().roots().iter().map(|iri| iri.to_string()).collect::<Vec<_>>(),
        });

        let result = serde_json::to_string_pretty(&info)?;
        println!("{}", result);

        Ok(CommandResult {
            success: true,
            message: "Ontology information".to_string(),
            data: Some(info),
        })
    }
}

/// Configuration file values, overridden by command-line flags
pub fn resolve_config(path: Option<&Path>, steps: Option<usize>, terminate_on_goal: bool) -> Result<LearnerConfig> {
    let mut config = match path {
        Some(path) => LearnerConfig::from_file(path)?,
        None => LearnerConfig::default(),
    };
    if let Some(steps) = steps {
        config.steps = steps;
    }
    if terminate_on_goal {
        config.terminate_on_goal = true;
    }
    Ok(config)
}

fn render_prediction(prediction: &Prediction) -> String {
    format!(
        "{}: {} (length {}, F1 {})\n  positives: [{}]\n  negatives: [{}]",
        prediction.problem,
        prediction.solution,
        prediction.solution_length,
        prediction.train_score,
        prediction.positives.iter().join(", "),
        prediction.negatives.iter().join(", ")
    )
}
