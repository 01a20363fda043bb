use std::{
	collections::HashSet,
	fs,
	path::{Path, PathBuf},
	sync::Arc,
};

use clap::Parser;
use color_eyre::eyre;
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use gilmat_domain::UserProfile;
use gilmat_service::{DataContext, GilmatService, QdrantIndex, RecommendationStatus};
use gilmat_storage::qdrant::QdrantStore;

#[derive(Debug, Parser)]
#[command(
	version = gilmat_cli::VERSION,
	rename_all = "kebab",
	styles = gilmat_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	#[arg(long, short = 'd', value_name = "FILE")]
	pub dataset: PathBuf,
	/// Cut-off for precision and recall. Defaults to `service.default_top_k`.
	#[arg(long, value_name = "N")]
	pub top_k: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct EvalDataset {
	name: Option<String>,
	cases: Vec<EvalCase>,
}

/// One labelled traveller.
#[derive(Debug, Deserialize)]
struct EvalCase {
	name: String,
	profile: UserProfile,
	expected: Vec<String>,
	/// Ranking produced ahead of time by another pipeline, compared side by side.
	#[serde(default)]
	preprocessed: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct EvalOutput {
	dataset: Option<String>,
	top_k: u32,
	summary: EvalSummary,
	cases: Vec<CaseReport>,
}

#[derive(Debug, Default, Serialize)]
struct EvalSummary {
	evaluated: usize,
	failed: usize,
	avg_precision_at_k: f64,
	avg_recall_at_k: f64,
	#[serde(skip_serializing_if = "Option::is_none")]
	preprocessed_avg_precision_at_k: Option<f64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	preprocessed_avg_recall_at_k: Option<f64>,
}

#[derive(Debug, Serialize)]
struct CaseReport {
	name: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	status: Option<RecommendationStatus>,
	#[serde(skip_serializing_if = "Option::is_none")]
	live: Option<Metrics>,
	#[serde(skip_serializing_if = "Option::is_none")]
	preprocessed: Option<Metrics>,
	#[serde(skip_serializing_if = "Option::is_none")]
	error: Option<String>,
	recommended: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
struct Metrics {
	precision_at_k: f64,
	recall_at_k: f64,
	relevant_count: usize,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = gilmat_config::load(&args.config)?;
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

	let dataset = load_dataset(&args.dataset)?;
	let top_k = args.top_k.unwrap_or(config.service.default_top_k);

	if top_k == 0 {
		return Err(eyre::eyre!("--top-k must be greater than zero."));
	}

	let service = build_service(config)?;
	let mut cases = Vec::with_capacity(dataset.cases.len());

	for case in dataset.cases {
		cases.push(eval_case(&service, case, top_k as usize).await);
	}

	let output = EvalOutput {
		dataset: dataset.name,
		top_k,
		summary: summarize(&cases),
		cases,
	};
	let json = serde_json::to_string_pretty(&output)?;

	println!("{json}");

	Ok(())
}

fn build_service(config: gilmat_config::Config) -> color_eyre::Result<GilmatService> {
	let data = DataContext::load(&config)?;
	let store = QdrantStore::new(&config.storage.qdrant)?;
	let index = QdrantIndex::new(store, config.providers.embedding.clone())?;

	Ok(GilmatService::new(config, Arc::new(data), Arc::new(index))?)
}

fn load_dataset(path: &Path) -> color_eyre::Result<EvalDataset> {
	let raw = fs::read_to_string(path)?;
	let dataset: EvalDataset = serde_json::from_str(&raw)?;

	if dataset.cases.is_empty() {
		return Err(eyre::eyre!("Dataset {} has no cases.", path.display()));
	}

	Ok(dataset)
}

async fn eval_case(service: &GilmatService, case: EvalCase, k: usize) -> CaseReport {
	let expected: HashSet<String> = case.expected.into_iter().collect();
	let mut report = CaseReport {
		name: case.name,
		status: None,
		live: None,
		preprocessed: None,
		error: None,
		recommended: Vec::new(),
	};

	if expected.is_empty() {
		report.error = Some("Case has no expected restaurants.".to_string());

		return report;
	}

	report.preprocessed =
		case.preprocessed.as_deref().map(|ranked| compute_metrics(ranked, &expected, k));

	match service.build_recommendation(&case.profile, None).await {
		Ok(recommendation) => {
			let ranked = recommendation.ids();

			report.live = Some(compute_metrics(&ranked, &expected, k));
			report.status = Some(recommendation.status);
			report.recommended = ranked.into_iter().take(k).collect();
		},
		Err(err) => {
			tracing::warn!(case = %report.name, error = %err, "Evaluation case failed.");

			report.error = Some(err.to_string());
		},
	}

	report
}

/// Precision divides by `k` so short rankings are penalised; recall divides by the expected count.
fn compute_metrics(ranked: &[String], expected: &HashSet<String>, k: usize) -> Metrics {
	let relevant_count = ranked.iter().take(k).filter(|id| expected.contains(*id)).count();
	let precision_at_k = if k == 0 { 0.0 } else { relevant_count as f64 / k as f64 };
	let recall_at_k =
		if expected.is_empty() { 0.0 } else { relevant_count as f64 / expected.len() as f64 };

	Metrics { precision_at_k, recall_at_k, relevant_count }
}

fn summarize(cases: &[CaseReport]) -> EvalSummary {
	let live: Vec<Metrics> = cases.iter().filter_map(|case| case.live).collect();
	let preprocessed: Vec<Metrics> = cases.iter().filter_map(|case| case.preprocessed).collect();
	let (avg_precision_at_k, avg_recall_at_k) = averages(&live).unwrap_or((0.0, 0.0));
	let preprocessed_averages = averages(&preprocessed);

	EvalSummary {
		evaluated: live.len(),
		failed: cases.iter().filter(|case| case.error.is_some()).count(),
		avg_precision_at_k,
		avg_recall_at_k,
		preprocessed_avg_precision_at_k: preprocessed_averages.map(|(precision, _)| precision),
		preprocessed_avg_recall_at_k: preprocessed_averages.map(|(_, recall)| recall),
	}
}

fn averages(metrics: &[Metrics]) -> Option<(f64, f64)> {
	if metrics.is_empty() {
		return None;
	}

	let n = metrics.len() as f64;
	let precision = metrics.iter().map(|m| m.precision_at_k).sum::<f64>() / n;
	let recall = metrics.iter().map(|m| m.recall_at_k).sum::<f64>() / n;

	Some((precision, recall))
}

#[cfg(test)]
mod tests {
	use super::*;

	fn ids(raw: &[&str]) -> Vec<String> {
		raw.iter().map(|id| id.to_string()).collect()
	}

	#[test]
	fn precision_uses_k_and_recall_uses_expected_count() {
		let expected: HashSet<String> = ids(&["a", "b", "c", "d"]).into_iter().collect();
		let metrics = compute_metrics(&ids(&["a", "x", "c"]), &expected, 5);

		assert_eq!(metrics.relevant_count, 2);
		assert!((metrics.precision_at_k - 0.4).abs() < 1e-12);
		assert!((metrics.recall_at_k - 0.5).abs() < 1e-12);
	}

	#[test]
	fn hits_beyond_k_are_ignored() {
		let expected: HashSet<String> = ids(&["c"]).into_iter().collect();
		let metrics = compute_metrics(&ids(&["a", "b", "c"]), &expected, 2);

		assert_eq!(metrics.relevant_count, 0);
		assert_eq!(metrics.recall_at_k, 0.0);
	}

	#[test]
	fn summary_averages_only_evaluated_cases() {
		let report = |live: Option<Metrics>, error: Option<&str>| CaseReport {
			name: "case".to_string(),
			status: None,
			live,
			preprocessed: None,
			error: error.map(str::to_string),
			recommended: Vec::new(),
		};
		let metrics =
			|precision_at_k, recall_at_k| Metrics { precision_at_k, recall_at_k, relevant_count: 1 };
		let summary = summarize(&[
			report(Some(metrics(0.2, 1.0)), None),
			report(Some(metrics(0.4, 0.5)), None),
			report(None, Some("boom")),
		]);

		assert_eq!(summary.evaluated, 2);
		assert_eq!(summary.failed, 1);
		assert!((summary.avg_precision_at_k - 0.3).abs() < 1e-12);
		assert!((summary.avg_recall_at_k - 0.75).abs() < 1e-12);
		assert!(summary.preprocessed_avg_precision_at_k.is_none());
	}
}
