// agriquota-core/src/application/monitoring.rs
//
// Progress snapshots for the administrative dashboard, plus batch match
// coverage over a set of respondent records.

use chrono::Utc;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{info, instrument};

use crate::domain::quota::{Quota, QuotaEvaluator, QuotaStatus, RespondentRecord, VariableCatalog};
use crate::error::AgriquotaError;
use crate::ports::QuotaSource;

// --- DTOs ---

#[derive(Debug, Clone, Serialize)]
pub struct QuotaProgress {
    pub id: String,
    pub name: String,
    pub priority: i32,
    pub target_count: u32,
    pub completed_count: u32,
    pub in_progress_count: u32,
    pub pending_count: u32,
    pub remaining_count: u32,
    /// Clamped to 100, one decimal.
    pub completion_percentage: f64,
    pub status: QuotaStatus,
    pub is_active: bool,
    pub has_capacity: bool,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct ProgressTotals {
    pub target_count: u64,
    pub completed_count: u64,
    pub in_progress_count: u64,
    pub pending_count: u64,
    pub completion_percentage: f64,
    pub completed_quotas: usize,
    pub open_quotas: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionnaireProgress {
    pub questionnaire_id: String,
    pub totals: ProgressTotals,
    pub quotas: Vec<QuotaProgress>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonitoringReport {
    pub generated_at: String,
    pub near_completion_threshold: f64,
    pub questionnaires: Vec<QuestionnaireProgress>,
}

impl MonitoringReport {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RecordMatches {
    pub index: usize,
    pub matched: Vec<String>,
    pub selected: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CoverageReport {
    pub records: Vec<RecordMatches>,
    /// Quota id -> number of records matching its criteria.
    pub per_quota: BTreeMap<String, usize>,
    pub unmatched: usize,
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

// --- SERVICE ---

pub struct QuotaMonitor;

impl QuotaMonitor {
    /// Rows are ordered by priority then id, the order the dashboard shows.
    pub fn snapshot(
        questionnaire_id: &str,
        quotas: &[Quota],
        near_completion_threshold: f64,
    ) -> QuestionnaireProgress {
        let mut rows: Vec<QuotaProgress> = quotas
            .iter()
            .map(|q| QuotaProgress {
                id: q.id.clone(),
                name: q.name.clone(),
                priority: q.priority,
                target_count: q.target_count,
                completed_count: q.completed_count,
                in_progress_count: q.in_progress_count,
                pending_count: q.pending_count,
                remaining_count: q.remaining_count(),
                completion_percentage: round1(q.display_percentage()),
                status: q.status(near_completion_threshold),
                is_active: q.is_active,
                has_capacity: QuotaEvaluator::has_capacity(q),
            })
            .collect();
        rows.sort_by(|a, b| a.priority.cmp(&b.priority).then_with(|| a.id.cmp(&b.id)));

        let mut totals = ProgressTotals::default();
        // Overshoot on one quota must not hide shortfall on another
        let mut credited: u64 = 0;
        for q in quotas {
            totals.target_count += u64::from(q.target_count);
            totals.completed_count += u64::from(q.completed_count);
            totals.in_progress_count += u64::from(q.in_progress_count);
            totals.pending_count += u64::from(q.pending_count);
            credited += u64::from(q.completed_count.min(q.target_count));
        }
        totals.completion_percentage = if totals.target_count == 0 {
            0.0
        } else {
            round1(credited as f64 / totals.target_count as f64 * 100.0)
        };
        totals.completed_quotas = rows
            .iter()
            .filter(|r| r.status == QuotaStatus::Completed)
            .count();
        totals.open_quotas = rows.iter().filter(|r| r.has_capacity).count();

        QuestionnaireProgress {
            questionnaire_id: questionnaire_id.to_string(),
            totals,
            quotas: rows,
        }
    }

    /// Re-reads quota counters from the source. An empty selection means
    /// every questionnaire the source knows about.
    #[instrument(skip(source))]
    pub async fn refresh(
        source: &dyn QuotaSource,
        questionnaire_ids: &[String],
        near_completion_threshold: f64,
    ) -> Result<MonitoringReport, AgriquotaError> {
        let ids = if questionnaire_ids.is_empty() {
            source.list_questionnaires().await?
        } else {
            questionnaire_ids.to_vec()
        };

        let mut questionnaires = Vec::with_capacity(ids.len());
        for id in &ids {
            let quotas = source.fetch_quotas(id).await?;
            questionnaires.push(Self::snapshot(id, &quotas, near_completion_threshold));
        }
        info!(questionnaires = questionnaires.len(), "Quota progress refreshed");

        Ok(MonitoringReport {
            generated_at: Utc::now().to_rfc3339(),
            near_completion_threshold,
            questionnaires,
        })
    }

    /// Which quotas each record matches, and which one it would be allocated
    /// to. Criteria are compiled once per quota, not once per record.
    pub fn coverage(
        catalog: &VariableCatalog,
        quotas: &[Quota],
        records: &[RespondentRecord],
    ) -> CoverageReport {
        let compiled = QuotaEvaluator::new(catalog).compile_quotas(quotas);

        let mut per_quota: BTreeMap<String, usize> =
            quotas.iter().map(|q| (q.id.clone(), 0)).collect();
        let mut unmatched = 0;
        let mut rows = Vec::with_capacity(records.len());

        for (index, record) in records.iter().enumerate() {
            let matched = compiled.matching(record);

            if matched.is_empty() {
                unmatched += 1;
            }
            for q in &matched {
                *per_quota.entry(q.id.clone()).or_default() += 1;
            }

            rows.push(RecordMatches {
                index,
                selected: QuotaEvaluator::best_candidate(matched.iter().copied())
                    .map(|q| q.id.clone()),
                matched: matched.iter().map(|q| q.id.clone()).collect(),
            });
        }

        CoverageReport {
            records: rows,
            per_quota,
            unmatched,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::quota::{
        CriterionOperator, QuotaCriteria, QuotaCriterion, QuotaVariable, VariableDataType,
    };

    fn quota(id: &str, priority: i32, target: u32, completed: u32) -> Quota {
        let mut q = Quota::new(id, id.to_uppercase(), target);
        q.priority = priority;
        q.completed_count = completed;
        q
    }

    #[test]
    fn test_snapshot_rows_and_totals() {
        let quotas = vec![
            quota("b_small", 2, 20, 19),
            quota("a_large", 1, 50, 11),
            quota("c_done", 2, 10, 14),
        ];

        let progress = QuotaMonitor::snapshot("crops_2024", &quotas, 90.0);

        let ids: Vec<&str> = progress.quotas.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a_large", "b_small", "c_done"]);

        assert_eq!(progress.quotas[1].status, QuotaStatus::NearCompletion);
        assert_eq!(progress.quotas[1].completion_percentage, 95.0);
        assert_eq!(progress.quotas[2].status, QuotaStatus::Completed);
        assert_eq!(progress.quotas[2].completion_percentage, 100.0);
        assert!(!progress.quotas[2].has_capacity);

        assert_eq!(progress.totals.target_count, 80);
        assert_eq!(progress.totals.completed_count, 44);
        // 11 + 19 + 10 credited out of 80, overshoot on c_done ignored
        assert_eq!(progress.totals.completion_percentage, 50.0);
        assert_eq!(progress.totals.completed_quotas, 1);
        assert_eq!(progress.totals.open_quotas, 2);
    }

    #[test]
    fn test_empty_questionnaire_snapshot() {
        let progress = QuotaMonitor::snapshot("empty", &[], 90.0);
        assert_eq!(progress.totals.completion_percentage, 0.0);
        assert!(progress.quotas.is_empty());
    }

    #[test]
    fn test_coverage_counts() {
        let catalog = VariableCatalog::from_variables(vec![QuotaVariable::new(
            "region",
            VariableDataType::Categorical,
        )])
        .unwrap();

        let mut paphos = quota("paphos", 1, 10, 0);
        paphos.criteria = QuotaCriteria::all(vec![QuotaCriterion::new(
            "region",
            CriterionOperator::Equals,
            ["Πάφος"],
        )]);
        let mut coastal = quota("coastal", 2, 10, 10);
        coastal.criteria = QuotaCriteria::all(vec![QuotaCriterion::new(
            "region",
            CriterionOperator::In,
            ["Πάφος", "Λεμεσός"],
        )]);
        let quotas = vec![paphos, coastal];

        let records = vec![
            RespondentRecord::new().with("region", "Πάφος"),
            RespondentRecord::new().with("region", "Λεμεσός"),
            RespondentRecord::new().with("region", "Λευκωσία"),
        ];

        let report = QuotaMonitor::coverage(&catalog, &quotas, &records);

        assert_eq!(report.per_quota["paphos"], 1);
        assert_eq!(report.per_quota["coastal"], 2);
        assert_eq!(report.unmatched, 1);
        assert_eq!(report.records[0].selected.as_deref(), Some("paphos"));
        // coastal matches but is full
        assert_eq!(report.records[1].matched, vec!["coastal".to_string()]);
        assert_eq!(report.records[1].selected, None);
    }
}
