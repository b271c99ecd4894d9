// agriquota-core/src/domain/quota/evaluator.rs

use tracing::debug;

use super::criterion::{CompiledCriteria, QuotaCriteria};
use super::definition::Quota;
use super::record::RespondentRecord;
use super::variable::VariableCatalog;

/// Decides which quotas a respondent falls into and whether they can still
/// take responses. Pure: it only reads the catalog, the record and the quota
/// snapshots it is given.
#[derive(Debug, Clone, Copy)]
pub struct QuotaEvaluator<'a> {
    catalog: &'a VariableCatalog,
}

impl<'a> QuotaEvaluator<'a> {
    pub fn new(catalog: &'a VariableCatalog) -> Self {
        Self { catalog }
    }

    pub fn matches(&self, record: &RespondentRecord, criteria: &QuotaCriteria) -> bool {
        CompiledCriteria::compile(criteria, self.catalog).matches(record)
    }

    /// Completed responses always gate capacity, whatever `is_active` says.
    /// With `auto_stop`, in-progress responses are counted as well.
    pub fn has_capacity(quota: &Quota) -> bool {
        if !quota.is_active || quota.completed_count >= quota.target_count {
            return false;
        }
        !quota.auto_stop || quota.in_flight_count() < quota.target_count
    }

    /// Resolves every quota's criteria once, for reuse across records.
    pub fn compile_quotas<'q>(&self, quotas: &'q [Quota]) -> CompiledQuotas<'q> {
        CompiledQuotas {
            entries: quotas
                .iter()
                .map(|q| (q, CompiledCriteria::compile(&q.criteria, self.catalog)))
                .collect(),
        }
    }

    /// Quotas whose criteria the record satisfies, capacity ignored.
    pub fn matching_quotas<'q>(
        &self,
        record: &RespondentRecord,
        quotas: &'q [Quota],
    ) -> Vec<&'q Quota> {
        self.compile_quotas(quotas).matching(record)
    }

    /// Picks the quota a new interview should count against.
    pub fn select_quota<'q>(
        &self,
        record: &RespondentRecord,
        quotas: &'q [Quota],
    ) -> Option<&'q Quota> {
        self.compile_quotas(quotas).select(record)
    }

    /// Allocation order over quotas already known to match: capacity first,
    /// then lowest `priority`, then smallest `remaining_count`, then smallest
    /// id so the choice does not depend on input order.
    pub fn best_candidate<'q, I>(candidates: I) -> Option<&'q Quota>
    where
        I: IntoIterator<Item = &'q Quota>,
    {
        candidates
            .into_iter()
            .filter(|q| Self::has_capacity(q))
            .min_by(|a, b| {
                a.priority
                    .cmp(&b.priority)
                    .then_with(|| a.remaining_count().cmp(&b.remaining_count()))
                    .then_with(|| a.id.cmp(&b.id))
            })
    }
}

/// A quota set with compiled criteria, borrowed from the caller's snapshot.
#[derive(Debug, Clone)]
pub struct CompiledQuotas<'q> {
    entries: Vec<(&'q Quota, CompiledCriteria)>,
}

impl<'q> CompiledQuotas<'q> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn matching(&self, record: &RespondentRecord) -> Vec<&'q Quota> {
        self.entries
            .iter()
            .filter(|(_, criteria)| criteria.matches(record))
            .map(|(q, _)| *q)
            .collect()
    }

    pub fn select(&self, record: &RespondentRecord) -> Option<&'q Quota> {
        let selected = QuotaEvaluator::best_candidate(
            self.entries
                .iter()
                .filter(|(q, criteria)| QuotaEvaluator::has_capacity(q) && criteria.matches(record))
                .map(|(q, _)| *q),
        );

        match selected {
            Some(q) => debug!(quota = %q.id, priority = q.priority, "Quota selected"),
            None => debug!(candidates = self.entries.len(), "No quota available for record"),
        }
        selected
    }
}
