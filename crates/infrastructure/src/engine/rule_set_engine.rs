use arc_swap::ArcSwap;
use async_trait::async_trait;
use ferrous_filters_application::ports::FilteringEnginePort;
use ferrous_filters_application::services::FilterRegistry;
use ferrous_filters_domain::{rule_lines, DomainError, FilterId, FilterRecord};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

/// Rules of one filter, ready for the matcher.
#[derive(Debug)]
pub struct CompiledFilter {
    pub id: FilterId,
    pub rules: Vec<Arc<str>>,
}

/// Immutable rule set built from the registry. Replaced wholesale on reconfigure.
#[derive(Debug, Default)]
pub struct CompiledRuleSet {
    pub filters: Vec<CompiledFilter>,
    pub total_rules: usize,
}

impl CompiledRuleSet {
    /// Rule lists are keyed by filter id, so every id may appear only once.
    pub fn compile(filters: &[FilterRecord]) -> Result<Self, DomainError> {
        let mut seen: HashSet<FilterId> = HashSet::with_capacity(filters.len());
        let mut compiled = Vec::with_capacity(filters.len());
        let mut total_rules = 0;

        for filter in filters {
            if !seen.insert(filter.id) {
                return Err(DomainError::EngineReconfigurationFailed(format!(
                    "filter id {} is used by more than one filter",
                    filter.id
                )));
            }

            let rules: Vec<Arc<str>> = filter
                .content
                .as_deref()
                .map(rule_lines)
                .unwrap_or_default()
                .into_iter()
                .map(Arc::from)
                .collect();
            total_rules += rules.len();
            compiled.push(CompiledFilter {
                id: filter.id,
                rules,
            });
        }

        Ok(Self {
            filters: compiled,
            total_rules,
        })
    }

    pub fn filter_count(&self) -> usize {
        self.filters.len()
    }
}

/// Filtering engine adapter fed by the filter registry.
///
/// The compiled rule set is swapped atomically via `ArcSwap` on every
/// reconfigure; readers keep the previous set until the swap.
pub struct RuleSetEngine {
    registry: Arc<FilterRegistry>,
    rules: ArcSwap<CompiledRuleSet>,
    running: AtomicBool,
}

impl RuleSetEngine {
    pub fn new(registry: Arc<FilterRegistry>) -> Self {
        Self {
            registry,
            rules: ArcSwap::from_pointee(CompiledRuleSet::default()),
            running: AtomicBool::new(false),
        }
    }

    /// Compile the current filters and start serving them.
    pub async fn start(&self) -> Result<(), DomainError> {
        self.rebuild().await?;
        self.running.store(true, Ordering::Release);
        info!("Filtering engine started");
        Ok(())
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::Release);
        info!("Filtering engine stopped");
    }

    pub fn rule_set(&self) -> Arc<CompiledRuleSet> {
        self.rules.load_full()
    }

    async fn rebuild(&self) -> Result<(), DomainError> {
        let mut filters = vec![self.registry.user_filter().await];
        filters.extend(self.registry.loaded_filters().await);

        let compiled = CompiledRuleSet::compile(&filters)?;
        info!(
            filters = compiled.filter_count(),
            rules = compiled.total_rules,
            "Filter rule set compiled"
        );
        self.rules.store(Arc::new(compiled));
        Ok(())
    }
}

#[async_trait]
impl FilteringEnginePort for RuleSetEngine {
    fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    async fn reconfigure(&self) -> Result<(), DomainError> {
        self.rebuild().await
    }
}
