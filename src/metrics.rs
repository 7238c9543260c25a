use prometheus::{IntCounter, IntCounterVec, IntGauge, Opts, Registry};

use crate::variable::VariableType;

/// Counters kept by every pool. They are live from construction; registering
/// them with a `Registry` only makes them visible to a scrape. Every series
/// carries a constant `pool` label, so several pools can share one registry.
#[derive(Clone)]
pub(crate) struct PoolMetrics {
    created: IntCounterVec,
    lookups: IntCounterVec,
    clears: IntCounter,
    named: IntGauge,
}

impl PoolMetrics {
    pub(crate) fn new(pool: &str) -> prometheus::Result<PoolMetrics> {
        let opts = |name: &str, help: &str| Opts::new(name, help).const_label("pool", pool);
        Ok(PoolMetrics {
            created: IntCounterVec::new(
                opts("varpool_variables_created_total", "Variables minted by the pool"),
                &["type"],
            )?,
            lookups: IntCounterVec::new(
                opts("varpool_lookups_total", "Name lookups against the pool"),
                &["result"],
            )?,
            clears: IntCounter::with_opts(opts("varpool_clears_total", "Times the pool was cleared"))?,
            named: IntGauge::with_opts(opts(
                "varpool_named_variables",
                "Names currently bound in the pool",
            ))?,
        })
    }

    pub(crate) fn register(&self, registry: &Registry) -> prometheus::Result<()> {
        registry.register(Box::new(self.created.clone()))?;
        registry.register(Box::new(self.lookups.clone()))?;
        registry.register(Box::new(self.clears.clone()))?;
        registry.register(Box::new(self.named.clone()))?;
        Ok(())
    }

    pub(crate) fn record_created(&self, ty: VariableType) {
        self.created.with_label_values(&[ty.as_str()]).inc();
    }

    pub(crate) fn record_lookup(&self, hit: bool) {
        let result = if hit { "hit" } else { "miss" };
        self.lookups.with_label_values(&[result]).inc();
    }

    pub(crate) fn record_clear(&self) {
        self.clears.inc();
    }

    pub(crate) fn set_named(&self, count: usize) {
        self.named.set(count as i64);
    }

    #[cfg(test)]
    pub(crate) fn created(&self, ty: VariableType) -> u64 {
        self.created.with_label_values(&[ty.as_str()]).get()
    }

    #[cfg(test)]
    pub(crate) fn lookups(&self, hit: bool) -> u64 {
        let result = if hit { "hit" } else { "miss" };
        self.lookups.with_label_values(&[result]).get()
    }

    #[cfg(test)]
    pub(crate) fn named(&self) -> i64 {
        self.named.get()
    }
}
