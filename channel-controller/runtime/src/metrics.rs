use crate::core::{ChannelTypeClass, Verdict};
use prometheus_client::{
    encoding::EncodeLabelSet,
    metrics::{counter::Counter, family::Family},
    registry::Registry,
};

#[derive(Clone, Debug, Default)]
pub struct AdmissionMetrics {
    decisions: Family<DecisionLabels, Counter>,
}

#[derive(Clone, Hash, PartialEq, Eq, EncodeLabelSet, Debug)]
struct DecisionLabels {
    class: &'static str,
    verdict: &'static str,
}

// === impl AdmissionMetrics ===

impl AdmissionMetrics {
    pub fn register(reg: &mut Registry) -> Self {
        let decisions = Family::<DecisionLabels, Counter>::default();
        reg.register(
            "decisions",
            "Total number of channel admission decisions",
            decisions.clone(),
        );

        Self { decisions }
    }

    pub(crate) fn record(&self, class: ChannelTypeClass, verdict: &Verdict) {
        let verdict = match verdict {
            Verdict::Allow => "allow",
            Verdict::Deny(_) => "deny",
        };
        self.decisions
            .get_or_create(&DecisionLabels {
                class: class.as_str(),
                verdict,
            })
            .inc();
    }

    #[cfg(test)]
    pub(crate) fn count(&self, class: &'static str, verdict: &'static str) -> u64 {
        self.decisions
            .get_or_create(&DecisionLabels { class, verdict })
            .get()
    }
}
