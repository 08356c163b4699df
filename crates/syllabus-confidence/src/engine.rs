use syllabus_core::config::ConfidenceConfig;
use syllabus_core::models::{
    ConfidenceResult, CurriculumDraft, RagStrategy, Request, RetrievalFeatures,
};
use syllabus_scoring::formula;

use crate::policy::{self, RerouteContext};
use crate::{generation, quality, retrieval};

/// Everything the monitor looks at for one attempt.
#[derive(Debug, Clone, Copy)]
pub struct ConfidenceInput<'a> {
    pub request: &'a Request,
    pub features: &'a RetrievalFeatures,
    pub draft: &'a CurriculumDraft,
    pub strategy: RagStrategy,
    /// Strategies that already produced a low-confidence attempt in this session.
    pub failed_strategies: &'a [RagStrategy],
    pub retrieval_degraded: bool,
    pub generation_degraded: bool,
}

/// Computes `{C_r, C_g, C_overall}` and the reroute action.
#[derive(Debug, Clone, Default)]
pub struct ConfidenceMonitor {
    config: ConfidenceConfig,
}

impl ConfidenceMonitor {
    pub fn new(config: ConfidenceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ConfidenceConfig {
        &self.config
    }

    pub fn evaluate(&self, input: &ConfidenceInput<'_>) -> ConfidenceResult {
        let config = &self.config;

        let retrieval_parts = retrieval::breakdown(input.features);
        let mut c_r = retrieval::aggregate(&retrieval_parts, &config.retrieval_weights);

        let generation_parts = generation::breakdown(
            input.draft,
            &input.features.retrieved_spans,
            input.request,
            config,
        );
        let mut c_g = generation::aggregate(&generation_parts, &config.generation_weights);

        let penalty = config.degraded_penalty.clamp(0.0, 1.0);
        if input.retrieval_degraded {
            c_r *= penalty;
        }
        if input.generation_degraded {
            c_g *= penalty;
        }

        let c_overall = c_r.min(c_g);
        let limiting = policy::limiting_factor(c_r, c_g);
        let reroute = policy::choose(&RerouteContext {
            c_overall,
            threshold: config.overall_threshold,
            limiting,
            dispersion: formula::effective_dispersion(input.features),
            low_dispersion_threshold: config.low_dispersion_threshold,
            strategy: input.strategy,
            strategy_failed_before: input.failed_strategies.contains(&input.strategy),
        });

        let result = ConfidenceResult {
            c_r,
            c_g,
            c_overall,
            retrieval: retrieval_parts,
            generation: generation_parts,
            limiting,
            reroute,
            degraded: input.retrieval_degraded || input.generation_degraded,
            quality: quality::assess(input.draft, c_overall, config),
        };

        tracing::debug!(
            c_r = result.c_r,
            c_g = result.c_g,
            c_overall = result.c_overall,
            reroute = %result.reroute,
            degraded = result.degraded,
            "confidence evaluated"
        );
        result
    }
}
