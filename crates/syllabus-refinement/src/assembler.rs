//! Builds the Complete Input from an approved session.

use chrono::{DateTime, Utc};

use syllabus_core::constants::{COMPLETE_STATUS, NO_STRATEGY_LABEL};
use syllabus_core::errors::AssemblyError;
use syllabus_core::models::{
    CompleteInput, CompleteMetadata, ConfidenceScores, CurriculumContent, OrchestrationStrategy,
    TechnicalInfo,
};

use crate::session::Session;

#[derive(Debug, Clone, Copy, Default)]
pub struct CompleteInputAssembler;

impl CompleteInputAssembler {
    pub fn new() -> Self {
        Self
    }

    /// Assemble using the attempt the log records as approved.
    pub fn assemble(&self, session: &Session, now: DateTime<Utc>) -> Result<CompleteInput, AssemblyError> {
        self.assemble_with(session, session.log().approved_attempt(), now)
    }

    /// Assemble as if `approved` were the approved attempt. `None` means no
    /// generated content is used.
    ///
    /// User-supplied CP/ATP win per field; generated content fills the rest.
    pub fn assemble_with(
        &self,
        session: &Session,
        approved: Option<u32>,
        now: DateTime<Utc>,
    ) -> Result<CompleteInput, AssemblyError> {
        let request = session.request();
        let generated = approved.and_then(|a| session.log().content_for(a));

        let cp = request
            .supplied_cp()
            .map(str::to_string)
            .or_else(|| generated.map(|d| d.cp.trim().to_string()).filter(|s| !s.is_empty()));
        let atp = request
            .supplied_atp()
            .map(str::to_string)
            .or_else(|| generated.map(|d| d.atp.trim().to_string()).filter(|s| !s.is_empty()));

        let mut missing = request.basic_info.missing_fields();
        if cp.is_none() {
            missing.push("cp".to_string());
        }
        if atp.is_none() {
            missing.push("atp".to_string());
        }
        let (Some(cp), Some(atp)) = (cp, atp) else {
            return Err(AssemblyError::IncompleteInput { missing });
        };
        if !missing.is_empty() {
            return Err(AssemblyError::IncompleteInput { missing });
        }

        let metadata = match approved {
            Some(attempt) if !request.has_cp_atp() => CompleteMetadata {
                orchestration_strategy: OrchestrationStrategy::CpAtpGeneration.to_string(),
                rag_strategy_used: session
                    .log()
                    .strategy_for(attempt)
                    .map_or(NO_STRATEGY_LABEL.to_string(), |s| s.to_string()),
                confidence_scores: session
                    .log()
                    .confidence_for(attempt)
                    .unwrap_or_default(),
                attempt_count: session.attempt_count(),
                confidence_history: session.log().confidence_history(),
            },
            _ => CompleteMetadata {
                orchestration_strategy: OrchestrationStrategy::Direct.to_string(),
                rag_strategy_used: NO_STRATEGY_LABEL.to_string(),
                confidence_scores: ConfidenceScores::unit(),
                attempt_count: session.attempt_count(),
                confidence_history: Vec::new(),
            },
        };

        Ok(CompleteInput::new(
            request.basic_info.clone(),
            CurriculumContent { cp, atp },
            TechnicalInfo {
                llm_model: request.llm_model.clone(),
                timestamp: now,
                status: COMPLETE_STATUS.to_string(),
            },
            metadata,
        ))
    }
}
