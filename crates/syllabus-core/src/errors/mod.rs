mod assembly_error;
mod external_error;
mod refinement_error;
mod scoring_error;
mod session_error;
mod syllabus_error;

pub use assembly_error::AssemblyError;
pub use external_error::{ExternalServiceError, ServiceKind};
pub use refinement_error::RefinementError;
pub use scoring_error::ScoringError;
pub use session_error::SessionError;
pub use syllabus_error::{SyllabusError, SyllabusResult};
