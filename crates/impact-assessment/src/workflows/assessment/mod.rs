mod answers;
mod catalog;
pub mod domain;
mod export;
mod mitigation;
pub mod report;
pub mod scoring;
mod session;

pub use answers::Answers;
pub use catalog::{CatalogError, DomainCatalog};
pub use export::{DocumentExporter, ExportError, MITIGATION_STEM, SUMMARY_STEM};
pub use mitigation::{
    MitigationAction, MitigationError, MitigationField, MitigationPlan, ScheduledAction,
};
pub use session::{
    AssessmentSession, AssessmentStep, EvidenceAttachment, SessionAction, SessionError,
};
