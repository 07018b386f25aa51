use funnel_types::TypesError;

/// Errors from the funnel engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("flow has no stages: nothing to simulate")]
    EmptyFlow,
    #[error("descriptor has an empty individual id")]
    MissingIndividualId,
    #[error("invalid engine configuration: {0}")]
    InvalidConfig(String),
    #[error("unknown calibration parameter: {0}")]
    UnknownParameter(String),
    #[error("invalid override for {key}: {reason}")]
    InvalidOverride { key: String, reason: String },
    #[error("unknown intent: {0}")]
    UnknownIntent(String),
    #[error("state became non-finite at stage {stage_index} and could not be repaired")]
    NonFiniteState { stage_index: usize },
    #[error("worker pool unavailable: {0}")]
    WorkerPool(String),
    #[error(transparent)]
    Types(#[from] TypesError),
}
