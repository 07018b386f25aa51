/// Errors raised while parsing funnel data types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypesError {
    #[error("unknown arrival variant: {0}")]
    UnknownVariant(String),
    #[error("unknown decision policy: {0}")]
    UnknownPolicy(String),
    #[error("unknown value delivery style: {0}")]
    UnknownDeliveryStyle(String),
}
