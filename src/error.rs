/// Everything that can go wrong while reading network, zoning and demand inputs.
/// The first error encountered aborts the whole read.
#[derive(thiserror::Error, Debug)]
pub enum InputError {
    #[error("duplicate {kind} id '{id}'")]
    DuplicateId { kind: &'static str, id: String },
    #[error("{kind} '{id}' referenced by {referrer} does not exist")]
    UnresolvedReference {
        kind: &'static str,
        id: String,
        referrer: String,
    },
    #[error("cannot pick a default {kind} for {referrer}: {candidates} candidates registered, expected exactly one")]
    AmbiguousDefault {
        kind: &'static str,
        referrer: String,
        candidates: usize,
    },
    #[error("badly shaped OD matrix in {element}: {message}")]
    MatrixShape { element: String, message: String },
    #[error("could not parse '{token}' as a number in {context}")]
    NumericFormat { token: String, context: String },
    #[error("invalid value '{value}' for {field}: {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
    #[error("<{element}> is missing attribute '{attribute}'")]
    MissingAttribute { element: String, attribute: String },
    #[error("<{parent}> is missing child element <{element}>")]
    MissingElement { parent: String, element: String },
    #[error("invalid input configuration: {0}")]
    Config(String),
    #[error("failed to read input file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed xml: {0}")]
    Xml(#[from] xml::reader::Error),
    #[error("malformed csv: {0}")]
    Csv(#[from] csv::Error),
}
