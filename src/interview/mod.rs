//! Interview data model and response handling
//!
//! - Questions, responses, evaluations and the score aggregate
//! - `ResponseLedger`: one current response per question
//! - `ResponseEncoder`: base64 transport encoding before submission
//! - Setup intake validation and the built-in question set

mod encoder;
mod ledger;
mod questions;
mod setup;
mod types;

pub use encoder::{decode_payload, encode_artifact, strip_data_uri_prefix, to_data_uri, ResponseEncoder};
pub use ledger::ResponseLedger;
pub use questions::default_questions;
pub use setup::{CvDocument, SetupRequest, PDF_MIME_TYPE};
pub use types::{
    CodingEvaluation, EncodedResponse, Evaluation, Question, QuestionKind, Response,
    ScoreBand, SessionAggregate,
};
