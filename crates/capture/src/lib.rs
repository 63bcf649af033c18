//! Capture pipeline: turns one inbound chat event into a single inbox capture.
//!
//! The pipeline is transport-agnostic. The event source, media uploader, inbox
//! submitter and reply channel are consumed through the traits in this crate;
//! the Telegram, R2 and Dynalist crates provide the concrete implementations.

pub mod access;
pub mod enrich;
pub mod error;
pub mod normalize;
pub mod pipeline;
pub mod respond;
pub mod submit;
pub mod types;

pub use {
    access::AccessFilter,
    enrich::{DisabledUploader, MediaSource, MediaUploader},
    error::{Error, Result},
    normalize::{Rejection, normalize},
    pipeline::{Outcome, Pipeline},
    respond::Responder,
    submit::{CaptureSubmitter, SubmitError, SubmitErrorKind},
    types::{
        ForwardOrigin, InboundEvent, MediaDescriptor, MediaKind, MediaReference, MediaVariant,
        NormalizedCapture,
    },
};
