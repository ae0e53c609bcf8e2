//! Typed-data decoding.
//!
//! Responsibilities:
//! - model device-ready payloads (`TypedPayload`) and their element kinds
//! - parse wire descriptors (inline arrays, typed arrays, base64 blobs)
//! - decode descriptors into payloads, applying the base64 widening rule

pub mod base64;
mod decode;
mod descriptor;
mod payload;

pub use decode::{decode, decode_base64};
pub use descriptor::DataDescriptor;
pub use payload::{ElementType, TypedPayload};
