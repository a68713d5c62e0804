//! Building a reflective descriptor pool from compiler output.
//!
//! Extension options such as `google.api.http` only survive if the file
//! descriptors are handed to the pool as raw bytes. Decoding them through
//! `prost_types` first would drop every extension field of `MethodOptions`,
//! so the request is decoded with `proto_file` kept as opaque bytes.

use prost::Message;
use prost_reflect::DescriptorPool;
use thiserror::Error;

/// Errors building a descriptor pool.
#[derive(Debug, Error)]
pub enum PoolError {
    /// The input is not a valid protobuf message.
    #[error("failed to decode {what}: {source}")]
    Decode {
        /// What was being decoded.
        what: &'static str,
        /// Underlying decode error.
        source: prost::DecodeError,
    },

    /// The file descriptors do not form a consistent pool.
    #[error("invalid file descriptors: {0}")]
    Descriptor(#[from] prost_reflect::DescriptorError),
}

#[derive(Clone, PartialEq, Message)]
struct RawCodeGeneratorRequest {
    #[prost(string, repeated, tag = "1")]
    file_to_generate: Vec<String>,
    #[prost(string, optional, tag = "2")]
    parameter: Option<String>,
    #[prost(bytes = "vec", repeated, tag = "15")]
    proto_file: Vec<Vec<u8>>,
}

#[derive(Clone, PartialEq, Message)]
struct RawFileDescriptorSet {
    #[prost(bytes = "vec", repeated, tag = "1")]
    file: Vec<Vec<u8>>,
}

/// A decoded `google.protobuf.compiler.CodeGeneratorRequest`.
#[derive(Debug, Clone)]
pub struct PluginRequest {
    /// Files named on the protoc command line, in order.
    pub files_to_generate: Vec<String>,
    /// Plugin parameter string (`--<name>_opt`).
    pub parameter: Option<String>,
    /// Every file in the request, including imports.
    pub pool: DescriptorPool,
}

impl PluginRequest {
    /// Decodes a request as written by protoc to a plugin's stdin.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a request or the descriptors
    /// cannot be linked.
    pub fn decode(bytes: &[u8]) -> Result<Self, PoolError> {
        let raw = RawCodeGeneratorRequest::decode(bytes).map_err(|source| PoolError::Decode {
            what: "CodeGeneratorRequest",
            source,
        })?;

        let set = RawFileDescriptorSet {
            file: raw.proto_file,
        };
        let pool = DescriptorPool::decode(set.encode_to_vec().as_slice())?;

        Ok(Self {
            files_to_generate: raw.file_to_generate,
            parameter: raw.parameter,
            pool,
        })
    }
}

/// Builds a pool from a serialized `FileDescriptorSet` (`protoc -o`).
///
/// # Errors
///
/// Returns an error if the bytes do not decode or link.
pub fn pool_from_descriptor_set(bytes: &[u8]) -> Result<DescriptorPool, PoolError> {
    // Validate the envelope first for a clearer error than the pool gives.
    RawFileDescriptorSet::decode(bytes).map_err(|source| PoolError::Decode {
        what: "FileDescriptorSet",
        source,
    })?;
    Ok(DescriptorPool::decode(bytes)?)
}
