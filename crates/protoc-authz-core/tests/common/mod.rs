//! Hand-built descriptor fixtures.
//!
//! The pools mirror what protoc hands a plugin: `google/api/http.proto`,
//! `google/api/annotations.proto`, a minimal `google/protobuf/descriptor.proto`
//! and a service file whose method options carry the HTTP extension as raw
//! bytes.

#![allow(dead_code)]

use prost::Message;
use prost_reflect::{DescriptorPool, DynamicMessage, Value};
use prost_types::descriptor_proto::ExtensionRange;
use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::{
    DescriptorProto, FieldDescriptorProto, FileDescriptorProto, FileDescriptorSet,
    OneofDescriptorProto,
};

/// Extension number of `google.api.http`.
pub const HTTP_EXTENSION_NUMBER: i32 = 72_295_728;

/// One rpc in the fixture service.
#[derive(Debug, Clone, Copy)]
pub struct MethodSpec {
    /// Method name.
    pub name: &'static str,
    /// Verb fields set on the HTTP binding, e.g. `[("post", "/v1/foo")]`.
    pub http: &'static [(&'static str, &'static str)],
}

impl MethodSpec {
    pub const fn new(name: &'static str, http: &'static [(&'static str, &'static str)]) -> Self {
        Self { name, http }
    }
}

fn string_field(name: &str, number: i32, oneof_index: Option<i32>) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name: Some(name.to_string()),
        number: Some(number),
        label: Some(Label::Optional as i32),
        r#type: Some(Type::String as i32),
        oneof_index,
        ..Default::default()
    }
}

fn message_extension(name: &str, number: i32, type_name: &str) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name: Some(name.to_string()),
        number: Some(number),
        label: Some(Label::Optional as i32),
        r#type: Some(Type::Message as i32),
        type_name: Some(type_name.to_string()),
        extendee: Some(".google.protobuf.MethodOptions".to_string()),
        ..Default::default()
    }
}

fn descriptor_file() -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some("google/protobuf/descriptor.proto".to_string()),
        package: Some("google.protobuf".to_string()),
        message_type: vec![DescriptorProto {
            name: Some("MethodOptions".to_string()),
            extension_range: vec![ExtensionRange {
                start: Some(1000),
                end: Some(536_870_912),
                options: None,
            }],
            ..Default::default()
        }],
        syntax: Some("proto2".to_string()),
        ..Default::default()
    }
}

fn http_file() -> FileDescriptorProto {
    let pattern = Some(0);
    FileDescriptorProto {
        name: Some("google/api/http.proto".to_string()),
        package: Some("google.api".to_string()),
        message_type: vec![DescriptorProto {
            name: Some("HttpRule".to_string()),
            field: vec![
                string_field("selector", 1, None),
                string_field("get", 2, pattern),
                string_field("put", 3, pattern),
                string_field("post", 4, pattern),
                string_field("delete", 5, pattern),
                string_field("patch", 6, pattern),
                string_field("body", 7, None),
            ],
            oneof_decl: vec![OneofDescriptorProto {
                name: Some("pattern".to_string()),
                options: None,
            }],
            ..Default::default()
        }],
        syntax: Some("proto3".to_string()),
        ..Default::default()
    }
}

fn annotations_file() -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some("google/api/annotations.proto".to_string()),
        package: Some("google.api".to_string()),
        dependency: vec![
            "google/api/http.proto".to_string(),
            "google/protobuf/descriptor.proto".to_string(),
        ],
        extension: vec![message_extension(
            "http",
            HTTP_EXTENSION_NUMBER,
            ".google.api.HttpRule",
        )],
        syntax: Some("proto3".to_string()),
        ..Default::default()
    }
}

/// A binding message that declares `patch` before `get` and has no oneof,
/// so several verbs can be set at once.
fn unordered_binding_file() -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some("acme/binding.proto".to_string()),
        package: Some("acme".to_string()),
        dependency: vec!["google/protobuf/descriptor.proto".to_string()],
        message_type: vec![DescriptorProto {
            name: Some("Binding".to_string()),
            field: vec![
                string_field("patch", 1, None),
                string_field("get", 2, None),
                string_field("post", 3, None),
                string_field("custom", 4, None),
            ],
            ..Default::default()
        }],
        extension: vec![message_extension("binding", 50_100, ".acme.Binding")],
        syntax: Some("proto3".to_string()),
        ..Default::default()
    }
}

fn dependency_files() -> Vec<FileDescriptorProto> {
    vec![
        descriptor_file(),
        http_file(),
        annotations_file(),
        unordered_binding_file(),
    ]
}

/// Pool with the option definitions but no service.
pub fn deps_pool() -> DescriptorPool {
    DescriptorPool::from_file_descriptor_set(FileDescriptorSet {
        file: dependency_files(),
    })
    .unwrap()
}

/// Builds `google.protobuf.MethodOptions` with the given extension set to a
/// binding whose fields are `fields`.
pub fn method_options(
    pool: &DescriptorPool,
    extension: &str,
    fields: &[(&str, &str)],
) -> DynamicMessage {
    let options_desc = pool
        .get_message_by_name("google.protobuf.MethodOptions")
        .unwrap();
    let mut options = DynamicMessage::new(options_desc);
    if fields.is_empty() {
        return options;
    }

    let ext = pool.get_extension_by_name(extension).unwrap();
    let Some(binding_desc) = ext.kind().as_message().cloned() else {
        panic!("{extension} is not a message extension");
    };
    let mut binding = DynamicMessage::new(binding_desc);
    for (field, value) in fields {
        binding.set_field_by_name(field, Value::String((*value).to_string()));
    }
    options.set_extension(&ext, Value::Message(binding));
    options
}

// Raw mirrors of the descriptor messages, so method options can be carried
// as pre-encoded bytes.

#[derive(Clone, PartialEq, Message)]
struct RawMethod {
    #[prost(string, optional, tag = "1")]
    name: Option<String>,
    #[prost(string, optional, tag = "2")]
    input_type: Option<String>,
    #[prost(string, optional, tag = "3")]
    output_type: Option<String>,
    #[prost(bytes = "vec", optional, tag = "4")]
    options: Option<Vec<u8>>,
}

#[derive(Clone, PartialEq, Message)]
struct RawService {
    #[prost(string, optional, tag = "1")]
    name: Option<String>,
    #[prost(message, repeated, tag = "2")]
    method: Vec<RawMethod>,
}

#[derive(Clone, PartialEq, Message)]
struct RawFile {
    #[prost(string, optional, tag = "1")]
    name: Option<String>,
    #[prost(string, optional, tag = "2")]
    package: Option<String>,
    #[prost(string, repeated, tag = "3")]
    dependency: Vec<String>,
    #[prost(bytes = "vec", repeated, tag = "4")]
    message_type: Vec<Vec<u8>>,
    #[prost(message, repeated, tag = "6")]
    service: Vec<RawService>,
    #[prost(string, optional, tag = "12")]
    syntax: Option<String>,
}

#[derive(Clone, PartialEq, Message)]
struct RawFileSet {
    #[prost(bytes = "vec", repeated, tag = "1")]
    file: Vec<Vec<u8>>,
}

#[derive(Clone, PartialEq, Message)]
struct RawRequest {
    #[prost(string, repeated, tag = "1")]
    file_to_generate: Vec<String>,
    #[prost(string, optional, tag = "2")]
    parameter: Option<String>,
    #[prost(bytes = "vec", repeated, tag = "15")]
    proto_file: Vec<Vec<u8>>,
}

fn empty_message(name: &str) -> Vec<u8> {
    DescriptorProto {
        name: Some(name.to_string()),
        ..Default::default()
    }
    .encode_to_vec()
}

fn service_file(file_name: &str, services: &[(&str, &[MethodSpec])]) -> Vec<u8> {
    let deps = deps_pool();
    let service = services
        .iter()
        .map(|(service_name, methods)| RawService {
            name: Some((*service_name).to_string()),
            method: methods
                .iter()
                .map(|m| RawMethod {
                    name: Some(m.name.to_string()),
                    input_type: Some(".foo.v1.Request".to_string()),
                    output_type: Some(".foo.v1.Response".to_string()),
                    options: (!m.http.is_empty()).then(|| {
                        method_options(&deps, "google.api.http", m.http).encode_to_vec()
                    }),
                })
                .collect(),
        })
        .collect();

    RawFile {
        name: Some(file_name.to_string()),
        package: Some("foo.v1".to_string()),
        dependency: vec!["google/api/annotations.proto".to_string()],
        message_type: vec![empty_message("Request"), empty_message("Response")],
        service,
        syntax: Some("proto3".to_string()),
    }
    .encode_to_vec()
}

fn all_files(file_name: &str, services: &[(&str, &[MethodSpec])]) -> Vec<Vec<u8>> {
    let mut files: Vec<Vec<u8>> = dependency_files()
        .iter()
        .map(Message::encode_to_vec)
        .collect();
    files.push(service_file(file_name, services));
    files
}

/// Serialized `FileDescriptorSet` with the dependencies and one service file.
pub fn descriptor_set_bytes(file_name: &str, services: &[(&str, &[MethodSpec])]) -> Vec<u8> {
    RawFileSet {
        file: all_files(file_name, services),
    }
    .encode_to_vec()
}

/// Pool decoded from raw bytes, as the plugin builds it.
pub fn service_pool(file_name: &str, services: &[(&str, &[MethodSpec])]) -> DescriptorPool {
    DescriptorPool::decode(descriptor_set_bytes(file_name, services).as_slice()).unwrap()
}

/// Serialized `CodeGeneratorRequest` asking for `file_name`.
pub fn request_bytes(
    file_name: &str,
    services: &[(&str, &[MethodSpec])],
    parameter: Option<&str>,
) -> Vec<u8> {
    RawRequest {
        file_to_generate: vec![file_name.to_string()],
        parameter: parameter.map(String::from),
        proto_file: all_files(file_name, services),
    }
    .encode_to_vec()
}
