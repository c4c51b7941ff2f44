//! Request bodies that can be rebuilt for every attempt of a request.

use reqwest::multipart::{Form, Part};
use reqwest::RequestBuilder;

#[derive(Debug, Clone, Default)]
pub enum Payload {
    #[default]
    Empty,
    Json(serde_json::Value),
    Multipart(Vec<FormField>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: String,
    pub value: FormValue,
}

#[derive(Clone, PartialEq, Eq)]
pub enum FormValue {
    Text(String),
    File { file_name: String, bytes: Vec<u8> },
}

impl std::fmt::Debug for FormValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormValue::Text(text) => f.debug_tuple("Text").field(text).finish(),
            FormValue::File { file_name, bytes } => f
                .debug_struct("File")
                .field("file_name", file_name)
                .field("len", &bytes.len())
                .finish(),
        }
    }
}

impl FormField {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: FormValue::Text(value.into()),
        }
    }

    pub fn file(name: impl Into<String>, file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            value: FormValue::File {
                file_name: file_name.into(),
                bytes,
            },
        }
    }
}

impl Payload {
    /// Attach this body to a request. Multipart forms are rebuilt on each call.
    pub(crate) fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            Payload::Empty => request,
            Payload::Json(body) => request.json(body),
            Payload::Multipart(fields) => request.multipart(Self::build_form(fields)),
        }
    }

    fn build_form(fields: &[FormField]) -> Form {
        fields.iter().fold(Form::new(), |form, field| match &field.value {
            FormValue::Text(text) => form.text(field.name.clone(), text.clone()),
            FormValue::File { file_name, bytes } => form.part(
                field.name.clone(),
                Part::bytes(bytes.clone()).file_name(file_name.clone()),
            ),
        })
    }

    /// Names of the multipart fields, in order
    pub fn field_names(&self) -> Vec<&str> {
        match self {
            Payload::Multipart(fields) => fields.iter().map(|f| f.name.as_str()).collect(),
            _ => Vec::new(),
        }
    }
}
