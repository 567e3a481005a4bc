//! XML document hook
//!
//! The codec carries XML documents (0x0F) as opaque text. Callers that want
//! documents checked while decoding install an [`XmlValidator`]; its error
//! is wrapped into [`AmfError::MalformedPayload`](crate::AmfError).

use crate::error::BoxError;

/// External XML parser consulted for each decoded XML document
pub trait XmlValidator: Send + Sync {
    fn validate(&self, document: &str) -> Result<(), BoxError>;
}

impl<F> XmlValidator for F
where
    F: Fn(&str) -> Result<(), BoxError> + Send + Sync,
{
    fn validate(&self, document: &str) -> Result<(), BoxError> {
        self(document)
    }
}
