//! Request payload construction

use ner_core::{FormInput, RequestPayload};

/// Builds request payloads from form values.
///
/// Fields are copied verbatim. Empty text is not rejected here; the
/// service owns input validation.
pub struct RequestBuilder;

impl RequestBuilder {
    pub fn build(form: &FormInput) -> RequestPayload {
        RequestPayload {
            text: form.text.clone(),
            framework: form.framework.as_str().to_string(),
            model_name: form.model_name.clone(),
        }
    }
}
