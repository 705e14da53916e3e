//! Advisory model suggestions per framework
//!
//! The service decides which model names it accepts. These lists only
//! feed hints and warnings; nothing here blocks a submission.

use crate::Framework;

const SPACY_MODELS: &[&str] = &["ru_core_news_sm", "en_core_web_sm", "en_core_web_trf"];
const HF_MODELS: &[&str] = &["bert-base-multilingual-cased", "bert-base-russian-cased"];
const FLAIR_MODELS: &[&str] = &["ner-fast", "ner-english-fast"];

/// Suggested model names for a framework, most common first
pub fn suggested_models(framework: Framework) -> &'static [&'static str] {
    match framework {
        Framework::Spacy => SPACY_MODELS,
        Framework::Hf => HF_MODELS,
        Framework::Flair => FLAIR_MODELS,
    }
}

/// Whether `model_name` is one of the suggestions for `framework`
pub fn is_suggested(framework: Framework, model_name: &str) -> bool {
    suggested_models(framework).contains(&model_name.trim())
}
