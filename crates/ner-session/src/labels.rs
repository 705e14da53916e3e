//! User-facing strings

use ner_core::Locale;

/// Fixed labels of the form and results panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Labels {
    pub title: &'static str,
    pub text_field: &'static str,
    pub framework_field: &'static str,
    pub model_field: &'static str,
    pub available_models: &'static str,
    pub submit: &'static str,
    pub loading: &'static str,
    pub results_heading: &'static str,
    pub no_entities: &'static str,
    /// Shown for every failed request, whatever the cause
    pub request_failed: &'static str,
}

const EN: Labels = Labels {
    title: "NER Stand",
    text_field: "Text to analyze",
    framework_field: "Framework",
    model_field: "Model name",
    available_models: "Available for",
    submit: "Analyze",
    loading: "Loading...",
    results_heading: "Extracted entities",
    no_entities: "No entities yet",
    request_failed: "Request to server failed",
};

const RU: Labels = Labels {
    title: "NER Stand",
    text_field: "Текст для анализа",
    framework_field: "Выберите фреймворк",
    model_field: "Название модели",
    available_models: "Доступно для",
    submit: "Анализировать",
    loading: "Загрузка...",
    results_heading: "Найденные сущности",
    no_entities: "Пока нет сущностей",
    request_failed: "Ошибка при запросе к серверу",
};

impl Labels {
    pub fn for_locale(locale: Locale) -> &'static Labels {
        match locale {
            Locale::En => &EN,
            Locale::Ru => &RU,
        }
    }
}
