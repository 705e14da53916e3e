//! Result rendering
//!
//! Projects a [`SessionState`] into a [`DisplayModel`]. Rendering never
//! mutates the session; the same state always yields the same model.

use ner_core::{Entity, RequestStatus};
use serde::Serialize;

use crate::session::SessionState;

/// Everything the results view shows for one session state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayModel {
    /// Request status at render time
    pub status: RequestStatus,

    /// Submit button
    pub submit: SubmitControl,

    /// Error banner, present only after a failed request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_banner: Option<String>,

    /// Heading of the results panel
    pub heading: String,

    /// Results panel body
    pub results: ResultsPanel,
}

/// State of the submit control
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmitControl {
    pub label: String,
    pub enabled: bool,
}

/// Body of the results panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResultsPanel {
    /// Nothing to show
    Placeholder { message: String },
    /// One card per entity, in service order
    Cards { cards: Vec<EntityCard> },
}

/// One rendered entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityCard {
    /// Entity label
    pub entity_type: String,
    /// Surface text in guillemets
    pub quoted_text: String,
    /// `[start=S, end=E]`
    pub offsets: String,
}

impl EntityCard {
    fn from_entity(entity: &Entity) -> Self {
        Self {
            entity_type: entity.entity_type.clone(),
            quoted_text: format!("«{}»", entity.text),
            offsets: format!(
                "[start={}, end={}]",
                entity.start_offset, entity.end_offset
            ),
        }
    }
}

/// Projects sessions into display models
pub struct ResultRenderer;

impl ResultRenderer {
    pub fn render(state: &SessionState) -> DisplayModel {
        let labels = state.labels();
        let pending = state.status().is_pending();

        let submit = SubmitControl {
            label: (if pending { labels.loading } else { labels.submit }).to_string(),
            enabled: !pending,
        };

        let results = if state.last_entities().is_empty() {
            ResultsPanel::Placeholder {
                message: labels.no_entities.to_string(),
            }
        } else {
            ResultsPanel::Cards {
                cards: state
                    .last_entities()
                    .iter()
                    .map(EntityCard::from_entity)
                    .collect(),
            }
        };

        DisplayModel {
            status: state.status(),
            submit,
            error_banner: state.last_error_message().map(str::to_string),
            heading: labels.results_heading.to_string(),
            results,
        }
    }
}

impl DisplayModel {
    /// Rendered cards; empty when the placeholder is shown
    pub fn cards(&self) -> &[EntityCard] {
        match &self.results {
            ResultsPanel::Cards { cards } => cards,
            ResultsPanel::Placeholder { .. } => &[],
        }
    }
}

impl std::fmt::Display for DisplayModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.submit.enabled {
            writeln!(f, "[ {} ]", self.submit.label)?;
        } else {
            writeln!(f, "[ {} ] (disabled)", self.submit.label)?;
        }

        if let Some(error) = &self.error_banner {
            writeln!(f, "! {error}")?;
        }

        writeln!(f)?;
        writeln!(f, "{}", self.heading)?;
        match &self.results {
            ResultsPanel::Placeholder { message } => writeln!(f, "  {message}"),
            ResultsPanel::Cards { cards } => {
                let width = cards
                    .iter()
                    .map(|c| c.entity_type.chars().count())
                    .max()
                    .unwrap_or(0);
                for card in cards {
                    writeln!(
                        f,
                        "  {:<width$}  {}  {}",
                        card.entity_type, card.quoted_text, card.offsets
                    )?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ner_core::{ClientError, FormInput, Locale};

    fn succeeded_with(entities: Vec<Entity>) -> SessionState {
        let mut session = SessionState::default();
        let pending = session.begin_submit().unwrap();
        session.complete(pending.request_id, Ok(entities));
        session
    }

    #[test]
    fn test_idle_shows_placeholder() {
        let model = ResultRenderer::render(&SessionState::default());

        assert_eq!(model.status, RequestStatus::Idle);
        assert_eq!(
            model.results,
            ResultsPanel::Placeholder {
                message: "No entities yet".to_string()
            }
        );
        assert!(model.cards().is_empty());
        assert!(model.error_banner.is_none());
        assert!(model.submit.enabled);
        assert_eq!(model.submit.label, "Analyze");
    }

    #[test]
    fn test_single_card() {
        let session = succeeded_with(vec![Entity::new("LOC", "Москва", 0, 6)]);
        let model = ResultRenderer::render(&session);

        assert_eq!(
            model.cards(),
            &[EntityCard {
                entity_type: "LOC".to_string(),
                quoted_text: "«Москва»".to_string(),
                offsets: "[start=0, end=6]".to_string(),
            }]
        );
    }

    #[test]
    fn test_cards_keep_order_and_offsets_verbatim() {
        let session = succeeded_with(vec![
            Entity::new("PER", "Толстой", 40, 47),
            Entity::new("LOC", "Ясная Поляна", 3, 15),
            // Offsets past the text are shown as returned
            Entity::new("MISC", "x", 900, 901),
        ]);
        let model = ResultRenderer::render(&session);
        let rendered: Vec<(&str, &str)> = model
            .cards()
            .iter()
            .map(|c| (c.entity_type.as_str(), c.offsets.as_str()))
            .collect();

        assert_eq!(
            rendered,
            vec![
                ("PER", "[start=40, end=47]"),
                ("LOC", "[start=3, end=15]"),
                ("MISC", "[start=900, end=901]"),
            ]
        );
    }

    #[test]
    fn test_pending_disables_submit() {
        let mut session = SessionState::new(FormInput::default(), Locale::Ru);
        session.begin_submit();
        let model = ResultRenderer::render(&session);

        assert!(!model.submit.enabled);
        assert_eq!(model.submit.label, "Загрузка...");
        assert_eq!(
            model.results,
            ResultsPanel::Placeholder {
                message: "Пока нет сущностей".to_string()
            }
        );
    }

    #[test]
    fn test_failure_shows_banner_and_placeholder() {
        let mut session = SessionState::default();
        let pending = session.begin_submit().unwrap();
        session.complete(pending.request_id, Err(ClientError::Network("refused".into())));
        let model = ResultRenderer::render(&session);

        assert_eq!(model.error_banner.as_deref(), Some("Request to server failed"));
        assert!(model.cards().is_empty());
        assert!(model.submit.enabled);
    }

    #[test]
    fn test_render_is_pure() {
        let session = succeeded_with(vec![Entity::new("ORG", "ООН", 0, 3)]);
        assert_eq!(
            ResultRenderer::render(&session),
            ResultRenderer::render(&session)
        );
        assert_eq!(session.last_entities().len(), 1);
    }

    #[test]
    fn test_display_text() {
        let session = succeeded_with(vec![
            Entity::new("LOC", "Москва", 0, 6),
            Entity::new("PER", "Иван", 10, 14),
        ]);
        let text = ResultRenderer::render(&session).to_string();

        assert!(text.contains("[ Analyze ]"));
        assert!(text.contains("  LOC  «Москва»  [start=0, end=6]"));
        assert!(text.contains("  PER  «Иван»  [start=10, end=14]"));
        assert!(!text.contains('!'));
    }

    #[test]
    fn test_json_shape() {
        let session = succeeded_with(vec![Entity::new("LOC", "Москва", 0, 6)]);
        let json = serde_json::to_value(ResultRenderer::render(&session)).unwrap();

        assert_eq!(json["status"], "succeeded");
        assert_eq!(json["results"]["kind"], "cards");
        assert_eq!(json["results"]["cards"][0]["quoted_text"], "«Москва»");
        assert!(json.get("error_banner").is_none());
    }
}
