//! NER Session - Form orchestration and result rendering
//!
//! Implements the client-side pipeline around one prediction request:
//! - `RequestBuilder`: form snapshot to request payload
//! - `SessionState`: single owner of form values, request status and results
//! - `ResultRenderer`: pure projection of a session into a display model
//!
//! Author: hephaex@gmail.com

pub mod builder;
pub mod labels;
pub mod render;
pub mod session;

pub use builder::RequestBuilder;
pub use labels::Labels;
pub use render::{DisplayModel, EntityCard, ResultRenderer, ResultsPanel, SubmitControl};
pub use session::{PendingRequest, SessionState};
