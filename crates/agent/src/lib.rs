//! Chat actions for the rental assistant.
//!
//! The dialogue runtime names an action per turn; the registry looks it up and
//! runs it against the latest user message. Each action replies with exactly
//! one message and never sets conversation state.

pub mod actions;
pub mod context;
pub mod registry;
pub mod runtime;

pub use actions::{
    Action, ActionReply, AskAvailableVehicles, FilterBySpecs, RecommendByFeature, ReplyKind,
    ASK_AVAILABLE_VEHICLES, FILTER_BY_SPECS, RECOMMEND_BY_FEATURE,
};
pub use context::ActionContext;
pub use registry::{ActionRegistry, ActionResponse, DispatchError};
pub use runtime::{BotMessage, CollectingDispatcher, Domain, Event, Tracker};
