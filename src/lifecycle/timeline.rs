use std::collections::BTreeSet;

use juniper::GraphQLEnum;

use crate::{
    lifecycle::phases::{phase_metadata, PhaseMetadata},
    models::{
        credit::{CreditState, PhaseTransitionEvent},
        payload,
    },
};

pub const NO_EVENTS_MESSAGE: &str = "Este crédito aún no registra cambios de fase";

#[derive(Clone, Copy, GraphQLEnum, Debug, PartialEq, Eq, Default)]
pub enum TimelineOrder {
    /// Oldest first
    #[default]
    Ascending,
    Descending,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TimelineHeader {
    pub current_phase: PhaseMetadata,
    pub state: CreditState,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TimelineRow {
    pub event_id: i32,
    pub from: Option<PhaseMetadata>,
    pub to: PhaseMetadata,
    pub timestamp: String,
    pub user: String,
    pub description: String,
    pub expanded: bool,
    /// Only filled for expanded rows
    pub details: Vec<(String, String)>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TimelineBody {
    Empty { message: &'static str },
    Events(Vec<TimelineRow>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct TimelineView {
    pub header: TimelineHeader,
    pub body: TimelineBody,
}

impl TimelineView {
    pub fn rows(&self) -> &[TimelineRow] {
        match &self.body {
            TimelineBody::Events(rows) => rows,
            TimelineBody::Empty { .. } => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.body, TimelineBody::Empty { .. })
    }
}

/// Expansion state for one credit's history. Rendering never mutates it.
#[derive(Clone, Debug, Default)]
pub struct Timeline {
    expanded: BTreeSet<i32>,
}

impl Timeline {
    pub fn new() -> Timeline {
        Timeline::default()
    }

    pub fn with_expanded(event_ids: impl IntoIterator<Item = i32>) -> Timeline {
        Timeline {
            expanded: event_ids.into_iter().collect(),
        }
    }

    /// Flips one event, returns whether it ended up expanded
    pub fn toggle(&mut self, event_id: i32) -> bool {
        if self.expanded.remove(&event_id) {
            return false;
        }
        self.expanded.insert(event_id);
        true
    }

    pub fn is_expanded(&self, event_id: i32) -> bool {
        self.expanded.contains(&event_id)
    }

    pub fn render(
        &self,
        events: &[PhaseTransitionEvent],
        current_phase: &str,
        state: CreditState,
        order: TimelineOrder,
    ) -> TimelineView {
        let header = TimelineHeader {
            current_phase: phase_metadata(current_phase),
            state,
        };

        if events.is_empty() {
            return TimelineView {
                header,
                body: TimelineBody::Empty {
                    message: NO_EVENTS_MESSAGE,
                },
            };
        }

        // stable, so events sharing a timestamp keep the upstream order
        let mut ordered: Vec<&PhaseTransitionEvent> = events.iter().collect();
        ordered.sort_by_key(|event| event.timestamp);
        if order == TimelineOrder::Descending {
            ordered.reverse();
        }

        let rows = ordered
            .into_iter()
            .map(|event| self.render_row(event))
            .collect();

        TimelineView {
            header,
            body: TimelineBody::Events(rows),
        }
    }

    fn render_row(&self, event: &PhaseTransitionEvent) -> TimelineRow {
        let expanded = self.is_expanded(event.id);
        let details = if expanded {
            event
                .payload
                .iter()
                .map(|(key, value)| (key.to_owned(), payload::display_value(value)))
                .collect()
        } else {
            Vec::new()
        };

        TimelineRow {
            event_id: event.id,
            from: event.previous_phase.as_deref().map(phase_metadata),
            to: phase_metadata(&event.new_phase),
            timestamp: event.timestamp.to_rfc3339(),
            user: event.user.to_owned(),
            description: event.description.to_owned(),
            expanded,
            details,
        }
    }
}

