use juniper::GraphQLObject;
use serde::Serialize;

/// How a phase is presented, nothing here is computed
#[derive(Clone, Copy, Serialize, Debug, PartialEq, Eq)]
pub struct PhaseMetadata {
    pub id: &'static str,
    pub title: &'static str,
    pub icon: &'static str,
    pub color_tag: &'static str,
}

pub const UNKNOWN_PHASE: PhaseMetadata = PhaseMetadata {
    id: "DESCONOCIDA",
    title: "Fase desconocida",
    icon: "help-circle",
    color_tag: "gray",
};

// Ordered as a credit goes through them
pub const PHASES: [PhaseMetadata; 8] = [
    PhaseMetadata {
        id: "FASE_1",
        title: "Solicitud",
        icon: "file-plus",
        color_tag: "blue",
    },
    PhaseMetadata {
        id: "FASE_2",
        title: "Documentación",
        icon: "file-text",
        color_tag: "indigo",
    },
    PhaseMetadata {
        id: "FASE_3",
        title: "Información laboral",
        icon: "briefcase",
        color_tag: "purple",
    },
    PhaseMetadata {
        id: "FASE_4",
        title: "Domicilio",
        icon: "home",
        color_tag: "teal",
    },
    PhaseMetadata {
        id: "FASE_5",
        title: "Garante",
        icon: "users",
        color_tag: "cyan",
    },
    PhaseMetadata {
        id: "FASE_6",
        title: "Revisión",
        icon: "search",
        color_tag: "orange",
    },
    PhaseMetadata {
        id: "FASE_7",
        title: "Aprobación",
        icon: "check-circle",
        color_tag: "green",
    },
    PhaseMetadata {
        id: "FASE_8",
        title: "Desembolso",
        icon: "dollar-sign",
        color_tag: "emerald",
    },
];

/// Total lookup, anything outside the eight known ids gets [`UNKNOWN_PHASE`]
pub fn phase_metadata(phase_id: &str) -> PhaseMetadata {
    PHASES
        .iter()
        .find(|phase| phase.id == phase_id.trim())
        .copied()
        .unwrap_or(UNKNOWN_PHASE)
}

pub fn is_known_phase(phase_id: &str) -> bool {
    PHASES.iter().any(|phase| phase.id == phase_id.trim())
}

/// Phase as the schema sees it
#[derive(Clone, Serialize, GraphQLObject, Debug, PartialEq)]
pub struct Phase {
    pub id: String,
    pub title: String,
    pub icon: String,
    pub color_tag: String,
}

impl From<PhaseMetadata> for Phase {
    fn from(metadata: PhaseMetadata) -> Self {
        Phase {
            id: metadata.id.to_owned(),
            title: metadata.title.to_owned(),
            icon: metadata.icon.to_owned(),
            color_tag: metadata.color_tag.to_owned(),
        }
    }
}
