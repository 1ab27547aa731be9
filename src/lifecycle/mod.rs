//! Credit lifecycle: the phase registry, the history timeline and the
//! onboarding wizard. Nothing in here talks to the network directly.

pub mod phases;
pub mod timeline;
pub mod wizard;
