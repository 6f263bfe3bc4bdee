//! Domain layer - pure types and rules with no transport or storage concerns.

pub mod foundation;
pub mod incident;
pub mod relay;
pub mod siren;
