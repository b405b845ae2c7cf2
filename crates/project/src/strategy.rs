//! Projection strategy registry.
//!
//! Both projection strategies are exposed and the caller chooses; the
//! engine never guesses a default between them. String-based construction
//! serves the CLI and any other name-driven frontend.

use cartoflow_core::ProjectError;

/// All recognized strategy names.
const STRATEGY_NAMES: &[&str] = &["bilinear", "triangulation"];

/// How polygon vertices are carried through the displacement grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Bilinear interpolation of the displacement deltas. Cheap; no
    /// topology guarantee.
    Bilinear,
    /// Triangulated affine recovery over the chosen cell diagonals.
    /// Tolerates non-convex deformed cells.
    Triangulation,
}

impl Strategy {
    /// Constructs a strategy by name.
    ///
    /// Returns `ProjectError::UnknownStrategy` if the name is not
    /// recognized.
    pub fn from_name(name: &str) -> Result<Self, ProjectError> {
        match name {
            "bilinear" => Ok(Strategy::Bilinear),
            "triangulation" => Ok(Strategy::Triangulation),
            _ => Err(ProjectError::UnknownStrategy(name.to_string())),
        }
    }

    /// The canonical name of this strategy.
    pub fn name(self) -> &'static str {
        match self {
            Strategy::Bilinear => "bilinear",
            Strategy::Triangulation => "triangulation",
        }
    }

    /// Returns a slice of all recognized strategy names.
    pub fn list_names() -> &'static [&'static str] {
        STRATEGY_NAMES
    }
}
