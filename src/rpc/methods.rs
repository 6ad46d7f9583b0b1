//! Catalog of ProbModelSEED remote methods
//!
//! Wire names are case-sensitive and always sent with the `ProbModelSEED.`
//! prefix. The three CamelCase entry points (`ModelReconstruction`,
//! `FluxBalanceAnalysis`, `GapfillModel`) are the older job-style API and
//! coexist with their snake_case successors.

use std::fmt;
use std::str::FromStr;

use crate::error::ProbModelSeedError;

/// Service prefix prepended to every method name on the wire.
pub const SERVICE_PREFIX: &str = "ProbModelSEED";

/// How many values of the server's `result` list a method hands back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Returns {
    /// Unwrap to `result[0]`.
    Single,
    /// Return the whole `result` list.
    All,
}

/// Every remote method exposed by the ProbModelSEED service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    ListGapfillSolutions,
    ManageGapfillSolutions,
    ListFbaStudies,
    DeleteFbaStudies,
    ExportModel,
    ExportMedia,
    GetModel,
    DeleteModel,
    ListModels,
    ListModelEdits,
    ManageModelEdits,
    GetFeature,
    CompareRegions,
    PlantAnnotationOverview,
    /// `ModelReconstruction`
    LegacyModelReconstruction,
    /// `FluxBalanceAnalysis`
    LegacyFluxBalanceAnalysis,
    /// `GapfillModel`
    LegacyGapfillModel,
    ImportMedia,
    ReconstructFbamodel,
    /// `flux_balance_analysis`; not the CamelCase `FluxBalanceAnalysis`
    FluxBalanceAnalysis,
    /// `gapfill_model`; not the CamelCase `GapfillModel`
    GapfillModel,
}

impl Method {
    /// All methods, in the order the service documents them.
    pub const ALL: [Method; 21] = [
        Method::ListGapfillSolutions,
        Method::ManageGapfillSolutions,
        Method::ListFbaStudies,
        Method::DeleteFbaStudies,
        Method::ExportModel,
        Method::ExportMedia,
        Method::GetModel,
        Method::DeleteModel,
        Method::ListModels,
        Method::ListModelEdits,
        Method::ManageModelEdits,
        Method::GetFeature,
        Method::CompareRegions,
        Method::PlantAnnotationOverview,
        Method::LegacyModelReconstruction,
        Method::LegacyFluxBalanceAnalysis,
        Method::LegacyGapfillModel,
        Method::ImportMedia,
        Method::ReconstructFbamodel,
        Method::FluxBalanceAnalysis,
        Method::GapfillModel,
    ];

    /// Bare method name as the service knows it, e.g. `get_model`.
    pub fn name(self) -> &'static str {
        match self {
            Method::ListGapfillSolutions => "list_gapfill_solutions",
            Method::ManageGapfillSolutions => "manage_gapfill_solutions",
            Method::ListFbaStudies => "list_fba_studies",
            Method::DeleteFbaStudies => "delete_fba_studies",
            Method::ExportModel => "export_model",
            Method::ExportMedia => "export_media",
            Method::GetModel => "get_model",
            Method::DeleteModel => "delete_model",
            Method::ListModels => "list_models",
            Method::ListModelEdits => "list_model_edits",
            Method::ManageModelEdits => "manage_model_edits",
            Method::GetFeature => "get_feature",
            Method::CompareRegions => "compare_regions",
            Method::PlantAnnotationOverview => "plant_annotation_overview",
            Method::LegacyModelReconstruction => "ModelReconstruction",
            Method::LegacyFluxBalanceAnalysis => "FluxBalanceAnalysis",
            Method::LegacyGapfillModel => "GapfillModel",
            Method::ImportMedia => "import_media",
            Method::ReconstructFbamodel => "reconstruct_fbamodel",
            Method::FluxBalanceAnalysis => "flux_balance_analysis",
            Method::GapfillModel => "gapfill_model",
        }
    }

    /// Fully qualified name sent in the request envelope.
    ///
    /// # Examples
    ///
    /// ```
    /// use probmodelseed::rpc::Method;
    ///
    /// assert_eq!(Method::GetModel.wire_name(), "ProbModelSEED.get_model");
    /// assert_eq!(
    ///     Method::LegacyGapfillModel.wire_name(),
    ///     "ProbModelSEED.GapfillModel"
    /// );
    /// ```
    pub fn wire_name(self) -> String {
        format!("{}.{}", SERVICE_PREFIX, self.name())
    }

    /// Whether the method takes an input payload. Only `list_models` does not.
    pub fn takes_input(self) -> bool {
        !matches!(self, Method::ListModels)
    }

    /// Result arity of the method. Every ProbModelSEED method returns one value.
    pub fn returns(self) -> Returns {
        Returns::Single
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Method {
    type Err = ProbModelSeedError;

    /// Parse a bare (`get_model`) or prefixed (`ProbModelSEED.get_model`)
    /// method name. Matching is case-sensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bare = s
            .strip_prefix(SERVICE_PREFIX)
            .and_then(|rest| rest.strip_prefix('.'))
            .unwrap_or(s);

        Method::ALL
            .iter()
            .copied()
            .find(|m| m.name() == bare)
            .ok_or_else(|| ProbModelSeedError::InvalidMethod(s.to_string()))
    }
}
