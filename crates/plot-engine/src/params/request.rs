use geoplot_common::{PlotError, PlotResult};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{
    BoundaryParams, BoundarySpec, BubbleParams, BubbleSpec, ChoroplethParams, ChoroplethSpec,
    DotParams, DotSpec, Hist2DParams, Hist2DSpec,
};

/// One render request in caller form, tagged by `kind`:
///
/// ```json
/// {"kind": "dot", "x": [121.5], "y": [25.0], "color": "tab:blue"}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PlotRequestSpec {
    Choropleth(ChoroplethSpec),
    Hist2d(Hist2DSpec),
    Dot(DotSpec),
    Bubble(BubbleSpec),
    Boundary(BoundarySpec),
}

/// A validated render request.
#[derive(Debug, Clone)]
pub enum PlotRequest {
    Choropleth(ChoroplethParams),
    Hist2D(Hist2DParams),
    Dot(DotParams),
    Bubble(BubbleParams),
    Boundary(BoundaryParams),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlotKind {
    Choropleth,
    Hist2d,
    Dot,
    Bubble,
    Boundary,
}

impl PlotKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlotKind::Choropleth => "choropleth",
            PlotKind::Hist2d => "hist2d",
            PlotKind::Dot => "dot",
            PlotKind::Bubble => "bubble",
            PlotKind::Boundary => "boundary",
        }
    }
}

impl fmt::Display for PlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<PlotRequestSpec> for PlotRequest {
    type Error = PlotError;

    fn try_from(spec: PlotRequestSpec) -> PlotResult<Self> {
        Ok(match spec {
            PlotRequestSpec::Choropleth(s) => PlotRequest::Choropleth(s.try_into()?),
            PlotRequestSpec::Hist2d(s) => PlotRequest::Hist2D(s.try_into()?),
            PlotRequestSpec::Dot(s) => PlotRequest::Dot(s.try_into()?),
            PlotRequestSpec::Bubble(s) => PlotRequest::Bubble(s.try_into()?),
            PlotRequestSpec::Boundary(s) => PlotRequest::Boundary(s.try_into()?),
        })
    }
}

impl PlotRequest {
    /// Parse and validate a JSON request.
    ///
    /// Malformed JSON is an `InvalidParameter` error; a well-formed request
    /// with bad values fails with the specific validation error.
    pub fn from_json(json: &str) -> PlotResult<Self> {
        let spec: PlotRequestSpec = serde_json::from_str(json)?;
        spec.try_into()
    }

    pub fn kind(&self) -> PlotKind {
        match self {
            PlotRequest::Choropleth(_) => PlotKind::Choropleth,
            PlotRequest::Hist2D(_) => PlotKind::Hist2d,
            PlotRequest::Dot(_) => PlotKind::Dot,
            PlotRequest::Bubble(_) => PlotKind::Bubble,
            PlotRequest::Boundary(_) => PlotKind::Boundary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geoplot_common::Level;

    #[test]
    fn test_dispatch_by_kind() {
        let request = PlotRequest::from_json(r#"{"kind": "boundary", "level": "town"}"#).unwrap();
        assert!(matches!(request, PlotRequest::Boundary(ref p) if p.level == Level::Town));
        assert_eq!(request.kind(), PlotKind::Boundary);

        let request = PlotRequest::from_json(r#"{"kind": "hist2d", "x": [1], "y": [2], "bins": [4, 8]}"#).unwrap();
        assert_eq!(request.kind(), PlotKind::Hist2d);
    }

    #[test]
    fn test_validation_error_kind_preserved() {
        let err = PlotRequest::from_json(r#"{"kind": "choropleth", "data": [], "level": "province"}"#).unwrap_err();
        assert!(matches!(err, PlotError::UnknownLevel(_)));

        let err = PlotRequest::from_json(r#"{"kind": "dot", "x": [1, 2], "y": [1]}"#).unwrap_err();
        assert!(matches!(err, PlotError::ArrayLengthMismatch { .. }));
    }

    #[test]
    fn test_malformed_request() {
        let err = PlotRequest::from_json(r#"{"kind": "pie"}"#).unwrap_err();
        assert!(matches!(err, PlotError::InvalidParameter { ref param, .. } if param == "request"));
    }
}
