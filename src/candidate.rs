use crate::Point;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Provider-defined ranking of a candidate; larger is a better match.
///
/// Scores from different providers are not comparable.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Score {
    Int(i64),
    Float(f64),
}

impl Score {
    pub fn as_f64(&self) -> f64 {
        match *self {
            Score::Int(i) => i as f64,
            Score::Float(f) => f,
        }
    }
}

impl From<i64> for Score {
    fn from(value: i64) -> Self {
        Score::Int(value)
    }
}

impl From<f64> for Score {
    fn from(value: f64) -> Self {
        Score::Float(value)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Score::Int(i) => write!(f, "{}", i),
            Score::Float(v) => write!(f, "{}", v),
        }
    }
}

/// One normalized geocoding result.
///
/// Serializes as a GeoJSON-like point:
///
///```json
/// {
///   "type": "Point",
///   "coordinates": [-76.93067442482834, 38.84717175217679],
///   "properties": {
///     "address": "4600 Silver Hill Road, Suitland, Maryland, 20746",
///     "score": null
///   }
/// }
///```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(into = "CandidateFeature", from = "CandidateFeature")]
pub struct Candidate {
    address: String,
    location: Point<f64>,
    score: Option<Score>,
}

impl Candidate {
    pub fn new<S>(address: S, location: Point<f64>, score: Option<Score>) -> Self
    where
        S: Into<String>,
    {
        Candidate {
            address: address.into(),
            location,
            score,
        }
    }

    /// The matched address text as returned by the provider
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Location in `[x, y]` order
    pub fn location(&self) -> Point<f64> {
        self.location
    }

    pub fn score(&self) -> Option<Score> {
        self.score
    }
}

#[derive(Serialize, Deserialize)]
struct CandidateFeature {
    r#type: PointTag,
    coordinates: (f64, f64),
    properties: CandidateProperties,
}

#[derive(Serialize, Deserialize)]
enum PointTag {
    Point,
}

#[derive(Serialize, Deserialize)]
struct CandidateProperties {
    address: String,
    score: Option<Score>,
}

impl From<Candidate> for CandidateFeature {
    fn from(candidate: Candidate) -> Self {
        CandidateFeature {
            r#type: PointTag::Point,
            coordinates: (candidate.location.x(), candidate.location.y()),
            properties: CandidateProperties {
                address: candidate.address,
                score: candidate.score,
            },
        }
    }
}

impl From<CandidateFeature> for Candidate {
    fn from(feature: CandidateFeature) -> Self {
        let (x, y) = feature.coordinates;
        Candidate::new(
            feature.properties.address,
            Point::new(x, y),
            feature.properties.score,
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn serialized_shape_test() {
        let candidate = Candidate::new(
            "380 New York St, Redlands, California, 92373",
            Point::new(-117.19568, 34.05609),
            Some(Score::Int(100)),
        );
        assert_eq!(
            serde_json::to_value(&candidate).unwrap(),
            json!({
                "type": "Point",
                "coordinates": [-117.19568, 34.05609],
                "properties": {
                    "address": "380 New York St, Redlands, California, 92373",
                    "score": 100
                }
            })
        );
    }

    #[test]
    fn reparse_keeps_fields_test() {
        let candidate = Candidate::new(
            "4600 SILVER HILL RD, WASHINGTON, DC, 20233",
            Point::new(-76.92744, 38.845985),
            None,
        );
        let text = serde_json::to_string(&candidate).unwrap();
        let parsed: Candidate = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, candidate);
        assert_eq!(parsed.score(), None);

        let scored = Candidate::new("Main St", Point::new(1.5, 2.5), Some(Score::Float(97.5)));
        let parsed: Candidate =
            serde_json::from_value(serde_json::to_value(&scored).unwrap()).unwrap();
        assert_eq!(parsed.score(), Some(Score::Float(97.5)));
        assert_eq!(parsed.location(), Point::new(1.5, 2.5));
    }

    #[test]
    fn rejects_other_geometry_types() {
        let value = json!({
            "type": "LineString",
            "coordinates": [1.0, 2.0],
            "properties": { "address": "x", "score": null }
        });
        assert!(serde_json::from_value::<Candidate>(value).is_err());
    }
}
