use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// A bounding box, either two- or three-dimensional.
///
/// # Examples
///
/// ```
/// use stac::Bbox;
///
/// let bbox = Bbox::new(-105.1, 40.1, -105.0, 40.2);
/// assert_eq!(bbox.xmin(), -105.1);
/// let bbox: Bbox = vec![-105.1, 40.1, 0.0, -105.0, 40.2, 10.0].try_into().unwrap();
/// assert!(bbox.is_3d());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub enum Bbox {
    /// `[xmin, ymin, xmax, ymax]`
    TwoDimensional([f64; 4]),

    /// `[xmin, ymin, zmin, xmax, ymax, zmax]`
    ThreeDimensional([f64; 6]),
}

impl Bbox {
    /// Creates a new 2D bbox.
    pub fn new(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Bbox {
        Bbox::TwoDimensional([xmin, ymin, xmax, ymax])
    }

    /// Returns true if this is a 3D bbox.
    pub fn is_3d(&self) -> bool {
        matches!(self, Bbox::ThreeDimensional(_))
    }

    /// Returns the minimum x value.
    pub fn xmin(&self) -> f64 {
        match self {
            Bbox::TwoDimensional(v) => v[0],
            Bbox::ThreeDimensional(v) => v[0],
        }
    }

    /// Returns the number of values in this bbox, four or six.
    pub fn len(&self) -> usize {
        match self {
            Bbox::TwoDimensional(_) => 4,
            Bbox::ThreeDimensional(_) => 6,
        }
    }

    /// Always false.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns the values as a slice.
    pub fn as_slice(&self) -> &[f64] {
        match self {
            Bbox::TwoDimensional(v) => v,
            Bbox::ThreeDimensional(v) => v,
        }
    }
}

impl TryFrom<Vec<f64>> for Bbox {
    type Error = Error;

    fn try_from(value: Vec<f64>) -> Result<Bbox> {
        match value.len() {
            4 => Ok(Bbox::TwoDimensional([value[0], value[1], value[2], value[3]])),
            6 => Ok(Bbox::ThreeDimensional([
                value[0], value[1], value[2], value[3], value[4], value[5],
            ])),
            _ => Err(Error::InvalidBbox(value)),
        }
    }
}

impl From<Bbox> for Vec<f64> {
    fn from(value: Bbox) -> Self {
        value.as_slice().to_vec()
    }
}

impl std::fmt::Display for Bbox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let values: Vec<String> = self.as_slice().iter().map(|v| v.to_string()).collect();
        f.write_str(&values.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::Bbox;

    #[test]
    fn invalid_length() {
        assert!(Bbox::try_from(vec![1.0, 2.0, 3.0]).is_err());
        assert!(serde_json::from_str::<Bbox>("[1, 2, 3]").is_err());
    }

    #[test]
    fn display() {
        assert_eq!(Bbox::new(-105.0, 40.0, -104.0, 41.0).to_string(), "-105,40,-104,41");
    }
}
