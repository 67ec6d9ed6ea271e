use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{convert::Infallible, fmt::Display, str::FromStr};

/// Every version we know about, oldest first.
static KNOWN: [Version; 5] = [
    Version::v1_0_0_beta_2,
    Version::v1_0_0_rc_1,
    Version::v1_0_0,
    Version::v1_1_0_beta_1,
    Version::v1_1_0,
];

/// A version of the STAC specification.
///
/// Known versions are totally ordered by semver, which is the order migration
/// walks. Anything else parses to [Version::Unknown].
///
/// # Examples
///
/// ```
/// use stac::Version;
///
/// let version: Version = "1.0.0".parse().unwrap();
/// assert_eq!(version, Version::v1_0_0);
/// assert_eq!(version.to_string(), "1.0.0");
/// assert!(Version::v1_0_0_rc_1.is_before(&Version::v1_0_0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Eq, Hash)]
#[allow(non_camel_case_types)]
#[non_exhaustive]
pub enum Version {
    /// [v1.0.0-beta.2](https://github.com/radiantearth/stac-spec/releases/tag/v1.0.0-beta.2)
    #[serde(rename = "1.0.0-beta.2")]
    v1_0_0_beta_2,

    /// [v1.0.0-rc.1](https://github.com/radiantearth/stac-spec/releases/tag/v1.0.0-rc.1)
    #[serde(rename = "1.0.0-rc.1")]
    v1_0_0_rc_1,

    /// [v1.0.0](https://github.com/radiantearth/stac-spec/releases/tag/v1.0.0)
    #[serde(rename = "1.0.0")]
    v1_0_0,

    /// [v1.1.0-beta.1](https://github.com/radiantearth/stac-spec/releases/tag/v1.1.0-beta.1)
    #[serde(rename = "1.1.0-beta.1")]
    v1_1_0_beta_1,

    /// [v1.1.0](https://github.com/radiantearth/stac-spec/releases/tag/v1.1.0)
    #[serde(rename = "1.1.0")]
    v1_1_0,

    /// An unknown STAC version.
    #[serde(untagged)]
    Unknown(String),
}

impl Version {
    /// Returns the latest stable version.
    ///
    /// # Examples
    ///
    /// ```
    /// use stac::Version;
    ///
    /// assert_eq!(Version::latest(), Version::v1_1_0);
    /// ```
    pub fn latest() -> Version {
        crate::STAC_VERSION
    }

    /// Returns every known version, oldest first.
    pub fn known() -> &'static [Version] {
        &KNOWN
    }

    /// Returns true if this is a version we know.
    ///
    /// # Examples
    ///
    /// ```
    /// use stac::Version;
    ///
    /// assert!(Version::v1_0_0.is_known());
    /// assert!(!Version::Unknown("0.9.0".to_string()).is_known());
    /// ```
    pub fn is_known(&self) -> bool {
        self.position().is_some()
    }

    /// Returns true if this version sorts strictly before the other one.
    ///
    /// Unknown versions are never before (or after) anything.
    pub fn is_before(&self, other: &Version) -> bool {
        match (self.position(), other.position()) {
            (Some(a), Some(b)) => a < b,
            _ => false,
        }
    }

    /// Returns the adjacent `(from, to)` hops that lead from this version to
    /// another, in order.
    ///
    /// # Examples
    ///
    /// ```
    /// use stac::Version;
    ///
    /// let steps = Version::v1_0_0_rc_1.steps(&Version::v1_1_0_beta_1).unwrap();
    /// assert_eq!(steps, vec![
    ///     (Version::v1_0_0_rc_1, Version::v1_0_0),
    ///     (Version::v1_0_0, Version::v1_1_0_beta_1),
    /// ]);
    /// assert!(Version::v1_1_0.steps(&Version::v1_0_0).is_err());
    /// ```
    pub fn steps(&self, to: &Version) -> Result<Vec<(Version, Version)>> {
        let from_index = self
            .position()
            .ok_or_else(|| Error::UnknownVersion(Some(self.to_string())))?;
        let to_index = to
            .position()
            .ok_or_else(|| Error::UnknownVersion(Some(to.to_string())))?;
        if to_index < from_index {
            return Err(Error::UnsupportedDowngrade {
                from: self.clone(),
                to: to.clone(),
            });
        }
        Ok(KNOWN[from_index..=to_index]
            .windows(2)
            .map(|pair| (pair[0].clone(), pair[1].clone()))
            .collect())
    }

    /// Returns the directory name used for this version's schemas, e.g. `v1.1.0`.
    pub fn schema_directory(&self) -> String {
        format!("v{self}")
    }

    fn position(&self) -> Option<usize> {
        KNOWN.iter().position(|version| version == self)
    }
}

impl FromStr for Version {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "1.0.0-beta.2" => Ok(Version::v1_0_0_beta_2),
            "1.0.0-rc.1" => Ok(Version::v1_0_0_rc_1),
            "1.0.0" => Ok(Version::v1_0_0),
            "1.1.0-beta.1" => Ok(Version::v1_1_0_beta_1),
            "1.1.0" => Ok(Version::v1_1_0),
            _ => Ok(Version::Unknown(s.to_string())),
        }
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Version::v1_0_0_beta_2 => "1.0.0-beta.2",
                Version::v1_0_0_rc_1 => "1.0.0-rc.1",
                Version::v1_0_0 => "1.0.0",
                Version::v1_1_0_beta_1 => "1.1.0-beta.1",
                Version::v1_1_0 => "1.1.0",
                Version::Unknown(v) => v,
            }
        )
    }
}

impl Default for Version {
    fn default() -> Self {
        crate::STAC_VERSION
    }
}

#[cfg(test)]
mod tests {
    use super::Version;
    use rstest::rstest;

    #[rstest]
    #[case("1.0.0-beta.2", Version::v1_0_0_beta_2)]
    #[case("1.0.0-rc.1", Version::v1_0_0_rc_1)]
    #[case("1.0.0", Version::v1_0_0)]
    #[case("1.1.0-beta.1", Version::v1_1_0_beta_1)]
    #[case("1.1.0", Version::v1_1_0)]
    #[case("0.9.0", Version::Unknown("0.9.0".to_string()))]
    fn parse(#[case] s: &str, #[case] expected: Version) {
        assert_eq!(s.parse::<Version>().unwrap(), expected);
        assert_eq!(expected.to_string(), s);
    }

    #[test]
    fn serde() {
        let version: Version = serde_json::from_str("\"1.0.0-rc.1\"").unwrap();
        assert_eq!(version, Version::v1_0_0_rc_1);
        let version: Version = serde_json::from_str("\"0.8.1\"").unwrap();
        assert_eq!(version, Version::Unknown("0.8.1".to_string()));
        assert_eq!(serde_json::to_string(&Version::v1_1_0).unwrap(), "\"1.1.0\"");
    }

    #[test]
    fn order() {
        let known = Version::known();
        for (i, a) in known.iter().enumerate() {
            for (j, b) in known.iter().enumerate() {
                assert_eq!(a.is_before(b), i < j);
            }
        }
    }

    #[test]
    fn steps_to_self() {
        assert!(Version::v1_0_0.steps(&Version::v1_0_0).unwrap().is_empty());
    }

    #[test]
    fn steps_all_the_way() {
        let steps = Version::v1_0_0_beta_2.steps(&Version::v1_1_0).unwrap();
        assert_eq!(steps.len(), 4);
        assert_eq!(steps[0].0, Version::v1_0_0_beta_2);
        assert_eq!(steps[3].1, Version::v1_1_0);
    }

    #[test]
    fn steps_unknown() {
        let unknown = Version::Unknown("0.9.0".to_string());
        assert!(matches!(
            unknown.steps(&Version::v1_1_0).unwrap_err(),
            crate::Error::UnknownVersion(Some(_))
        ));
        assert!(matches!(
            Version::v1_0_0.steps(&unknown).unwrap_err(),
            crate::Error::UnknownVersion(Some(_))
        ));
    }

    #[test]
    fn downgrade() {
        assert!(matches!(
            Version::v1_1_0.steps(&Version::v1_0_0).unwrap_err(),
            crate::Error::UnsupportedDowngrade { .. }
        ));
    }
}
