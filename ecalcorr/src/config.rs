//! Configuration of the table readers.

use super::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::io::Read;
use std::str::FromStr;

/// Column layout of a scale table.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleFormat {
    /// `label region runMin runMax scale errBin errStat errSyst [errGain]`
    Label,
    /// `runMin runMax etaMin etaMax r9Min r9Max etMin etMax gain scale errStat ...`
    #[default]
    Numeric,
}

/// Column layout of a smearing table.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SmearingFormat {
    /// `label unused etaMin etaMax r9Min r9Max runMin runMax Emean errEmean rho errRho phi
    /// errPhi`
    Legacy,
    /// `label Emean errEmean rho errRho phi errPhi`, where the angles may be `M_PI_2`
    #[default]
    Compact,
    /// `label rho phi`
    Minimal,
}

impl FromStr for ScaleFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "label" => Ok(Self::Label),
            "numeric" => Ok(Self::Numeric),
            _ => Err(Error::General(format!("unknown scale-table format `{s}`"))),
        }
    }
}

impl Display for ScaleFormat {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Label => write!(f, "label"),
            Self::Numeric => write!(f, "numeric"),
        }
    }
}

impl FromStr for SmearingFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "legacy" => Ok(Self::Legacy),
            "compact" => Ok(Self::Compact),
            "minimal" => Ok(Self::Minimal),
            _ => Err(Error::General(format!(
                "unknown smearing-table format `{s}`"
            ))),
        }
    }
}

impl Display for SmearingFormat {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Legacy => write!(f, "legacy"),
            Self::Compact => write!(f, "compact"),
            Self::Minimal => write!(f, "minimal"),
        }
    }
}

/// Settings needed to build a correction service from files.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Configuration {
    /// Layout of the `*_scales.dat` file.
    pub scale_format: ScaleFormat,
    /// Layout of the `*_smearings.dat` file.
    pub smearing_format: SmearingFormat,
}

impl Configuration {
    /// Reads a configuration from YAML. Missing keys keep their default.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML cannot be parsed.
    pub fn from_yaml<R: Read>(reader: R) -> Result<Self> {
        serde_yaml::from_reader(reader).map_err(|err| Error::Other(err.into()))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn formats_from_str() {
        assert_eq!("label".parse::<ScaleFormat>().unwrap(), ScaleFormat::Label);
        assert_eq!(
            "minimal".parse::<SmearingFormat>().unwrap(),
            SmearingFormat::Minimal
        );
        assert!("table".parse::<ScaleFormat>().is_err());
        assert_eq!(SmearingFormat::Legacy.to_string(), "legacy");
    }

    #[test]
    fn configuration_from_yaml() {
        let config = Configuration::from_yaml("scale_format: label\n".as_bytes()).unwrap();

        assert_eq!(
            config,
            Configuration {
                scale_format: ScaleFormat::Label,
                smearing_format: SmearingFormat::Compact,
            }
        );
        assert!(Configuration::from_yaml("scale_fmt: label\n".as_bytes()).is_err());
    }
}
