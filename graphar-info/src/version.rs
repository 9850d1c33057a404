use std::fmt::{Display, Formatter};
use std::str::FromStr;

use graphar_error::{GarError, gar_bail, gar_err};

/// The format version an info document was written with, of the form
/// `gar/v<n>` with an optional trailing `(t1,t2,…)` list of user-defined
/// type names the document relies on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoVersion {
    version: u32,
    user_defined_types: Vec<String>,
}

/// The only archive format version this library understands.
const SUPPORTED_VERSION: u32 = 1;

impl InfoVersion {
    /// The current version, with no user-defined types.
    pub fn new() -> Self {
        Self {
            version: SUPPORTED_VERSION,
            user_defined_types: Vec::new(),
        }
    }

    /// The numeric version.
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Names of user-defined types declared by the document.
    pub fn user_defined_types(&self) -> &[String] {
        &self.user_defined_types
    }

    /// Whether `name` is declared as a user-defined type.
    pub fn has_user_defined_type(&self, name: &str) -> bool {
        self.user_defined_types.iter().any(|t| t == name)
    }
}

impl Default for InfoVersion {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for InfoVersion {
    type Err = GarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s
            .strip_prefix("gar/v")
            .ok_or_else(|| gar_err!(Parse: "invalid version string {:?}", s))?;
        let (digits, types) = match rest.find('(') {
            Some(open) => {
                let inner = rest[open..]
                    .strip_prefix('(')
                    .and_then(|r| r.strip_suffix(')'))
                    .ok_or_else(|| gar_err!(Parse: "invalid version string {:?}", s))?;
                let types = inner
                    .split(',')
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty())
                    .collect();
                (rest[..open].trim_end(), types)
            }
            None => (rest, Vec::new()),
        };
        let version: u32 = digits
            .parse()
            .map_err(|_| gar_err!(Parse: "invalid version number {:?} in {:?}", digits, s))?;
        if version != SUPPORTED_VERSION {
            gar_bail!("unsupported archive version {}", version);
        }
        Ok(Self {
            version,
            user_defined_types: types,
        })
    }
}

impl Display for InfoVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "gar/v{}", self.version)?;
        if !self.user_defined_types.is_empty() {
            write!(f, " ({})", self.user_defined_types.join(","))?;
        }
        Ok(())
    }
}
