//! Run configuration: temp-root precedence and step deadlines.

use std::{
    ffi::OsString,
    fmt,
    path::{Path, PathBuf},
    time::Duration,
};

/// Environment variable consulted first for the temp root.
pub const GENTEMP_ENV: &str = "WEFT_GENTEMP";

/// Environment variable consulted second for the temp root.
pub const TEMP_ENV: &str = "WEFT_TEMP";

/// Where the resolved temp root came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TempRootSource {
    /// `-t/--temp` on the command line (or set on the request).
    Explicit,
    /// The `WEFT_GENTEMP` environment variable.
    GenTempEnv,
    /// The `WEFT_TEMP` environment variable.
    TempEnv,
    /// The platform temp directory.
    SystemDefault,
}

impl fmt::Display for TempRootSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explicit => f.write_str("explicit"),
            Self::GenTempEnv => f.write_str(GENTEMP_ENV),
            Self::TempEnv => f.write_str(TEMP_ENV),
            Self::SystemDefault => f.write_str("system default"),
        }
    }
}

/// The directory under which a run's workspace is allocated.
///
/// Precedence, first non-empty wins:
/// 1. the explicit value from the request
/// 2. `WEFT_GENTEMP`
/// 3. `WEFT_TEMP`
/// 4. [`std::env::temp_dir`]
///
/// Resolution reads the environment every time it is called; nothing is
/// cached between runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TempRoot {
    path: PathBuf,
    source: TempRootSource,
}

impl TempRoot {
    /// Resolve against the process environment.
    pub fn resolve(explicit: Option<&Path>) -> Self {
        Self::resolve_with(explicit, |key| std::env::var_os(key))
    }

    /// Resolve using a custom environment lookup.
    pub fn resolve_with<F>(explicit: Option<&Path>, env: F) -> Self
    where
        F: Fn(&str) -> Option<OsString>,
    {
        if let Some(path) = explicit.filter(|p| !p.as_os_str().is_empty()) {
            return Self {
                path: path.to_path_buf(),
                source: TempRootSource::Explicit,
            };
        }

        for (key, source) in [
            (GENTEMP_ENV, TempRootSource::GenTempEnv),
            (TEMP_ENV, TempRootSource::TempEnv),
        ] {
            if let Some(value) = env(key).filter(|v| !v.is_empty()) {
                return Self {
                    path: PathBuf::from(value),
                    source,
                };
            }
        }

        Self {
            path: std::env::temp_dir(),
            source: TempRootSource::SystemDefault,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn source(&self) -> TempRootSource {
        self.source
    }
}

/// Upper bounds on the two subprocess steps. `None` waits indefinitely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadlines {
    pub build: Option<Duration>,
    pub execute: Option<Duration>,
}

impl Deadlines {
    /// Ten minutes, for both steps.
    pub const DEFAULT_SECS: u64 = 600;

    /// No deadline on either step.
    pub const NONE: Self = Self {
        build: None,
        execute: None,
    };

    /// Apply the same limit to both steps; `0` disables the limit.
    pub fn from_secs(secs: u64) -> Self {
        let limit = (secs > 0).then(|| Duration::from_secs(secs));
        Self {
            build: limit,
            execute: limit,
        }
    }
}

impl Default for Deadlines {
    fn default() -> Self {
        Self::from_secs(Self::DEFAULT_SECS)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<OsString> {
        let map: HashMap<String, OsString> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), OsString::from(v)))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_explicit_wins_over_env() {
        let env = env_of(&[(GENTEMP_ENV, "/gentemp"), (TEMP_ENV, "/temp")]);
        let root = TempRoot::resolve_with(Some(Path::new("/flag")), env);
        assert_eq!(root.path(), Path::new("/flag"));
        assert_eq!(root.source(), TempRootSource::Explicit);
    }

    #[test]
    fn test_gentemp_before_temp() {
        let env = env_of(&[(GENTEMP_ENV, "/gentemp"), (TEMP_ENV, "/temp")]);
        let root = TempRoot::resolve_with(None, env);
        assert_eq!(root.path(), Path::new("/gentemp"));
        assert_eq!(root.source(), TempRootSource::GenTempEnv);
    }

    #[test]
    fn test_temp_env_fallback() {
        let env = env_of(&[(TEMP_ENV, "/temp")]);
        let root = TempRoot::resolve_with(None, env);
        assert_eq!(root.path(), Path::new("/temp"));
        assert_eq!(root.source(), TempRootSource::TempEnv);
    }

    #[test]
    fn test_empty_values_are_unset() {
        let env = env_of(&[(GENTEMP_ENV, ""), (TEMP_ENV, "")]);
        let root = TempRoot::resolve_with(Some(Path::new("")), env);
        assert_eq!(root.path(), std::env::temp_dir().as_path());
        assert_eq!(root.source(), TempRootSource::SystemDefault);
    }

    #[test]
    fn test_deadlines_from_secs() {
        assert_eq!(Deadlines::from_secs(0), Deadlines::NONE);
        let d = Deadlines::from_secs(30);
        assert_eq!(d.build, Some(Duration::from_secs(30)));
        assert_eq!(d.execute, Some(Duration::from_secs(30)));
        assert_eq!(
            Deadlines::default().build,
            Some(Duration::from_secs(Deadlines::DEFAULT_SECS))
        );
    }
}
