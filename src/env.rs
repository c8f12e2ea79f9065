//! Environment lookup.
//!
//! The resolver never reads `std::env` directly; callers pass an [`EnvSource`].

use std::collections::HashMap;
use tracing::warn;

/// A key-value lookup from variable name to optional text.
pub trait EnvSource {
    fn var(&self, name: &str) -> Option<String>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        let value = std::env::var_os(name)?;
        match value.into_string() {
            Ok(text) => Some(text),
            Err(_) => {
                warn!(variable = name, "Ignoring environment variable that is not valid UTF-8");
                None
            }
        }
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl EnvSource for HashMap<&str, &str> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).map(|v| v.to_string())
    }
}

impl<T: EnvSource + ?Sized> EnvSource for &T {
    fn var(&self, name: &str) -> Option<String> {
        (**self).var(name)
    }
}
