/// Generation-tagged mesh loading.
///
/// Every request gets a fresh token. A completion is only applied when its
/// token is still the newest one handed out, so a slow load can never
/// overwrite the result of a request made after it. In-flight I/O is not
/// aborted; its result is dropped on arrival.

use std::fmt;

use crate::error::LoadError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GenerationToken(u64);

impl fmt::Display for GenerationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A load the host should perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    pub token: GenerationToken,
    pub source: String,
}

/// The host's answer to a [`LoadRequest`]
#[derive(Debug)]
pub struct LoadCompletion {
    pub token: GenerationToken,
    pub result: Result<String, LoadError>,
}

impl LoadCompletion {
    pub fn new(request: &LoadRequest, result: Result<String, LoadError>) -> Self {
        Self {
            token: request.token,
            result,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadStatus {
    /// Nothing requested yet
    #[default]
    Idle,
    Loading,
    Ready,
    /// The newest load failed; whatever was shown before is still shown
    Failed(String),
}

#[derive(Debug, Default)]
pub struct LoadProtocol {
    current: u64,
}

impl LoadProtocol {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, source: impl Into<String>) -> LoadRequest {
        LoadRequest {
            token: self.invalidate(),
            source: source.into(),
        }
    }

    /// Make every outstanding request stale
    pub fn invalidate(&mut self) -> GenerationToken {
        self.current += 1;
        GenerationToken(self.current)
    }

    pub fn is_current(&self, token: GenerationToken) -> bool {
        token.0 == self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_increase() {
        let mut protocol = LoadProtocol::new();
        let a = protocol.begin("a.obj");
        let b = protocol.begin("b.obj");
        assert!(b.token > a.token);
        assert_eq!(b.source, "b.obj");
    }

    #[test]
    fn test_only_newest_request_is_current() {
        let mut protocol = LoadProtocol::new();
        let a = protocol.begin("a.obj");
        assert!(protocol.is_current(a.token));

        let b = protocol.begin("b.obj");
        assert!(!protocol.is_current(a.token));
        assert!(protocol.is_current(b.token));

        protocol.invalidate();
        assert!(!protocol.is_current(b.token));
    }
}
