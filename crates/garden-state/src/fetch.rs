//! Fetch State
//!
//! Lifecycle of a one-shot data request, as shown to the UI.

use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum FetchState<T> {
    #[default]
    Idle,
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> FetchState<T> {
    /// Enter `Loading`, dropping any previous result
    pub fn start(&mut self) {
        *self = FetchState::Loading;
    }

    pub fn finish<E: Display>(&mut self, result: Result<T, E>) {
        *self = match result {
            Ok(data) => FetchState::Loaded(data),
            Err(e) => FetchState::Failed(e.to_string()),
        };
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            FetchState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            FetchState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RemoteError;

    #[test]
    fn test_lifecycle() {
        let mut state: FetchState<Vec<u32>> = FetchState::default();
        assert_eq!(state, FetchState::Idle);

        state.start();
        assert!(state.is_loading());

        state.finish::<RemoteError>(Ok(vec![1, 2]));
        assert_eq!(state.data(), Some(&vec![1, 2]));

        state.start();
        assert!(state.data().is_none());
        state.finish(Err::<Vec<u32>, _>(RemoteError::Status { path: "/plants/plants/".into(), status: 500 }));
        assert_eq!(state.error(), Some("/plants/plants/ answered 500"));
    }
}
