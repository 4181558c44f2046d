/// Tri-state wrapper over an asynchronously loaded value.
///
/// A load starts as `Loading` and ends as `Loaded` or `Error`. Only a new
/// load moves a finished resource back to `Loading`.
#[derive(Debug, Clone, PartialEq)]
pub enum Resource<T> {
    Loading,
    Loaded(T),
    Error,
}

impl<T> Resource<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Resource::Loading)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Resource::Error)
    }

    pub fn loaded(&self) -> Option<&T> {
        match self {
            Resource::Loaded(value) => Some(value),
            _ => None,
        }
    }
}
