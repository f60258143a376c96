//! Tri-state holder for one fetched resource, and section precedence.
use std::sync::Arc;
use crate::fetch::FetchError;

/// Resolution status of one resource. Data and error are mutually exclusive
/// by construction; only `Loading` can move to a terminal variant.
#[derive(Debug)]
pub enum LoadState<T> {
    Loading,
    Loaded(T),
    Failed(Arc<FetchError>),
}

impl<T> Default for LoadState<T> {
    fn default() -> Self { LoadState::Loading }
}

// manual impl: Arc<FetchError> is Clone even though FetchError is not
impl<T: Clone> Clone for LoadState<T> {
    fn clone(&self) -> Self {
        match self {
            LoadState::Loading => LoadState::Loading,
            LoadState::Loaded(v) => LoadState::Loaded(v.clone()),
            LoadState::Failed(e) => LoadState::Failed(e.clone()),
        }
    }
}

impl<T: PartialEq> PartialEq for LoadState<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (LoadState::Loading, LoadState::Loading) => true,
            (LoadState::Loaded(a), LoadState::Loaded(b)) => a == b,
            (LoadState::Failed(a), LoadState::Failed(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl<T> LoadState<T> {
    pub fn data(&self) -> Option<&T> {
        match self { LoadState::Loaded(v) => Some(v), _ => None }
    }

    pub fn error(&self) -> Option<&Arc<FetchError>> {
        match self { LoadState::Failed(e) => Some(e), _ => None }
    }

    pub fn is_loading(&self) -> bool { matches!(self, LoadState::Loading) }

    /// Settle a pending state. Returns false (and leaves the state alone) when
    /// it has already settled; only [`LoadState::reset`] re-arms it.
    pub fn settle(&mut self, result: Result<T, Arc<FetchError>>) -> bool {
        if !self.is_loading() { return false; }
        *self = match result {
            Ok(v) => LoadState::Loaded(v),
            Err(e) => LoadState::Failed(e),
        };
        true
    }

    pub fn reset(&mut self) { *self = LoadState::Loading; }

    pub fn as_view(&self) -> SectionView<'_, T> {
        match self {
            LoadState::Failed(e) => SectionView::Error(e.as_ref()),
            LoadState::Loading => SectionView::Loading,
            LoadState::Loaded(v) => SectionView::Loaded(v),
        }
    }
}

/// What a section draws. Error beats loading, loading beats data.
#[derive(Debug)]
pub enum SectionView<'a, T, E: ?Sized = FetchError> {
    Error(&'a E),
    Loading,
    Loaded(&'a T),
}

impl<'a, T, E: ?Sized> SectionView<'a, T, E> {
    /// Pick the view from loose inputs the way a section receives them.
    pub fn select(error: Option<&'a E>, is_loading: bool, data: Option<&'a T>) -> Self {
        if let Some(e) = error { return SectionView::Error(e); }
        if is_loading { return SectionView::Loading; }
        match data {
            Some(d) => SectionView::Loaded(d),
            None => SectionView::Loading,
        }
    }
}
