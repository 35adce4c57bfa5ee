//! # Page Location
//!
//! The selection has no storage of its own: the page URL is the store. This
//! module abstracts the host's view of that URL behind the [`Location`] trait.
//!
//! ## Design Rationale
//!
//! Actions never cache the selection. Each one reads [`Location::href`], derives
//! the new URL and hands it to [`Location::navigate`]. Whatever changed the URL
//! in between (another tab, back/forward, a second rapid click) is therefore
//! picked up automatically.
//!
//! ## Implementations
//!
//! - [`memory::InMemoryLocation`]: a history stack with back/forward, used by
//!   tests and the command-line host
//!
//! A browser host implements the trait over `window.location` and its router;
//! navigation failures stay the host's concern, so `navigate` returns nothing.

pub mod memory;

/// The host page's current address and its navigation primitive.
pub trait Location {
    /// The current URL, exactly as the host reports it.
    fn href(&self) -> String;

    /// Requests a full navigation to `url`.
    fn navigate(&mut self, url: &str);
}

impl<L: Location + ?Sized> Location for &mut L {
    fn href(&self) -> String {
        (**self).href()
    }

    fn navigate(&mut self, url: &str) {
        (**self).navigate(url)
    }
}
