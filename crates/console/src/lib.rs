//! What a screen does with a gateway result: list state that follows the
//! server's pages, and the notice shown to the user.

pub mod list;
pub mod notice;

pub use {
    list::{DEFAULT_PAGE_SIZE, PageState, load_page},
    notice::{Notice, REQUEST_FAILED},
};
