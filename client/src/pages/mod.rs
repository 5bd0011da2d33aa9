//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped data loading and delegates identity changes
//! to the session controller. Protected pages are wrapped in `RequireAuth`
//! by the router, never by the page itself.

pub mod home;
pub mod login;
pub mod memos;
pub mod my_page;
pub mod oauth_callback;
pub mod post_detail;
pub mod posts;
pub mod register;
pub mod study;
pub mod todos;
pub mod workout;
