//! Lifecycle workflows.
//!
//! Each operation is a free function over a [`FlowContext`](crate::context::FlowContext):
//! - `start`: create the work branch from the source
//! - `update`: bring the work branch up to date
//! - `deploy`: merge into the deploy branches and run the deploy hook
//! - `review`: open a pull request
//! - `finish`: merge everywhere, version, changelog, tag, clean up
//! - `abort` / `publish`: drop or push the work branch
//! - `inspect`: branch listing, difftool, compare view
//! - `init`: write `.zenflow.toml`

pub mod abort;
pub mod deploy;
pub mod finish;
pub mod init;
pub mod inspect;
pub mod review;
pub mod start;
pub mod update;

pub use abort::{abort, publish};
pub use deploy::{deploy, deploy_to};
pub use finish::finish;
pub use init::init;
pub use inspect::{branches, compare, diff};
pub use review::{list_reviews, review};
pub use start::start;
pub use update::update;
