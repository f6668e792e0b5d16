//! Task list state for the board.
//!
//! [`TaskListStore`] owns the canonical list and the three priority buckets
//! derived from it. [`TaskFormController`] owns one add/edit session and
//! hands the reconciled task back to the store. Both talk to the remote
//! service only through [`TaskApi`](crate::api::TaskApi).

pub mod buckets;
pub mod form;
pub mod notice;
pub mod store;
pub mod view;

pub use buckets::{Buckets, recompute_buckets};
pub use form::{
    FormAction, FormError, FormFields, FormMode, FormOutcome, SubmitRequest, TaskFormController,
};
pub use notice::{Notice, NoticeKind};
pub use store::TaskListStore;
pub use view::{TaskFilter, View};

use taskboard_proto::task::Priority;
use thiserror::Error;

/// Errors from local board edits.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The index does not name a card in the bucket.
    #[error("no card {index} in the {bucket} bucket ({len} cards)")]
    IndexOutOfRange {
        /// Bucket the index was applied to.
        bucket: Priority,
        /// The offending index.
        index: usize,
        /// Number of cards in the bucket.
        len: usize,
    },
    /// A cross-bucket move named the same bucket twice.
    #[error("source and destination are both the {0} bucket")]
    SameBucket(Priority),
}
