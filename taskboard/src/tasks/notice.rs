//! User-facing notifications raised by task operations.

/// Severity of a [`Notice`], used for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// An operation completed.
    Success,
    /// Informational.
    Message,
    /// Something went wrong.
    Error,
}

/// One notification shown after an operation completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// A new task was created.
    Added,
    /// An existing task was saved.
    Edited,
    /// A task was deleted.
    Deleted,
    /// A dragged task's new priority was accepted.
    PriorityUpdated,
    /// A remote call failed.
    Failed,
    /// The form was submitted with required fields empty.
    MissingFields,
    /// The due date typed into a form or filter could not be read.
    InvalidDate,
}

impl Notice {
    /// Text shown to the user.
    #[must_use]
    pub const fn text(self) -> &'static str {
        match self {
            Self::Added => "Successfully added",
            Self::Edited => "Successfully edited",
            Self::Deleted => "Successfully deleted",
            Self::PriorityUpdated => "Updated Priority",
            Self::Failed => "Something went wrong, please try again",
            Self::MissingFields => "Fill mandatory fields",
            Self::InvalidDate => "Due date must look like YYYY-MM-DDTHH:MM",
        }
    }

    /// Severity of this notice.
    #[must_use]
    pub const fn kind(self) -> NoticeKind {
        match self {
            Self::Added | Self::Edited | Self::Deleted => NoticeKind::Success,
            Self::PriorityUpdated => NoticeKind::Message,
            Self::Failed | Self::MissingFields | Self::InvalidDate => NoticeKind::Error,
        }
    }

    /// Short label shown next to the text.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self.kind() {
            NoticeKind::Success => "Success",
            NoticeKind::Message => "Message",
            NoticeKind::Error => "Error",
        }
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.label(), self.text())
    }
}
