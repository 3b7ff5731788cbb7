/// Fixed progress milestones reported while a file is being updated.
///
/// The percentages are not derived from the remote call; they are emitted
/// around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Milestone {
    Connecting,
    Generating,
    Processing,
    Updating,
    Saving,
    Complete,
}

impl Milestone {
    pub fn percent(self) -> u64 {
        match self {
            Self::Connecting => 0,
            Self::Generating => 30,
            Self::Processing => 60,
            Self::Updating => 80,
            Self::Saving => 90,
            Self::Complete => 100,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::Connecting => "Connecting to Gemini API...",
            Self::Generating => "Generating content using Gemini...",
            Self::Processing => "Processing AI response...",
            Self::Updating => "Updating file...",
            Self::Saving => "Saving file...",
            Self::Complete => "Complete!",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_milestones_are_monotonic() {
        let order = [
            Milestone::Connecting,
            Milestone::Generating,
            Milestone::Processing,
            Milestone::Updating,
            Milestone::Saving,
            Milestone::Complete,
        ];

        for pair in order.windows(2) {
            assert!(pair[0].percent() < pair[1].percent());
        }
        assert_eq!(Milestone::Complete.percent(), 100);
    }
}
