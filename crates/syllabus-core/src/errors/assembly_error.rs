/// Complete Input assembly errors. Never retried.
#[derive(Debug, thiserror::Error)]
pub enum AssemblyError {
    #[error("incomplete input: missing {}", .missing.join(", "))]
    IncompleteInput { missing: Vec<String> },
}
