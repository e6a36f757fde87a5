use medisupply_contract::ContractError;
use std::path::PathBuf;

/// Failures surfaced by the command line front end
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),

    #[error("Invalid JSON document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to render output: {0}")]
    Render(#[source] serde_json::Error),

    #[error(transparent)]
    Contract(#[from] ContractError),

    #[error("{0}")]
    Usage(String),
}

impl CliError {
    pub fn usage(message: impl Into<String>) -> Self {
        CliError::Usage(message.into())
    }

    /// 1 for documents or lookups that fail, 2 for usage and I/O problems
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Contract(_) | CliError::Json(_) => 1,
            CliError::Read { .. }
            | CliError::Output(_)
            | CliError::Render(_)
            | CliError::Usage(_) => 2,
        }
    }

    pub fn report(&self) -> String {
        match self {
            CliError::Contract(err) => {
                let mut lines = vec![format!("error: {}", err.user_message())];
                if err.issues().len() > 1 {
                    lines.extend(err.issues().iter().map(|issue| {
                        format!("  - {}: {}", display_path(&issue.path), issue.message)
                    }));
                }
                lines.join("\n")
            }
            other => format!("error: {}", other),
        }
    }
}

fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "<root>"
    } else {
        path
    }
}
