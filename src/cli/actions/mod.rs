pub mod server;

use anyhow::Result;

#[derive(Debug)]
pub enum Action {
    Server(server::Args),
}

impl Action {
    /// Execute the parsed action.
    ///
    /// # Errors
    /// Returns an error if the server fails to start or stops unexpectedly.
    pub async fn execute(self) -> Result<()> {
        match self {
            Action::Server(args) => server::execute(args).await,
        }
    }
}
