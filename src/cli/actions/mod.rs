pub mod session;

// Keeps the match over actions out of this module.
mod run;

#[derive(Debug)]
pub enum Action {
    Session(session::Args),
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self) -> anyhow::Result<()> {
        run::execute(self).await
    }
}
