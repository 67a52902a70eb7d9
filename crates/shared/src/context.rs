use core::fmt::Display;

/// Holds the context for the current backup task. Used for prefixing logs.
#[derive(Default, Debug)]
pub struct Context {
    /// The user profile being worked on.
    pub user: Option<String>,
    /// The current step within the task.
    pub step: &'static str,
}

impl Display for Context {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if let Some(user) = &self.user {
            write!(f, "[{user}] ")?;
        }

        write!(f, "[{}] ", self.step)?;

        Ok(())
    }
}
