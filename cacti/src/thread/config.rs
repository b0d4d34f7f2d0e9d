use crate::thread::error::SystemError;
use crate::thread::ring::MIN_BUFFER_CAPACITY;

/// Default bound on the number of actors one system may create.
pub const DEFAULT_MAX_ACTORS: usize = 1_048_576;

/// Default bound on the number of pending messages per actor.
pub const DEFAULT_MAILBOX_LIMIT: usize = 1024;

pub const DEFAULT_THREAD_NAME_PREFIX: &str = "cacti-worker-";

// --- System Configuration ---

/// Configuration for the `ActorSystem`.
#[derive(Clone, Debug)]
pub struct ThreadActorSystemConfig {
    /// The number of worker threads. Fixed for the lifetime of the system.
    pub pool_size: usize,

    /// The maximum number of messages an actor's mailbox may hold.
    pub mailbox_limit: usize,

    /// The maximum number of actors the system may create.
    pub max_actors: usize,

    /// Whether Ctrl-C should trigger a cooperative shutdown of the system.
    pub handle_interrupts: bool,

    /// Prefix of worker thread names; the worker index is appended.
    pub thread_name_prefix: String,
}

impl Default for ThreadActorSystemConfig {
    fn default() -> Self {
        Self {
            pool_size: num_cpus::get(),
            mailbox_limit: DEFAULT_MAILBOX_LIMIT,
            max_actors: DEFAULT_MAX_ACTORS,
            handle_interrupts: true,
            thread_name_prefix: DEFAULT_THREAD_NAME_PREFIX.to_string(),
        }
    }
}

impl ThreadActorSystemConfig {
    pub fn with_pool_size(mut self, pool_size: usize) -> Self {
        self.pool_size = pool_size;
        self
    }

    pub fn with_mailbox_limit(mut self, mailbox_limit: usize) -> Self {
        self.mailbox_limit = mailbox_limit;
        self
    }

    pub fn with_max_actors(mut self, max_actors: usize) -> Self {
        self.max_actors = max_actors;
        self
    }

    pub fn with_interrupt_handling(mut self, enabled: bool) -> Self {
        self.handle_interrupts = enabled;
        self
    }

    /// Check the configuration before any thread or actor is created.
    pub fn validate(&self) -> Result<(), SystemError> {
        if self.pool_size == 0 {
            return Err(SystemError::ConfigError(
                "pool_size must be at least 1".to_string(),
            ));
        }
        if self.mailbox_limit < MIN_BUFFER_CAPACITY {
            return Err(SystemError::ConfigError(format!(
                "mailbox_limit must be at least {}",
                MIN_BUFFER_CAPACITY
            )));
        }
        if self.max_actors == 0 {
            return Err(SystemError::ConfigError(
                "max_actors must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ThreadActorSystemConfig::default();
        assert!(config.pool_size >= 1);
        assert_eq!(config.mailbox_limit, DEFAULT_MAILBOX_LIMIT);
        assert_eq!(config.max_actors, DEFAULT_MAX_ACTORS);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_pool() {
        let config = ThreadActorSystemConfig::default().with_pool_size(0);
        assert!(matches!(config.validate(), Err(SystemError::ConfigError(_))));
    }

    #[test]
    fn test_validate_rejects_tiny_mailbox() {
        let config = ThreadActorSystemConfig::default().with_mailbox_limit(1);
        assert!(matches!(config.validate(), Err(SystemError::ConfigError(_))));
    }

    #[test]
    fn test_validate_rejects_zero_actors() {
        let config = ThreadActorSystemConfig::default().with_max_actors(0);
        assert!(matches!(config.validate(), Err(SystemError::ConfigError(_))));
    }
}
