use crate::domain::ChannelRecord;
use crate::errors::TrackerResult;
use crate::resolver::ChannelResolver;
use crate::storage::ChannelRepository;

pub struct RegistrationService<R: ChannelRepository> {
    repository: R,
    resolver: ChannelResolver,
}

impl<R: ChannelRepository> RegistrationService<R> {
    pub fn new(repository: R, resolver: ChannelResolver) -> Self {
        Self {
            repository,
            resolver,
        }
    }

    /// Register a channel from a user-supplied reference.
    ///
    /// Resolves the channel ID, fetches the display name from the feed, then
    /// stores the record. Returns the alias the channel was stored under.
    pub fn register(
        &self,
        reference: &str,
        alias: Option<&str>,
        overwrite: bool,
    ) -> TrackerResult<String> {
        let channel_id = self.resolver.resolve(reference)?;
        let channel_name = self.resolver.display_name(&channel_id)?;

        let record = ChannelRecord::new(channel_id, channel_name);
        self.register_record(record, alias, overwrite)
    }

    /// Store an already-resolved record. When the user supplied no alias, the
    /// case-folded display name is the default.
    pub fn register_record(
        &self,
        record: ChannelRecord,
        alias: Option<&str>,
        overwrite: bool,
    ) -> TrackerResult<String> {
        let alias = match alias {
            Some(alias) => alias.to_lowercase(),
            None => record.channel_name.to_lowercase(),
        };

        self.repository.register(&alias, record, overwrite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::traits::MockChannelRepository;

    fn record(name: &str) -> ChannelRecord {
        ChannelRecord::new("UCX8pU3aeRkIH1y3V1kHqlFw".to_string(), name.to_string())
    }

    #[test]
    fn test_explicit_alias_is_case_folded() {
        let mut repo = MockChannelRepository::new();
        repo.expect_register()
            .withf(|alias, _, overwrite| alias == "mb" && !*overwrite)
            .returning(|alias, _, _| Ok(alias.to_string()));

        let service = RegistrationService::new(repo, ChannelResolver::new());
        let alias = service
            .register_record(record("Some Channel"), Some("MB"), false)
            .unwrap();

        assert_eq!(alias, "mb");
    }

    #[test]
    fn test_default_alias_is_folded_display_name() {
        let mut repo = MockChannelRepository::new();
        repo.expect_register()
            .withf(|alias, _, _| alias == "some channel")
            .returning(|alias, _, _| Ok(alias.to_string()));

        let service = RegistrationService::new(repo, ChannelResolver::new());
        let alias = service
            .register_record(record("Some Channel"), None, false)
            .unwrap();

        assert_eq!(alias, "some channel");
    }

    #[test]
    fn test_overwrite_flag_reaches_store() {
        let mut repo = MockChannelRepository::new();
        repo.expect_register()
            .withf(|_, _, overwrite| *overwrite)
            .returning(|alias, _, _| Ok(alias.to_string()));

        let service = RegistrationService::new(repo, ChannelResolver::new());
        service
            .register_record(record("Some Channel"), Some("mb"), true)
            .unwrap();
    }
}
