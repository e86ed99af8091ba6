//! The set of supported providers.

use hookwire_core::{EventKind, Provider, ProviderSpec};
use strum::{AsRefStr, Display, EnumString, IntoStaticStr, VariantArray};

use crate::bitbucket::Bitbucket;
use crate::docker_hub::DockerHub;
use crate::github::GitHub;
use crate::gitlab::GitLab;
use crate::gogs::Gogs;
use crate::google_calendar::GoogleCalendar;
use crate::leanix::Leanix;
use crate::pepo::Pepo;

/// A supported webhook provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, EnumString, IntoStaticStr, VariantArray)]
#[strum(serialize_all = "kebab-case")]
pub enum ProviderKind {
    #[strum(serialize = "github")]
    GitHub,
    Gogs,
    Bitbucket,
    #[strum(serialize = "gitlab")]
    GitLab,
    DockerHub,
    GoogleCalendar,
    Pepo,
    Leanix,
}

impl ProviderKind {
    /// Returns the intake descriptor of the provider.
    pub const fn spec(self) -> &'static ProviderSpec {
        match self {
            Self::GitHub => &GitHub::SPEC,
            Self::Gogs => &Gogs::SPEC,
            Self::Bitbucket => &Bitbucket::SPEC,
            Self::GitLab => &GitLab::SPEC,
            Self::DockerHub => &DockerHub::SPEC,
            Self::GoogleCalendar => &GoogleCalendar::SPEC,
            Self::Pepo => &Pepo::SPEC,
            Self::Leanix => &Leanix::SPEC,
        }
    }

    /// Returns every event tag the provider supports, in declaration order.
    pub fn event_tags(self) -> Vec<&'static str> {
        match self {
            Self::GitHub => tags::<GitHub>(),
            Self::Gogs => tags::<Gogs>(),
            Self::Bitbucket => tags::<Bitbucket>(),
            Self::GitLab => tags::<GitLab>(),
            Self::DockerHub => tags::<DockerHub>(),
            Self::GoogleCalendar => tags::<GoogleCalendar>(),
            Self::Pepo => tags::<Pepo>(),
            Self::Leanix => tags::<Leanix>(),
        }
    }

    /// Returns `true` if the tag names one of the provider's events.
    pub fn supports(self, tag: &str) -> bool {
        self.event_tags().contains(&tag)
    }
}

fn tags<P: Provider>() -> Vec<&'static str> {
    P::Event::variants().iter().map(|event| event.tag()).collect()
}
