#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod macros;
mod registry;

#[cfg(test)]
mod testing;

pub mod bitbucket;
pub mod docker_hub;
pub mod github;
pub mod gitlab;
pub mod gogs;
pub mod google_calendar;
pub mod leanix;
pub mod pepo;

pub use bitbucket::{Bitbucket, BitbucketHook, BitbucketOptions};
pub use docker_hub::{DockerHub, DockerHubHook};
pub use github::{GitHub, GitHubHook};
pub use gitlab::{GitLab, GitLabHook};
pub use gogs::{Gogs, GogsHook};
pub use google_calendar::{GoogleCalendar, GoogleCalendarHook};
pub use hookwire_core as core;
pub use leanix::{Leanix, LeanixHook};
pub use pepo::{Pepo, PepoHook};
pub use registry::ProviderKind;
