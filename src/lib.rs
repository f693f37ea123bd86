//! Tag EC2 instances, EBS volumes, and EFS file systems that no AWS Backup plan selects.
//!
//! A run lists the tag conditions of every backup selection in a region, then gives every
//! instance, volume, and file system that carries none of those tags a configured default tag, so
//! that a catch-all backup plan selecting that tag picks it up.
//!
//! See [`run()`] for the entry point, and [`reconcile_region`] for the same process over arbitrary
//! [`api`] implementations.
#![warn(clippy::pedantic)]

mod config;
mod error;
mod invocation;
mod resource;
mod run;
mod tag;

pub mod api;
pub mod apply;
pub mod enumerate;
pub mod inventory;
pub mod pagination;
pub mod session;

pub use config::{Config, ConfigError};
pub use error::{Error, TagError};
pub use invocation::{AccountId, InvalidAccountId, Invocation};
pub use resource::{uncovered_ids, ResourceKind, TaggableResource};
pub use run::{reconcile_region, run, KindReport, RegionReport, RunReport, TaggingOutcome};
pub use session::{Session, SessionPlan};
pub use tag::{MatchTargets, Tag};
