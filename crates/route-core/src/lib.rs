//! # Route-Core: Stream Route Configuration
//!
//! Stream routes tie a PCM configuration to a hardware path. This crate
//! parses the route mapping and configuration handed over by the platform
//! description, turns them into a [`SampleSpec`](halaudio_sample_core::SampleSpec)
//! plus period and threshold settings, and pushes the result to a
//! [`RouteInterface`].
//!
//! ## Usage
//!
//! ```rust
//! use halaudio_route_core::{RouteRegistry, StreamRoute, StreamRouteConfig};
//!
//! let mut registry = RouteRegistry::new();
//! let mut route = StreamRoute::new(
//!     "Name:media,Id:1,Card:audiocard,Device:0,Direction:out",
//!     StreamRouteConfig::default(),
//!     &mut registry,
//! )?;
//! route.set_config(StreamRouteConfig::from_json(
//!     r#"{ "channels_policy": "copy,average", "period_size": 480, "period_count": 4 }"#,
//! )?);
//!
//! let settings = route.send_to_hw(&mut registry)?;
//! assert_eq!(settings.period_bytes()?, 1920);
//! # Ok::<(), halaudio_route_core::RouteError>(())
//! ```

#![deny(missing_docs)]

pub mod config;
pub mod error;
pub mod logging;
pub mod route;

pub use config::{parse_channel_policy_list, parse_effects, StreamRouteConfig};
pub use error::{Result, RouteError};
pub use logging::{parse_log_level, setup_logging, LoggingConfig};
pub use route::{
    RouteInterface, RouteRegistry, StreamRoute, StreamRouteDescriptor, StreamRouteSettings,
};

/// Version information for the route library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
