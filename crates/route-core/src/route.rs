//! Stream routes
//!
//! A stream route binds a configuration to a named hardware path (card and
//! device) in one direction. The route is declared to the route manager when
//! it is created, and its settings are pushed every time the configuration is
//! synchronized to the hardware.

use crate::config::StreamRouteConfig;
use crate::error::{Result, RouteError};
use halaudio_sample_core::{SampleSpec, SampleSpecError, SampleSpecItem, StreamDirection};
use std::collections::HashMap;
use std::io::{self, Write};
use tracing::{debug, info, warn};

/// Separator between `Key:value` pairs of a route mapping
pub const MAPPING_PAIR_DELIMITER: char = ',';
/// Separator between a mapping key and its value
pub const MAPPING_VALUE_DELIMITER: char = ':';
/// Direction value selecting a playback route
pub const OUTPUT_DIRECTION: &str = "out";

/// Identity of a stream route in the route manager
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamRouteDescriptor {
    /// Route name
    pub name: String,
    /// Route identifier
    pub id: u32,
    /// Sound card used by the route
    pub card_name: String,
    /// Device on the card
    pub device: i32,
    /// Playback or capture
    pub direction: StreamDirection,
}

impl StreamRouteDescriptor {
    /// Parse a mapping such as `Name:media,Id:1,Card:audiocard,Device:0,Direction:out`
    ///
    /// Keys may come in any order. `Direction` values other than `out` select
    /// a capture route.
    pub fn parse_mapping(mapping: &str) -> Result<Self> {
        let mut values = HashMap::new();
        for pair in mapping.split(MAPPING_PAIR_DELIMITER) {
            let pair = pair.trim();
            if pair.is_empty() {
                continue;
            }
            let (key, value) = pair
                .split_once(MAPPING_VALUE_DELIMITER)
                .ok_or_else(|| RouteError::invalid_mapping(format!("missing value in {pair:?}")))?;
            values.insert(key.trim(), value.trim());
        }

        let field = |key: &str| {
            values
                .get(key)
                .copied()
                .ok_or_else(|| RouteError::invalid_mapping(format!("missing {key}")))
        };

        let id = field("Id")?;
        let device = field("Device")?;
        Ok(Self {
            name: field("Name")?.to_string(),
            id: id
                .parse()
                .map_err(|_| RouteError::invalid_mapping(format!("invalid Id {id:?}")))?,
            card_name: field("Card")?.to_string(),
            device: device
                .parse()
                .map_err(|_| RouteError::invalid_mapping(format!("invalid Device {device:?}")))?,
            direction: if field("Direction")? == OUTPUT_DIRECTION {
                StreamDirection::Output
            } else {
                StreamDirection::Input
            },
        })
    }
}

/// Settings pushed to the route manager for one route
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamRouteSettings {
    /// Stream geometry
    pub sample_spec: SampleSpec,
    /// Route must be enabled before the stream starts
    pub require_pre_enable: bool,
    /// Route must be disabled after the stream stops
    pub require_post_disable: bool,
    /// Silence played when the device is opened, in milliseconds
    pub silence_prolog_ms: u32,
    /// Period size in frames
    pub period_size: u32,
    /// Number of periods in the ring buffer
    pub period_count: u32,
    /// Start threshold in frames
    pub start_threshold: u32,
    /// Stop threshold in frames
    pub stop_threshold: u32,
    /// Silence threshold in frames
    pub silence_threshold: u32,
    /// Minimum available frames before waking up the stream
    pub avail_min: u32,
    /// Input sources or output flags the route applies to
    pub applicability_mask: u32,
    /// Effects supported by the route
    pub effects: Vec<String>,
}

impl StreamRouteSettings {
    /// Build settings from a route configuration
    pub fn from_config(config: &StreamRouteConfig) -> Result<Self> {
        Ok(Self {
            sample_spec: config.sample_spec()?,
            require_pre_enable: config.require_pre_enable,
            require_post_disable: config.require_post_disable,
            silence_prolog_ms: config.silence_prolog_ms,
            period_size: config.period_size,
            period_count: config.period_count,
            start_threshold: config.start_threshold,
            stop_threshold: config.stop_threshold,
            silence_threshold: config.silence_threshold,
            avail_min: config.avail_min,
            applicability_mask: config.applicability_mask,
            effects: config.effects(),
        })
    }

    /// Size of one period in bytes
    pub fn period_bytes(&self) -> Result<usize> {
        Ok(self.sample_spec.frames_to_bytes(self.period_size as usize)?)
    }

    /// Duration of one period in microseconds
    pub fn period_usec(&self) -> Result<u64> {
        Ok(self.sample_spec.frames_to_usec(u64::from(self.period_size))?)
    }

    /// Size of the whole ring buffer in bytes
    pub fn buffer_bytes(&self) -> Result<usize> {
        let frames = (self.period_size as usize)
            .checked_mul(self.period_count as usize)
            .ok_or_else(|| {
                SampleSpecError::conversion_overflow(
                    "buffer_bytes",
                    u64::from(self.period_size) * u64::from(self.period_count),
                )
            })?;
        Ok(self.sample_spec.frames_to_bytes(frames)?)
    }

    /// Whether the route supports `effect`
    pub fn supports_effect(&self, effect: &str) -> bool {
        self.effects.iter().any(|supported| supported == effect)
    }
}

/// Route manager side of the stream routes
pub trait RouteInterface {
    /// Declare a new stream route; returns `false` if it is refused
    fn add_stream_route(&mut self, descriptor: &StreamRouteDescriptor) -> bool;

    /// Replace the settings of a declared route; returns `false` if refused
    fn update_stream_route_config(&mut self, route: &str, settings: StreamRouteSettings) -> bool;
}

/// One stream route and its configuration
#[derive(Debug, Clone)]
pub struct StreamRoute {
    descriptor: StreamRouteDescriptor,
    default_config: StreamRouteConfig,
    config: StreamRouteConfig,
}

impl StreamRoute {
    /// Parse `mapping`, declare the route to `route_interface` and start
    /// from `default_config`
    pub fn new(
        mapping: &str,
        default_config: StreamRouteConfig,
        route_interface: &mut dyn RouteInterface,
    ) -> Result<Self> {
        let descriptor = StreamRouteDescriptor::parse_mapping(mapping)?;
        if !route_interface.add_stream_route(&descriptor) {
            return Err(RouteError::rejected(&descriptor.name, "route declaration refused"));
        }
        info!(
            "Declared {:?} stream route {} (id {}) on {}:{}",
            descriptor.direction,
            descriptor.name,
            descriptor.id,
            descriptor.card_name,
            descriptor.device
        );
        Ok(Self {
            descriptor,
            config: default_config.clone(),
            default_config,
        })
    }

    /// Route identity
    pub fn descriptor(&self) -> &StreamRouteDescriptor {
        &self.descriptor
    }

    /// Current configuration
    pub fn config(&self) -> &StreamRouteConfig {
        &self.config
    }

    /// Replace the current configuration without pushing it
    pub fn set_config(&mut self, config: StreamRouteConfig) {
        self.config = config;
    }

    /// Restore the configuration the route was created with
    pub fn receive_from_hw(&mut self) -> &StreamRouteConfig {
        self.config = self.default_config.clone();
        &self.config
    }

    /// Push the current configuration to the route manager
    pub fn send_to_hw(
        &self,
        route_interface: &mut dyn RouteInterface,
    ) -> Result<StreamRouteSettings> {
        let settings = StreamRouteSettings::from_config(&self.config)?;
        debug!("Route {}: sending {}", self.descriptor.name, settings.sample_spec);

        if !route_interface.update_stream_route_config(&self.descriptor.name, settings.clone()) {
            return Err(RouteError::rejected(&self.descriptor.name, "configuration refused"));
        }
        Ok(settings)
    }

    /// Write the route identity and its stream geometry to `sink`
    pub fn dump<W: Write + ?Sized>(&self, sink: &mut W, indent: usize) -> io::Result<()> {
        writeln!(
            sink,
            "{:indent$}Route {} (id {}, {}:{})",
            "",
            self.descriptor.name,
            self.descriptor.id,
            self.descriptor.card_name,
            self.descriptor.device,
            indent = indent
        )?;
        match self.config.sample_spec() {
            Ok(spec) => spec.dump(sink, self.descriptor.direction, indent + 2),
            Err(e) => writeln!(
                sink,
                "{:indent$}- invalid configuration: {}",
                "",
                e,
                indent = indent + 2
            ),
        }
    }
}

/// Route manager keeping the last settings of every declared route
#[derive(Debug, Default)]
pub struct RouteRegistry {
    routes: HashMap<String, (StreamRouteDescriptor, Option<StreamRouteSettings>)>,
}

impl RouteRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Descriptor of a declared route
    pub fn descriptor(&self, route: &str) -> Option<&StreamRouteDescriptor> {
        self.routes.get(route).map(|(descriptor, _)| descriptor)
    }

    /// Last settings pushed for a route
    pub fn settings(&self, route: &str) -> Option<&StreamRouteSettings> {
        self.routes.get(route).and_then(|(_, settings)| settings.as_ref())
    }

    /// Number of declared routes
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether no route is declared
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Withdraw a declared route together with its last settings
    ///
    /// The name becomes free for a new declaration. Returns the descriptor of
    /// the withdrawn route, or `None` if it was never declared.
    pub fn remove_stream_route(&mut self, route: &str) -> Option<StreamRouteDescriptor> {
        let (descriptor, _) = self.routes.remove(route)?;
        debug!("Stream route {} withdrawn", route);
        Some(descriptor)
    }

    /// Routes whose geometry matches `spec` on format, rate and channels
    /// (including channel policy)
    pub fn compatible_routes(&self, spec: &SampleSpec) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .routes
            .iter()
            .filter_map(|(name, (_, settings))| {
                let settings = settings.as_ref()?;
                SampleSpecItem::ALL
                    .iter()
                    .all(|item| SampleSpec::items_equal(*item, &settings.sample_spec, spec))
                    .then_some(name.as_str())
            })
            .collect();
        names.sort_unstable();
        names
    }
}

impl RouteInterface for RouteRegistry {
    fn add_stream_route(&mut self, descriptor: &StreamRouteDescriptor) -> bool {
        if self.routes.contains_key(&descriptor.name) {
            warn!("Stream route {} already declared", descriptor.name);
            return false;
        }
        self.routes
            .insert(descriptor.name.clone(), (descriptor.clone(), None));
        true
    }

    fn update_stream_route_config(&mut self, route: &str, settings: StreamRouteSettings) -> bool {
        match self.routes.get_mut(route) {
            Some((_, current)) => {
                *current = Some(settings);
                true
            }
            None => {
                warn!("Stream route {} is not declared", route);
                false
            }
        }
    }
}
