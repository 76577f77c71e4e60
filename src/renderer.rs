//! # Flow Renderer
//!
//! Draws simulated trips as glowing curved trails on a surface owned by the map host.
//!
//! The renderer knows nothing about a concrete graphics API. The host supplies:
//! - [`MapHost`]: projection, viewport size, device pixel ratio and surface allocation
//! - [`Surface`]: the handful of drawing primitives a trail needs
//!
//! [`DisplayList`] is a recording surface for headless use and tests.
//!
//! ## Lifecycle
//! 1. [`FlowRenderer::attach`] creates the surface and sizes it
//! 2. [`FlowRenderer::on_resize`] on every host resize
//! 3. [`FlowRenderer::render_frame`] per animation frame and per camera move
//! 4. [`FlowRenderer::detach`] releases the surface back to the host
//!
//! Drawing before the surface exists and has been sized is a no-op.

use log::{debug, warn};
use rand::Rng;

use crate::path::{trail_points, TrailConfig};
use crate::simulator::{BikeType, Trip, TripSimulator};
use crate::style::Rgba;
use crate::GeoPoint;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A position in CSS pixels (from the host) or device pixels (on the surface).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn scaled(self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }
}

/// Drawing primitives in device pixels.
pub trait Surface {
    /// Set the backing size. Clears the content.
    fn resize(&mut self, width: u32, height: u32);

    fn clear(&mut self);

    fn stroke_polyline(&mut self, points: &[ScreenPoint], color: Rgba, width: f64);

    /// Stroke with a linear gradient running from the first to the last point.
    fn stroke_gradient(&mut self, points: &[ScreenPoint], from: Rgba, to: Rgba, width: f64);

    fn fill_circle(&mut self, center: ScreenPoint, radius: f64, color: Rgba);
}

/// The map the flow layer is drawn over.
pub trait MapHost {
    type Surface: Surface;

    /// Project a coordinate to CSS pixels relative to the map container.
    fn project(&self, point: &GeoPoint) -> ScreenPoint;

    /// Container size in CSS pixels.
    fn viewport_size(&self) -> (f64, f64);

    fn device_pixel_ratio(&self) -> f64;

    /// Allocate an overlay surface. `None` when the host cannot provide one yet.
    fn create_surface(&mut self) -> Option<Self::Surface>;

    fn release_surface(&mut self, surface: Self::Surface);
}

/// Trail colours for one bike type.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrailPalette {
    pub head: Rgba,
    pub glow: Rgba,
}

impl TrailPalette {
    pub const ELECTRIC: TrailPalette = TrailPalette {
        head: Rgba::new(56, 189, 248, 1.0),
        glow: Rgba::new(56, 189, 248, 0.3),
    };

    pub const MECHANICAL: TrailPalette = TrailPalette {
        head: Rgba::new(226, 232, 240, 1.0),
        glow: Rgba::new(226, 232, 240, 0.2),
    };

    pub fn for_bike_type(bike_type: BikeType) -> Self {
        match bike_type {
            BikeType::Electric => Self::ELECTRIC,
            BikeType::Mechanical => Self::MECHANICAL,
        }
    }
}

// =============================================================================
// Recording surface
// =============================================================================

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    Polyline {
        points: Vec<ScreenPoint>,
        color: Rgba,
        width: f64,
    },
    Gradient {
        points: Vec<ScreenPoint>,
        from: Rgba,
        to: Rgba,
        width: f64,
    },
    Circle {
        center: ScreenPoint,
        radius: f64,
        color: Rgba,
    },
}

/// A [`Surface`] that records the current frame as a list of commands.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayList {
    width: u32,
    height: u32,
    commands: Vec<DrawCommand>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Commands since the last clear or resize.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }
}

impl Surface for DisplayList {
    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.commands.clear();
    }

    fn clear(&mut self) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear);
    }

    fn stroke_polyline(&mut self, points: &[ScreenPoint], color: Rgba, width: f64) {
        self.commands.push(DrawCommand::Polyline {
            points: points.to_vec(),
            color,
            width,
        });
    }

    fn stroke_gradient(&mut self, points: &[ScreenPoint], from: Rgba, to: Rgba, width: f64) {
        self.commands.push(DrawCommand::Gradient {
            points: points.to_vec(),
            from,
            to,
            width,
        });
    }

    fn fill_circle(&mut self, center: ScreenPoint, radius: f64, color: Rgba) {
        self.commands.push(DrawCommand::Circle { center, radius, color });
    }
}

// =============================================================================
// Renderer
// =============================================================================

/// Draws trip trails onto a host-owned surface.
#[derive(Debug)]
pub struct FlowRenderer<S: Surface> {
    config: TrailConfig,
    surface: Option<S>,
    /// Device-pixel size the surface was last given
    size: Option<(u32, u32)>,
    pixel_ratio: f64,
}

impl<S: Surface> FlowRenderer<S> {
    pub fn new(config: TrailConfig) -> Self {
        if let Err(e) = config.validate() {
            warn!("[StationFlow] Flow renderer running with {}", e);
        }
        Self {
            config,
            surface: None,
            size: None,
            pixel_ratio: 1.0,
        }
    }

    pub fn config(&self) -> &TrailConfig {
        &self.config
    }

    pub fn is_attached(&self) -> bool {
        self.surface.is_some()
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    /// Surface size in device pixels, once sized.
    pub fn size(&self) -> Option<(u32, u32)> {
        self.size
    }

    /// Create the surface on first attach and size it to the host.
    pub fn attach<H: MapHost<Surface = S>>(&mut self, host: &mut H) {
        if self.surface.is_none() {
            match host.create_surface() {
                Some(surface) => self.surface = Some(surface),
                None => {
                    warn!("[StationFlow] Map host could not provide a drawing surface");
                    return;
                }
            }
        }
        self.on_resize(host);
    }

    /// Release the surface to the host.
    pub fn detach<H: MapHost<Surface = S>>(&mut self, host: &mut H) {
        if let Some(surface) = self.surface.take() {
            host.release_surface(surface);
        }
        self.size = None;
    }

    /// Track the host viewport size and device pixel ratio.
    pub fn on_resize<H: MapHost<Surface = S>>(&mut self, host: &H) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        let (css_width, css_height) = host.viewport_size();
        let ratio = host.device_pixel_ratio();
        self.pixel_ratio = if ratio.is_finite() && ratio > 0.0 { ratio } else { 1.0 };

        let width = (css_width.max(0.0) * self.pixel_ratio).round() as u32;
        let height = (css_height.max(0.0) * self.pixel_ratio).round() as u32;
        surface.resize(width, height);
        self.size = Some((width, height));
        debug!(
            "[StationFlow] Flow surface sized to {}x{} (ratio {})",
            width, height, self.pixel_ratio
        );
    }

    /// Draw one frame. Returns `false` when there is nothing to draw on.
    pub fn render_frame<H: MapHost<Surface = S>>(&mut self, trips: &[Trip], host: &H) -> bool {
        let Some(surface) = self.surface.as_mut() else {
            return false;
        };
        if self.size.is_none() {
            return false;
        }

        surface.clear();
        let ratio = self.pixel_ratio;
        for trip in trips {
            let trail = trail_points(
                &trip.origin.position,
                &trip.destination.position,
                trip.progress,
                &self.config,
            );
            if trail.len() < 2 {
                continue;
            }

            let screen: Vec<ScreenPoint> = trail
                .iter()
                .map(|p| host.project(p).scaled(ratio))
                .collect();
            let palette = TrailPalette::for_bike_type(trip.bike_type);
            let head = screen[0];

            surface.stroke_polyline(&screen, palette.glow, self.config.glow_width * ratio);
            surface.stroke_gradient(
                &screen,
                palette.head,
                palette.head.with_alpha(0.0),
                self.config.trail_width * ratio,
            );
            surface.fill_circle(head, self.config.head_glow_radius * ratio, palette.glow);
            surface.fill_circle(head, self.config.head_radius * ratio, palette.head);
        }
        true
    }
}

// =============================================================================
// Frame driver
// =============================================================================

/// A trip simulator and its renderer, driven by host callbacks.
///
/// Wire `on_frame` to the host's animation callback and `on_camera_move` to
/// its move/zoom events so trails stay pinned to the map while panning.
#[derive(Debug)]
pub struct FlowLayer<S: Surface, R: Rng = rand_chacha::ChaCha8Rng> {
    simulator: TripSimulator<R>,
    renderer: FlowRenderer<S>,
}

impl<S: Surface, R: Rng> FlowLayer<S, R> {
    pub fn new(simulator: TripSimulator<R>, renderer: FlowRenderer<S>) -> Self {
        Self { simulator, renderer }
    }

    pub fn simulator(&self) -> &TripSimulator<R> {
        &self.simulator
    }

    pub fn simulator_mut(&mut self) -> &mut TripSimulator<R> {
        &mut self.simulator
    }

    pub fn renderer(&self) -> &FlowRenderer<S> {
        &self.renderer
    }

    pub fn attach<H: MapHost<Surface = S>>(&mut self, host: &mut H) {
        self.renderer.attach(host);
    }

    pub fn detach<H: MapHost<Surface = S>>(&mut self, host: &mut H) {
        self.renderer.detach(host);
    }

    pub fn on_resize<H: MapHost<Surface = S>>(&mut self, host: &H) {
        self.renderer.on_resize(host);
    }

    /// Advance the simulation to `now` and draw. Returns the live trip count.
    pub fn on_frame<H: MapHost<Surface = S>>(&mut self, now: u64, host: &H) -> usize {
        let trips = self.simulator.tick(now);
        self.renderer.render_frame(trips, host);
        trips.len()
    }

    /// Redraw the current trips for a new camera position.
    pub fn on_camera_move<H: MapHost<Surface = S>>(&mut self, host: &H) {
        self.renderer.render_frame(self.simulator.trips(), host);
    }
}
