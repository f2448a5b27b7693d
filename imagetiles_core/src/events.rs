//! Progress events of a pyramid run.
//!
//! The driver never prints. It emits [`PyramidEvent`]s on an [`EventBus`], and whoever cares
//! (the CLI logger, a progress bar, a test) subscribes.

use crate::{ModeKind, TileCoord, ZoomRange};
use arc_swap::ArcSwap;
use std::sync::Arc;

/// Something that happened during a run.
#[derive(Debug, Clone, PartialEq)]
pub enum PyramidEvent {
	RunStarted { mode: ModeKind, tile_size: u32 },
	LevelStarted { level: u8, tiles: u64 },
	TileCompleted { coord: TileCoord },
	LevelCompleted { level: u8, tiles: u64 },
	RunCompleted { zoom_range: ZoomRange, tiles: u64 },
}

type EventListener = Arc<dyn Fn(&PyramidEvent) + Send + Sync>;

/// Thread-safe event bus.
///
/// Listeners are called synchronously, in registration order, on the emitting thread. Tile events
/// are emitted by the single writer, never from the composition workers.
#[derive(Clone)]
pub struct EventBus {
	listeners: Arc<ArcSwap<Vec<EventListener>>>,
}

impl EventBus {
	pub fn new() -> Self {
		Self {
			listeners: Arc::new(ArcSwap::from_pointee(Vec::new())),
		}
	}

	/// Register a listener for all events on this bus.
	pub fn subscribe<F>(&self, listener: F)
	where
		F: Fn(&PyramidEvent) + Send + Sync + 'static,
	{
		let listener: EventListener = Arc::new(listener);
		self.listeners.rcu(|old| {
			let mut new = (**old).clone();
			new.push(listener.clone());
			new
		});
	}

	/// Emit an event to all listeners.
	///
	/// A panicking listener is caught; the remaining listeners still run.
	pub fn emit(&self, event: PyramidEvent) {
		let listeners = self.listeners.load();
		for listener in listeners.iter() {
			let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
				listener(&event);
			}));
		}
	}
}

impl Default for EventBus {
	fn default() -> Self {
		Self::new()
	}
}

impl std::fmt::Debug for EventBus {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "EventBus({} listeners)", self.listeners.load().len())
	}
}

/// Forwards an event to the `log` facade.
pub fn log_event(event: &PyramidEvent) {
	match event {
		PyramidEvent::RunStarted { mode, tile_size } => {
			log::info!("building a {mode} pyramid with {tile_size} px tiles");
		}
		PyramidEvent::LevelStarted { level, tiles } => log::info!("level {level}: {tiles} tiles"),
		PyramidEvent::TileCompleted { coord } => log::trace!("wrote {coord:?}"),
		PyramidEvent::LevelCompleted { level, tiles } => log::debug!("level {level} done ({tiles} tiles)"),
		PyramidEvent::RunCompleted { zoom_range, tiles } => {
			log::info!("finished: {tiles} tiles on levels {zoom_range}");
		}
	}
}
