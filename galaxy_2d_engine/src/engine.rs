/// Galaxy2D Engine - Singleton manager for the render context and logger
///
/// This module provides global registration of the window (the render
/// context) and of the logger. It uses thread-safe static storage with
/// RwLock for safe concurrent access.

use std::sync::{OnceLock, RwLock, Arc, Mutex, Weak};
use std::time::SystemTime;
use crate::renderer::{Backend, WindowDesc};
use crate::window::Window;
use crate::error::{Result, Error};
use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};

// ===== INTERNAL STATE =====

/// Global engine state storage
static ENGINE_STATE: OnceLock<EngineState> = OnceLock::new();

/// Global logger (initialized with DefaultLogger)
static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

/// Internal state structure holding all engine singletons
struct EngineState {
    /// Window singleton (wrapped in Mutex for thread-safe mutable access)
    window: RwLock<WindowSlot>,
}

/// Registered window plus a weak link to the last window created
///
/// The weak link outlives unregistration: a window still held by a caller
/// after `destroy_window` keeps its native resources, so no other window may
/// be created until it is dropped.
#[derive(Default)]
struct WindowSlot {
    registered: Option<Arc<Mutex<Window>>>,
    live: Weak<Mutex<Window>>,
}

impl WindowSlot {
    fn is_alive(&self) -> bool {
        self.registered.is_some() || self.live.strong_count() > 0
    }
}

impl EngineState {
    /// Create a new empty engine state
    fn new() -> Self {
        Self {
            window: RwLock::new(WindowSlot::default()),
        }
    }
}

// ===== PUBLIC API =====

/// Main engine singleton manager
///
/// Owns the registered window and the logger.
///
/// # Example
///
/// ```no_run
/// use galaxy_2d_engine::galaxy2d::{Engine, render::WindowDesc};
/// use galaxy_2d_engine_renderer_software::{SoftwareBackend, SoftwareConfig};
///
/// Engine::initialize()?;
///
/// let mut backend = SoftwareBackend::new(SoftwareConfig::default());
/// let window = Engine::create_window(&mut backend, &WindowDesc::default())?;
///
/// // Access the window globally
/// let same = Engine::window()?;
///
/// // Cleanup
/// Engine::shutdown();
/// # Ok::<(), galaxy_2d_engine::galaxy2d::Error>(())
/// ```
pub struct Engine;

impl Engine {
    /// Helper to log errors before returning them (internal use)
    fn log_and_return_error(error: Error) -> Error {
        match &error {
            Error::InitializationFailed(msg) => {
                crate::engine_error!("galaxy2d::Engine", "Initialization failed: {}", msg);
            }
            Error::BackendError(msg) => {
                crate::engine_error!("galaxy2d::Engine", "Backend error: {}", msg);
            }
            _ => {
                crate::engine_error!("galaxy2d::Engine", "Engine error: {}", error);
            }
        }
        error
    }

    fn state() -> Result<&'static EngineState> {
        ENGINE_STATE.get()
            .ok_or_else(|| Self::log_and_return_error(
                Error::InitializationFailed("Engine not initialized. Call Engine::initialize() first.".to_string())
            ))
    }

    fn poisoned() -> Error {
        Self::log_and_return_error(Error::BackendError("Window slot lock poisoned".to_string()))
    }

    /// Initialize the engine
    ///
    /// This must be called once at application startup before creating a window.
    ///
    /// # Errors
    ///
    /// Currently always succeeds, but returns Result for future extensibility.
    pub fn initialize() -> Result<()> {
        ENGINE_STATE.get_or_init(EngineState::new);
        Ok(())
    }

    /// Shutdown the engine and unregister the window
    ///
    /// The window is destroyed as soon as no caller holds it any more.
    pub fn shutdown() {
        let released = ENGINE_STATE.get()
            .and_then(|state| state.window.write().ok())
            .and_then(|mut slot| slot.registered.take());
        if released.is_some() {
            crate::engine_info!("galaxy2d::Engine", "Engine shut down, window unregistered");
        }
    }

    // ===== WINDOW API =====

    /// Create and register the window singleton
    ///
    /// # Errors
    ///
    /// `InitializationFailed` if:
    /// - The engine is not initialized
    /// - A window already exists (it is left untouched)
    /// - A destroyed window is still referenced by a caller
    /// - The backend cannot create the window or its renderer
    /// - The renderer cannot be queried or reports no texture format
    ///
    /// # Example
    ///
    /// ```no_run
    /// use galaxy_2d_engine::galaxy2d::{Engine, render::WindowDesc};
    /// use galaxy_2d_engine_renderer_software::{SoftwareBackend, SoftwareConfig};
    ///
    /// Engine::initialize()?;
    /// let mut backend = SoftwareBackend::new(SoftwareConfig::default());
    /// let window = Engine::create_window(&mut backend, &WindowDesc::default())?;
    /// window.lock().unwrap().fill_opaque(0, 0, 64)?;
    /// # Ok::<(), galaxy_2d_engine::galaxy2d::Error>(())
    /// ```
    pub fn create_window(backend: &mut dyn Backend, desc: &WindowDesc) -> Result<Arc<Mutex<Window>>> {
        let state = Self::state()?;

        let mut lock = state.window.write().map_err(|_| Self::poisoned())?;

        if lock.registered.is_some() {
            return Err(Self::log_and_return_error(
                Error::InitializationFailed("Window already exists. Call Engine::destroy_window() first.".to_string())
            ));
        }
        if lock.is_alive() {
            return Err(Self::log_and_return_error(
                Error::InitializationFailed("Destroyed window is still held. Drop every reference to it first.".to_string())
            ));
        }

        let window = Arc::new(Mutex::new(Window::new(backend, desc)?));
        lock.live = Arc::downgrade(&window);
        lock.registered = Some(window.clone());

        crate::engine_info!("galaxy2d::Engine", "Window singleton created successfully");

        Ok(window)
    }

    /// Get the window singleton
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The engine is not initialized
    /// - The window has not been created
    pub fn window() -> Result<Arc<Mutex<Window>>> {
        let state = Self::state()?;

        let lock = state.window.read().map_err(|_| Self::poisoned())?;

        lock.registered.clone()
            .ok_or_else(|| Self::log_and_return_error(
                Error::InitializationFailed("Window not created. Call Engine::create_window() first.".to_string())
            ))
    }

    /// Get the window singleton without logging when it is missing
    pub fn current_window() -> Option<Arc<Mutex<Window>>> {
        ENGINE_STATE.get()
            .and_then(|state| state.window.read().ok())
            .and_then(|lock| lock.registered.clone())
    }

    /// Check whether a window is registered
    pub fn has_window() -> bool {
        Self::current_window().is_some()
    }

    /// Destroy the window singleton
    ///
    /// Removes the window singleton. Existing window references remain valid
    /// until dropped, and a new window can only be created once the last one
    /// is gone.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine is not initialized
    pub fn destroy_window() -> Result<()> {
        let state = Self::state()?;

        let mut lock = state.window.write().map_err(|_| Self::poisoned())?;

        let released = lock.registered.take();
        drop(lock);

        if released.is_some_and(|window| Arc::strong_count(&window) > 1) {
            crate::engine_warn!("galaxy2d::Engine",
                "Window unregistered but still held elsewhere; it is released when the last reference drops");
        }
        crate::engine_info!("galaxy2d::Engine", "Window singleton destroyed");

        Ok(())
    }

    /// Reset all singletons for testing (only available in test builds)
    #[cfg(test)]
    pub fn reset_for_testing() {
        Self::initialize().ok();
        Self::shutdown();
    }

    // ===== LOGGING API =====

    /// Set a custom logger
    ///
    /// Replace the default logger with a custom implementation (file logger, test capture, etc.)
    ///
    /// # Example
    ///
    /// ```no_run
    /// use galaxy_2d_engine::galaxy2d::{Engine, log::{Logger, LogEntry}};
    ///
    /// struct FileLogger;
    /// impl Logger for FileLogger {
    ///     fn log(&self, entry: &LogEntry) {
    ///         // Write to file...
    ///     }
    /// }
    ///
    /// Engine::set_logger(FileLogger);
    /// ```
    pub fn set_logger<L: Logger + 'static>(logger: L) {
        Self::replace_logger(Box::new(logger));
    }

    /// Reset logger to default (DefaultLogger)
    pub fn reset_logger() {
        Self::replace_logger(Box::new(DefaultLogger));
    }

    /// Internal logging method (for simple logs without file:line)
    ///
    /// Used by macros like engine_info!, engine_warn!, etc.
    pub fn log(severity: LogSeverity, source: &str, message: String) {
        Self::dispatch(severity, source, message, None);
    }

    /// Internal logging method with file:line information (for ERROR logs)
    ///
    /// Used by engine_error! macro to include source location.
    pub fn log_detailed(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: &'static str,
        line: u32,
    ) {
        Self::dispatch(severity, source, message, Some((file, line)));
    }

    fn logger() -> &'static RwLock<Box<dyn Logger>> {
        LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)))
    }

    fn replace_logger(logger: Box<dyn Logger>) {
        if let Ok(mut current) = Self::logger().write() {
            *current = logger;
        }
    }

    fn dispatch(severity: LogSeverity, source: &str, message: String, location: Option<(&'static str, u32)>) {
        // A poisoned logger drops the entry
        let Ok(logger) = Self::logger().read() else {
            return;
        };
        logger.log(&LogEntry {
            severity,
            timestamp: SystemTime::now(),
            source: source.to_string(),
            message,
            file: location.map(|(file, _)| file),
            line: location.map(|(_, line)| line),
        });
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
