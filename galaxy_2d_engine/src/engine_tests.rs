//! Unit tests for Engine singleton manager
//!
//! Tests initialization, window registration, and logging APIs.
//!
//! IMPORTANT: ENGINE_STATE and LOGGER are global OnceLocks shared across all tests.
//! All tests are marked with #[serial] to run sequentially and avoid RwLock poisoning.
//! Unit tests of other modules may log concurrently, so captured entries are
//! filtered by source rather than counted exactly.

use crate::galaxy2d::{Engine, Error, Window};
use crate::galaxy2d::log::{Logger, LogEntry, LogSeverity};
use crate::galaxy2d::render::WindowDesc;
use crate::renderer::mock_renderer::{MockBackend, MockConfig};
use std::sync::{Arc, Mutex};
use serial_test::serial;

// ============================================================================
// TEST HELPERS
// ============================================================================

/// Test logger that captures log entries for verification
struct TestLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl TestLogger {
    fn new() -> (Self, Arc<Mutex<Vec<LogEntry>>>) {
        let entries = Arc::new(Mutex::new(Vec::new()));
        (Self { entries: entries.clone() }, entries)
    }
}

impl Logger for TestLogger {
    fn log(&self, entry: &LogEntry) {
        self.entries.lock().unwrap().push(entry.clone());
    }
}

fn entries_from(entries: &Arc<Mutex<Vec<LogEntry>>>, source: &str) -> Vec<LogEntry> {
    entries.lock().unwrap().iter().filter(|e| e.source == source).cloned().collect()
}

/// Setup function to reset engine state before each test
///
/// ENGINE_STATE is a OnceLock, so once initialized it stays initialized.
/// We always call initialize() (idempotent) and use reset_for_testing() to clear the window.
fn setup() {
    Engine::reset_for_testing();
    let _ = Engine::initialize();
}

fn desc(title: &str) -> WindowDesc {
    WindowDesc {
        title: title.to_string(),
        ..WindowDesc::default()
    }
}

// ============================================================================
// INITIALIZATION AND SHUTDOWN TESTS
// ============================================================================

#[test]
#[serial]
fn test_engine_initialize_is_idempotent() {
    setup();
    assert!(Engine::initialize().is_ok());
    assert!(Engine::initialize().is_ok());
}

#[test]
#[serial]
fn test_shutdown_clears_window() {
    setup();
    let mut backend = MockBackend::new();
    Engine::create_window(&mut backend, &desc("shutdown")).unwrap();
    assert!(Engine::has_window());

    Engine::shutdown();
    assert!(!Engine::has_window());
    assert_eq!(backend.log.lock().unwrap().windows_released, 1);
}

#[test]
#[serial]
fn test_shutdown_idempotent() {
    setup();
    Engine::shutdown();
    Engine::shutdown();
    assert!(!Engine::has_window());
}

// ============================================================================
// WINDOW API TESTS
// ============================================================================

#[test]
#[serial]
fn test_create_window_success() {
    setup();
    let mut backend = MockBackend::new();
    let window = Engine::create_window(&mut backend, &desc("main")).unwrap();

    assert_eq!(window.lock().unwrap().title(), "main");
    let registered = Engine::window().unwrap();
    assert!(Arc::ptr_eq(&window, &registered));
}

#[test]
#[serial]
fn test_second_window_fails_and_keeps_first() {
    setup();
    let mut backend = MockBackend::new();
    let first = Engine::create_window(&mut backend, &desc("first")).unwrap();

    let mut other_backend = MockBackend::new();
    let second = Engine::create_window(&mut other_backend, &desc("second"));
    assert!(matches!(second, Err(Error::InitializationFailed(_))));

    // No native window was even requested for the rejected one
    assert_eq!(other_backend.log.lock().unwrap().windows_released, 0);
    assert_eq!(other_backend.log.lock().unwrap().clears, 0);

    let registered = Engine::window().unwrap();
    assert!(Arc::ptr_eq(&first, &registered));
    assert_eq!(registered.lock().unwrap().title(), "first");
}

#[test]
#[serial]
fn test_failed_construction_registers_nothing() {
    let failures = [
        MockConfig { fail_window: true, ..MockConfig::default() },
        MockConfig { fail_renderer: true, ..MockConfig::default() },
        MockConfig { fail_info: true, ..MockConfig::default() },
        MockConfig { texture_formats: Vec::new(), ..MockConfig::default() },
    ];

    for config in failures {
        setup();
        let mut backend = MockBackend::with_config(config);
        let result = Engine::create_window(&mut backend, &desc("broken"));
        assert!(matches!(result, Err(Error::InitializationFailed(_))));
        assert!(!Engine::has_window());
    }
}

#[test]
#[serial]
fn test_window_not_created_fails() {
    setup();
    assert!(matches!(Engine::window(), Err(Error::InitializationFailed(_))));
    assert!(Engine::current_window().is_none());
    assert!(Window::instance().is_none());
}

#[test]
#[serial]
fn test_window_instance_matches_registry() {
    setup();
    let mut backend = MockBackend::new();
    let window = Engine::create_window(&mut backend, &desc("instance")).unwrap();

    let instance = Window::instance().unwrap();
    assert!(Arc::ptr_eq(&window, &instance));
}

#[test]
#[serial]
fn test_destroy_window_allows_new_one() {
    setup();
    let mut backend = MockBackend::new();
    let window = Engine::create_window(&mut backend, &desc("old")).unwrap();

    Engine::destroy_window().unwrap();
    assert!(!Engine::has_window());
    // Still alive while the caller holds it
    assert_eq!(backend.log.lock().unwrap().windows_released, 0);
    drop(window);
    assert_eq!(backend.log.lock().unwrap().windows_released, 1);

    let replacement = Engine::create_window(&mut backend, &desc("new")).unwrap();
    assert_eq!(replacement.lock().unwrap().title(), "new");
}

#[test]
#[serial]
fn test_held_window_blocks_new_one_after_destroy() {
    setup();
    let mut backend = MockBackend::new();
    let held = Engine::create_window(&mut backend, &desc("held")).unwrap();
    Engine::destroy_window().unwrap();

    let mut other_backend = MockBackend::new();
    let result = Engine::create_window(&mut other_backend, &desc("second"));
    assert!(matches!(result, Err(Error::InitializationFailed(_))));
    assert!(!Engine::has_window());
    assert!(Window::instance().is_none());
    assert!(held.lock().unwrap().fill_opaque(1, 2, 3).is_ok());

    drop(held);
    assert!(Engine::create_window(&mut other_backend, &desc("second")).is_ok());
}

#[test]
#[serial]
fn test_destroy_window_without_window_is_ok() {
    setup();
    assert!(Engine::destroy_window().is_ok());
}

// ============================================================================
// LOGGING API TESTS
// ============================================================================

#[test]
#[serial]
fn test_default_logger_logs_without_panic() {
    Engine::reset_logger();
    Engine::log(LogSeverity::Info, "galaxy2d::EngineTest", "hello".to_string());
    Engine::log_detailed(LogSeverity::Error, "galaxy2d::EngineTest", "boom".to_string(), file!(), line!());
}

#[test]
#[serial]
fn test_custom_logger_receives_logs() {
    let (logger, entries) = TestLogger::new();
    Engine::set_logger(logger);

    Engine::log(LogSeverity::Warn, "galaxy2d::EngineTest", "simple".to_string());
    Engine::log_detailed(LogSeverity::Error, "galaxy2d::EngineTest", "detailed".to_string(), "engine.rs", 42);

    let captured = entries_from(&entries, "galaxy2d::EngineTest");
    Engine::reset_logger();

    assert_eq!(captured.len(), 2);
    assert_eq!(captured[0].severity, LogSeverity::Warn);
    assert_eq!(captured[0].message, "simple");
    assert!(captured[0].file.is_none());
    assert_eq!(captured[1].file, Some("engine.rs"));
    assert_eq!(captured[1].line, Some(42));
}

#[test]
#[serial]
fn test_reset_logger_stops_capture() {
    let (logger, entries) = TestLogger::new();
    Engine::set_logger(logger);
    Engine::reset_logger();

    Engine::log(LogSeverity::Info, "galaxy2d::EngineTest", "after reset".to_string());
    assert!(entries_from(&entries, "galaxy2d::EngineTest").is_empty());
}

#[test]
#[serial]
fn test_engine_errors_are_logged() {
    setup();
    let (logger, entries) = TestLogger::new();
    Engine::set_logger(logger);

    let _ = Engine::window();

    let captured = entries_from(&entries, "galaxy2d::Engine");
    Engine::reset_logger();

    assert!(captured.iter().any(|e| e.severity == LogSeverity::Error
        && e.message.contains("Window not created")
        && e.file.is_some()));
}

#[test]
#[serial]
fn test_window_creation_is_logged() {
    setup();
    let (logger, entries) = TestLogger::new();
    Engine::set_logger(logger);

    let mut backend = MockBackend::new();
    Engine::create_window(&mut backend, &desc("logged")).unwrap();

    let window_logs = entries_from(&entries, "galaxy2d::Window");
    let engine_logs = entries_from(&entries, "galaxy2d::Engine");
    Engine::reset_logger();

    assert!(window_logs.iter().any(|e| e.severity == LogSeverity::Info && e.message.contains("logged")));
    assert!(engine_logs.iter().any(|e| e.message.contains("created successfully")));
}
