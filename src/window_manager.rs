use crate::geometry::{Coord, ScreenSize, WindowRect};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Platform window value. `RawWindow(0)` means "no window".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RawWindow(pub isize);

impl RawWindow {
    pub const NONE: RawWindow = RawWindow(0);

    pub fn is_none(&self) -> bool {
        self.0 == 0
    }
}

/// The window-manager capabilities the physics loops need.
///
/// Queries against a closed or foreign window must not fail: they return a
/// zero rectangle or identity `0` instead. Every method is called from either
/// the integrator or the capture thread, so implementations must be
/// thread-safe.
pub trait WindowBackend: Send + Sync {
    fn foreground_window(&self) -> RawWindow;
    fn window_rect(&self, window: RawWindow) -> WindowRect;
    fn move_resize(&self, window: RawWindow, rect: WindowRect);
    /// Stable identity used for equality across re-queries. `0` for invalid
    /// or untitled windows.
    fn window_identity(&self, window: RawWindow) -> u32;
    /// `None` when the pointer position is temporarily unavailable.
    fn pointer_position(&self) -> Option<Coord>;
    fn primary_button_pressed(&self) -> bool;
    fn screen_size(&self) -> ScreenSize;
}

/// A live window paired with the backend that can query and move it.
#[derive(Clone)]
pub struct WindowHandle {
    raw: RawWindow,
    backend: Arc<dyn WindowBackend>,
}

impl WindowHandle {
    pub fn new(raw: RawWindow, backend: Arc<dyn WindowBackend>) -> Self {
        Self { raw, backend }
    }

    pub fn foreground(backend: &Arc<dyn WindowBackend>) -> Self {
        Self::new(backend.foreground_window(), Arc::clone(backend))
    }

    pub fn raw(&self) -> RawWindow {
        self.raw
    }

    pub fn rect(&self) -> WindowRect {
        self.backend.window_rect(self.raw)
    }

    pub fn position(&self) -> Coord {
        self.rect().position()
    }

    pub fn move_resize(&self, rect: WindowRect) {
        self.backend.move_resize(self.raw, rect);
    }

    pub fn move_to(&self, position: Coord) {
        let rect = self.rect().with_position(position);
        self.move_resize(rect);
    }

    pub fn resize(&self, width: i32, height: i32) {
        let rect = self.rect().with_size(width, height);
        self.move_resize(rect);
    }

    pub fn identity(&self) -> u32 {
        self.backend.window_identity(self.raw)
    }

    pub fn is_valid(&self) -> bool {
        self.identity() > 0
    }
}

/// Handles compare by their live identity, so this queries the backend.
impl PartialEq for WindowHandle {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl std::fmt::Debug for WindowHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowHandle").field("raw", &self.raw).finish()
    }
}

/// Select the window-manager binding for the current platform.
pub fn default_backend() -> anyhow::Result<Arc<dyn WindowBackend>> {
    #[cfg(windows)]
    {
        Ok(Arc::new(crate::win_util::Win32Backend::new()))
    }

    #[cfg(not(windows))]
    {
        anyhow::bail!("no native window backend is available on this platform")
    }
}

#[derive(Debug, Clone, Copy)]
struct MockWindow {
    rect: WindowRect,
    identity: u32,
}

#[derive(Debug)]
struct MockState {
    windows: HashMap<RawWindow, MockWindow>,
    foreground: RawWindow,
    button_pressed: bool,
    pointer: Option<Coord>,
    screen: ScreenSize,
}

/// In-memory window manager for tests and benchmarks.
#[derive(Debug)]
pub struct MockWindowBackend {
    state: Mutex<MockState>,
    move_count: AtomicUsize,
}

impl Default for MockWindowBackend {
    fn default() -> Self {
        Self::new(ScreenSize::new(1920, 1080))
    }
}

impl MockWindowBackend {
    pub fn new(screen: ScreenSize) -> Self {
        Self {
            state: Mutex::new(MockState {
                windows: HashMap::new(),
                foreground: RawWindow::NONE,
                button_pressed: false,
                pointer: Some(Coord::ZERO),
                screen,
            }),
            move_count: AtomicUsize::new(0),
        }
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut MockState) -> R) -> R {
        let mut guard = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard)
    }

    /// Register a window. An `identity` of `0` models an untitled window.
    pub fn add_window(&self, raw: RawWindow, identity: u32, rect: WindowRect) {
        self.with_state(|s| {
            s.windows.insert(raw, MockWindow { rect, identity });
        });
    }

    /// Forget a window so later queries see it as dead.
    pub fn close_window(&self, raw: RawWindow) {
        self.with_state(|s| {
            s.windows.remove(&raw);
        });
    }

    pub fn set_foreground(&self, raw: RawWindow) {
        self.with_state(|s| s.foreground = raw);
    }

    pub fn set_button_pressed(&self, pressed: bool) {
        self.with_state(|s| s.button_pressed = pressed);
    }

    pub fn set_pointer(&self, pointer: Option<Coord>) {
        self.with_state(|s| s.pointer = pointer);
    }

    pub fn set_screen_size(&self, screen: ScreenSize) {
        self.with_state(|s| s.screen = screen);
    }

    /// Simulate the user (or the OS) moving a window.
    pub fn set_rect(&self, raw: RawWindow, rect: WindowRect) {
        self.with_state(|s| {
            if let Some(window) = s.windows.get_mut(&raw) {
                window.rect = rect;
            }
        });
    }

    pub fn rect_of(&self, raw: RawWindow) -> Option<WindowRect> {
        self.with_state(|s| s.windows.get(&raw).map(|w| w.rect))
    }

    pub fn move_count(&self) -> usize {
        self.move_count.load(Ordering::SeqCst)
    }
}

impl WindowBackend for MockWindowBackend {
    fn foreground_window(&self) -> RawWindow {
        self.with_state(|s| s.foreground)
    }

    fn window_rect(&self, window: RawWindow) -> WindowRect {
        self.with_state(|s| s.windows.get(&window).map(|w| w.rect).unwrap_or_default())
    }

    fn move_resize(&self, window: RawWindow, rect: WindowRect) {
        self.move_count.fetch_add(1, Ordering::SeqCst);
        self.with_state(|s| {
            if let Some(w) = s.windows.get_mut(&window) {
                w.rect = rect;
            }
        });
    }

    fn window_identity(&self, window: RawWindow) -> u32 {
        self.with_state(|s| s.windows.get(&window).map(|w| w.identity).unwrap_or(0))
    }

    fn pointer_position(&self) -> Option<Coord> {
        self.with_state(|s| s.pointer)
    }

    fn primary_button_pressed(&self) -> bool {
        self.with_state(|s| s.button_pressed)
    }

    fn screen_size(&self) -> ScreenSize {
        self.with_state(|s| s.screen)
    }
}
